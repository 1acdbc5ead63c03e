//! Unique document and account identifiers

use chrono::Utc;
use rand::Rng;

const RANDOM_PADDING: usize = 7;

/// Generate a unique id in the backend's format: hex seconds, hex
/// milliseconds padded to five digits, then random hex digits
pub fn unique_id() -> String {
    let now = Utc::now();
    let mut id = format!(
        "{:x}{:05x}",
        now.timestamp(),
        now.timestamp_subsec_millis()
    );

    let mut rng = rand::thread_rng();
    for _ in 0..RANDOM_PADDING {
        id.push_str(&format!("{:x}", rng.gen_range(0..16u8)));
    }

    id
}
