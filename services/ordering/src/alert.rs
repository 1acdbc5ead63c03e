//! User-facing presentation of client errors

use common::ClientError;

/// Status line shown next to the form after a rate-limited attempt
pub const RATE_LIMIT_STATUS: &str =
    "Rate limit reached. Please wait a few minutes before trying again.";

/// Rate-limit message shown on the sign-up form
pub const SIGN_UP_RATE_LIMITED_MESSAGE: &str =
    "Too many registration attempts. Please wait a few minutes before trying again.";

/// Title and message of the modal alert shown for a failed operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
    /// Inline status message, only set for rate limiting
    pub status: Option<String>,
}

impl Alert {
    pub fn from_error(error: &ClientError) -> Self {
        match error {
            ClientError::RateLimited => Self {
                title: "Rate Limited".to_string(),
                message: error.to_string(),
                status: Some(RATE_LIMIT_STATUS.to_string()),
            },
            other => Self {
                title: "Error".to_string(),
                message: other.to_string(),
                status: None,
            },
        }
    }

    /// Alert for a failed sign-up, which words rate limiting as registration
    pub fn for_sign_up(error: &ClientError) -> Self {
        let mut alert = Self::from_error(error);
        if matches!(error, ClientError::RateLimited) {
            alert.message = SIGN_UP_RATE_LIMITED_MESSAGE.to_string();
        }
        alert
    }
}

impl From<&ClientError> for Alert {
    fn from(error: &ClientError) -> Self {
        Self::from_error(error)
    }
}
