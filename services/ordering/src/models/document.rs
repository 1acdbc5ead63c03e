//! Generic document listing

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of documents from a collection, as returned by the backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentList {
    pub total: u64,
    pub documents: Vec<Value>,
}
