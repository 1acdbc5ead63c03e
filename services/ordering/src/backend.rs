//! Capability interfaces for the hosted backend
//!
//! These traits are the boundary between [`crate::client::BackendClient`]
//! and a concrete backend. Failures cross it as [`ServiceError`]s that are
//! already classified, so callers never inspect error wording.

use async_trait::async_trait;
use common::ServiceResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Account, DocumentList, Session};

/// Outcome of deleting the current session when a failure is not involved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionProbe {
    /// A session existed and was deleted
    Deleted,
    /// There was no session to delete
    NoSession,
}

/// Query predicate method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryMethod {
    Equal,
    Search,
}

/// A single predicate applied when listing documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub method: QueryMethod,
    pub attribute: String,
    pub values: Vec<Value>,
}

impl Query {
    /// Attribute equals the value
    pub fn equal(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            method: QueryMethod::Equal,
            attribute: attribute.into(),
            values: vec![value.into()],
        }
    }

    /// Full-text search on the attribute
    pub fn search(attribute: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            method: QueryMethod::Search,
            attribute: attribute.into(),
            values: vec![Value::String(text.into())],
        }
    }

    /// Serialize to the JSON query string accepted by the REST API
    pub fn to_query_string(&self) -> String {
        serde_json::json!({
            "method": self.method,
            "attribute": self.attribute,
            "values": self.values,
        })
        .to_string()
    }
}

/// Account and session management
#[async_trait]
pub trait AccountApi: Send + Sync {
    /// Create an account; `None` when the backend answered without one
    async fn create(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> ServiceResult<Option<Account>>;

    /// Open an email/password session
    async fn create_email_password_session(
        &self,
        email: &str,
        password: &str,
    ) -> ServiceResult<Session>;

    /// Delete the current session
    async fn delete_current_session(&self) -> ServiceResult<SessionProbe>;

    /// Fetch the signed-in account; `None` when there is no session
    async fn get(&self) -> ServiceResult<Option<Account>>;
}

/// Document collections
#[async_trait]
pub trait DocumentApi: Send + Sync {
    /// List documents of a collection matching every query
    async fn list_documents(
        &self,
        database_id: &str,
        collection_id: &str,
        queries: &[Query],
    ) -> ServiceResult<DocumentList>;

    /// Create a document and return it as stored
    async fn create_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: Value,
    ) -> ServiceResult<Value>;
}
