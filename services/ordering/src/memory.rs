//! In-memory backend
//!
//! Implements [`AccountApi`] and [`DocumentApi`] over process memory so the
//! client can run without a hosted backend. Failures can be scripted per
//! operation and every call is counted.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::{ServiceError, ServiceResult};
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::info;

use crate::appwrite::unique_id;
use crate::backend::{AccountApi, DocumentApi, Query, QueryMethod, SessionProbe};
use crate::models::{Account, DocumentList, Session};

/// Backend operations that can be counted and scripted to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateAccount,
    CreateSession,
    DeleteSession,
    GetAccount,
    ListDocuments,
    CreateDocument,
}

#[derive(Debug)]
struct StoredAccount {
    account: Account,
    password: String,
}

#[derive(Debug, Default)]
struct MemoryState {
    accounts: Vec<StoredAccount>,
    current_session: Option<Session>,
    /// Documents keyed by (database id, collection id), in insertion order
    collections: HashMap<(String, String), Vec<Value>>,
    failures: HashMap<Operation, VecDeque<ServiceError>>,
    calls: HashMap<Operation, usize>,
}

impl MemoryState {
    /// Count the call and pop a scripted failure, if any
    fn enter(&mut self, operation: Operation) -> ServiceResult<()> {
        *self.calls.entry(operation).or_default() += 1;

        match self
            .failures
            .get_mut(&operation)
            .and_then(|queue| queue.pop_front())
        {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// In-memory backend
///
/// Clones share state, so one clone can be handed to the client while
/// another is kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next call of `operation` fail with `error`
    ///
    /// Failures queue up: scripting twice fails the next two calls.
    pub async fn fail_next(&self, operation: Operation, error: ServiceError) {
        let mut state = self.state.lock().await;
        state
            .failures
            .entry(operation)
            .or_default()
            .push_back(error);
    }

    /// Number of calls made to `operation`, including failed ones
    pub async fn calls(&self, operation: Operation) -> usize {
        let state = self.state.lock().await;
        state.calls.get(&operation).copied().unwrap_or(0)
    }

    /// Insert documents into a collection as-is, assigning `$id` when missing
    pub async fn seed_documents(
        &self,
        database_id: &str,
        collection_id: &str,
        documents: Vec<Value>,
    ) {
        let mut state = self.state.lock().await;
        let collection = state
            .collections
            .entry((database_id.to_string(), collection_id.to_string()))
            .or_default();

        for mut document in documents {
            if let Value::Object(fields) = &mut document {
                fields
                    .entry("$id")
                    .or_insert_with(|| Value::String(unique_id()));
            }
            collection.push(document);
        }
    }

    /// Snapshot of a collection's documents
    pub async fn documents(&self, database_id: &str, collection_id: &str) -> Vec<Value> {
        let state = self.state.lock().await;
        state
            .collections
            .get(&(database_id.to_string(), collection_id.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    /// All accounts created so far
    pub async fn accounts(&self) -> Vec<Account> {
        let state = self.state.lock().await;
        state.accounts.iter().map(|s| s.account.clone()).collect()
    }

    /// The active session, if any
    pub async fn current_session(&self) -> Option<Session> {
        let state = self.state.lock().await;
        state.current_session.clone()
    }
}

#[async_trait]
impl AccountApi for InMemoryBackend {
    async fn create(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> ServiceResult<Option<Account>> {
        let mut state = self.state.lock().await;
        state.enter(Operation::CreateAccount)?;

        let taken = state
            .accounts
            .iter()
            .any(|s| s.account.id == user_id || s.account.email.eq_ignore_ascii_case(email));
        if taken {
            return Err(ServiceError::new(
                Some(409),
                Some("user_already_exists".to_string()),
                "A user with the same id, email, or phone already exists in this project.",
            ));
        }

        let account = Account {
            id: user_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            created_at: Some(Utc::now()),
        };
        state.accounts.push(StoredAccount {
            account: account.clone(),
            password: password.to_string(),
        });
        info!("Created in-memory account: {}", user_id);

        Ok(Some(account))
    }

    async fn create_email_password_session(
        &self,
        email: &str,
        password: &str,
    ) -> ServiceResult<Session> {
        let mut state = self.state.lock().await;
        state.enter(Operation::CreateSession)?;

        if state.current_session.is_some() {
            return Err(ServiceError::new(
                Some(401),
                Some("user_session_already_exists".to_string()),
                "Creation of a session is prohibited when a session is active.",
            ));
        }

        let user_id = state
            .accounts
            .iter()
            .find(|s| s.account.email.eq_ignore_ascii_case(email) && s.password == password)
            .map(|s| s.account.id.clone())
            .ok_or_else(|| {
                ServiceError::new(
                    Some(401),
                    Some("user_invalid_credentials".to_string()),
                    "Invalid credentials. Please check the email and password.",
                )
            })?;

        let session = Session {
            id: unique_id(),
            user_id,
            expire: None,
            current: true,
        };
        state.current_session = Some(session.clone());

        Ok(session)
    }

    async fn delete_current_session(&self) -> ServiceResult<SessionProbe> {
        let mut state = self.state.lock().await;
        state.enter(Operation::DeleteSession)?;

        match state.current_session.take() {
            Some(_) => Ok(SessionProbe::Deleted),
            None => Ok(SessionProbe::NoSession),
        }
    }

    async fn get(&self) -> ServiceResult<Option<Account>> {
        let mut state = self.state.lock().await;
        state.enter(Operation::GetAccount)?;

        let Some(session) = &state.current_session else {
            return Ok(None);
        };

        Ok(state
            .accounts
            .iter()
            .find(|s| s.account.id == session.user_id)
            .map(|s| s.account.clone()))
    }
}

#[async_trait]
impl DocumentApi for InMemoryBackend {
    async fn list_documents(
        &self,
        database_id: &str,
        collection_id: &str,
        queries: &[Query],
    ) -> ServiceResult<DocumentList> {
        let mut state = self.state.lock().await;
        state.enter(Operation::ListDocuments)?;

        let documents: Vec<Value> = state
            .collections
            .get(&(database_id.to_string(), collection_id.to_string()))
            .map(|docs| {
                docs.iter()
                    .filter(|doc| queries.iter().all(|q| matches_query(doc, q)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Ok(DocumentList {
            total: documents.len() as u64,
            documents,
        })
    }

    async fn create_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: Value,
    ) -> ServiceResult<Value> {
        let mut state = self.state.lock().await;
        state.enter(Operation::CreateDocument)?;

        let Value::Object(attributes) = data else {
            return Err(ServiceError::new(
                Some(400),
                Some("document_invalid_structure".to_string()),
                "Invalid document structure: data must be an object",
            ));
        };

        let collection = state
            .collections
            .entry((database_id.to_string(), collection_id.to_string()))
            .or_default();

        if collection.iter().any(|doc| doc["$id"] == document_id) {
            return Err(ServiceError::new(
                Some(409),
                Some("document_already_exists".to_string()),
                "Document with the requested ID already exists.",
            ));
        }

        let now = Utc::now().to_rfc3339();
        let mut document = Map::new();
        document.insert("$id".to_string(), Value::String(document_id.to_string()));
        document.insert("$databaseId".to_string(), Value::String(database_id.to_string()));
        document.insert(
            "$collectionId".to_string(),
            Value::String(collection_id.to_string()),
        );
        document.insert("$createdAt".to_string(), Value::String(now.clone()));
        document.insert("$updatedAt".to_string(), Value::String(now));
        document.extend(attributes);

        let document = Value::Object(document);
        collection.push(document.clone());

        Ok(document)
    }
}

/// Evaluate one predicate against a document
///
/// `equal` matches a scalar attribute, any element of an array attribute,
/// or the `$id` / `name` of related documents. `search` is a
/// case-insensitive substring match on a string attribute.
fn matches_query(document: &Value, query: &Query) -> bool {
    let field = &document[query.attribute.as_str()];

    match query.method {
        QueryMethod::Equal => query.values.iter().any(|value| equals(field, value)),
        QueryMethod::Search => {
            let Some(text) = field.as_str() else {
                return false;
            };
            let text = text.to_lowercase();
            query
                .values
                .iter()
                .filter_map(Value::as_str)
                .any(|term| text.contains(&term.to_lowercase()))
        }
    }
}

fn equals(field: &Value, value: &Value) -> bool {
    match field {
        Value::Array(items) => items.iter().any(|item| equals(item, value)),
        Value::Object(related) => {
            related.get("$id") == Some(value) || related.get("name") == Some(value)
        }
        other => other == value,
    }
}
