//! Backend client used by the application screens
//!
//! [`BackendClient`] turns the handful of application intents (sign up,
//! sign in, sign out, load the current user, load the menu and its
//! categories) into backend calls. Mutating calls share one
//! [`RetryPolicy`]; every operation surfaces exactly one [`ClientError`].

use std::sync::Arc;

use common::{ClientError, ClientResult, RetryPolicy};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{error, info, warn};

use crate::appwrite::{AppwriteClient, Avatars, Storage, unique_id};
use crate::backend::{AccountApi, DocumentApi, Query, SessionProbe};
use crate::config::BackendConfig;
use crate::models::{Category, Credentials, MenuItem, MenuQuery, NewUserRequest, UserProfile};

/// Backend client
///
/// Construct once at startup and share by cloning; clones share the
/// underlying service handles.
#[derive(Clone)]
pub struct BackendClient {
    config: Arc<BackendConfig>,
    accounts: Arc<dyn AccountApi>,
    documents: Arc<dyn DocumentApi>,
    avatars: Avatars,
    storage: Storage,
}

impl BackendClient {
    /// Create a client talking to the configured hosted backend
    pub fn connect(config: BackendConfig) -> ClientResult<Self> {
        let http = AppwriteClient::new(&config)?;
        Ok(Self::with_services(
            config,
            Arc::new(http.clone()),
            Arc::new(http),
        ))
    }

    /// Create a client over the given account and document services
    pub fn with_services(
        config: BackendConfig,
        accounts: Arc<dyn AccountApi>,
        documents: Arc<dyn DocumentApi>,
    ) -> Self {
        let avatars = Avatars::new(&config);
        let storage = Storage::new(&config);

        Self {
            config: Arc::new(config),
            accounts,
            documents,
            avatars,
            storage,
        }
    }

    /// Get the client configuration
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn retry(&self) -> RetryPolicy {
        self.config.retry
    }

    /// Create an account, sign in to it and store its profile document
    ///
    /// Each step that changes backend state is retried on its own, so a rate
    /// limit after the account exists never re-creates it. There is no
    /// rollback: if a later step fails the account (and its session) remain.
    pub async fn create_account(&self, request: &NewUserRequest) -> ClientResult<UserProfile> {
        info!("Creating new account for: {}", request.email);

        self.create_account_steps(request)
            .await
            .inspect_err(|e| error!("Account creation failed: {}", e))
    }

    async fn create_account_steps(&self, request: &NewUserRequest) -> ClientResult<UserProfile> {
        let retry = self.retry();

        let account = retry
            .run(move || async move {
                self.clear_session().await?;
                self.accounts
                    .create(&unique_id(), &request.email, &request.password, &request.name)
                    .await?
                    .ok_or(ClientError::AccountCreation)
            })
            .await?;

        let credentials = request.credentials();
        let credentials = &credentials;
        retry.run(move || self.open_session(credentials)).await?;

        let avatar_url = self.avatars.initials_url(&request.name);
        let data = json!({
            "email": request.email,
            "name": request.name,
            "accountId": account.id,
            "avatar": avatar_url,
        });
        let data = &data;
        let document = retry
            .run(move || async move {
                self.documents
                    .create_document(
                        &self.config.database_id,
                        &self.config.collections.users,
                        &unique_id(),
                        data.clone(),
                    )
                    .await
                    .map_err(ClientError::from)
            })
            .await?;

        info!("Created account {} with profile document", account.id);
        decode(document)
    }

    /// Replace any current session with a new email/password session
    pub async fn sign_in(&self, credentials: &Credentials) -> ClientResult<()> {
        info!("Sign in attempt for: {}", credentials.email);

        self.retry()
            .run(move || async move {
                self.clear_session().await?;
                self.open_session(credentials).await
            })
            .await
    }

    /// Delete the current session
    pub async fn sign_out(&self) -> ClientResult<()> {
        info!("Signing out");

        self.retry()
            .run(move || async move {
                match self.accounts.delete_current_session().await? {
                    SessionProbe::Deleted => Ok(()),
                    SessionProbe::NoSession => {
                        Err(ClientError::SignOut("No active session".to_string()))
                    }
                }
            })
            .await
            .map_err(|e| match e {
                ClientError::Backend(e) => ClientError::SignOut(e.to_string()),
                other => other,
            })
    }

    /// Profile document of the signed-in account
    pub async fn get_current_user(&self) -> ClientResult<UserProfile> {
        let account = self.accounts.get().await?.ok_or(ClientError::NotFound)?;

        let list = self
            .documents
            .list_documents(
                &self.config.database_id,
                &self.config.collections.users,
                &[Query::equal("accountId", account.id.as_str())],
            )
            .await?;

        let document = list
            .documents
            .into_iter()
            .next()
            .ok_or(ClientError::NotFound)?;

        decode(document)
    }

    /// Menu items matching the optional category and search filters
    pub async fn get_menu(&self, query: &MenuQuery) -> ClientResult<Vec<MenuItem>> {
        let mut queries = Vec::new();
        if let Some(category) = query.category_filter() {
            queries.push(Query::equal("categories", category));
        }
        if let Some(text) = query.search_filter() {
            queries.push(Query::search("name", text));
        }

        let list = self
            .documents
            .list_documents(
                &self.config.database_id,
                &self.config.collections.menu,
                &queries,
            )
            .await?;

        list.documents.into_iter().map(decode).collect()
    }

    /// All menu categories
    pub async fn get_categories(&self) -> ClientResult<Vec<Category>> {
        let list = self
            .documents
            .list_documents(
                &self.config.database_id,
                &self.config.collections.categories,
                &[],
            )
            .await?;

        list.documents.into_iter().map(decode).collect()
    }

    /// Initials avatar URL, as stored in profiles at sign-up
    pub fn avatar_url(&self, name: &str) -> String {
        self.avatars.initials_url(name)
    }

    /// URL of a file in the storage bucket
    pub fn file_view_url(&self, file_id: &str) -> String {
        self.storage.file_view_url(file_id)
    }

    /// URL of a resized preview of an image in the storage bucket
    pub fn file_preview_url(&self, file_id: &str, width: u32, height: u32) -> String {
        self.storage.file_preview_url(file_id, width, height)
    }

    /// Best-effort removal of the current session before creating a new one
    async fn clear_session(&self) -> ClientResult<()> {
        match self.accounts.delete_current_session().await {
            Ok(SessionProbe::Deleted) => info!("Deleted previous session"),
            Ok(SessionProbe::NoSession) => {}
            Err(e) if e.is_rate_limited() => return Err(e.into()),
            Err(e) => warn!("Failed to delete previous session, continuing: {}", e),
        }
        Ok(())
    }

    async fn open_session(&self, credentials: &Credentials) -> ClientResult<()> {
        let session = self
            .accounts
            .create_email_password_session(&credentials.email, &credentials.password)
            .await?;
        info!("Session created for account: {}", session.user_id);
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(document: Value) -> ClientResult<T> {
    serde_json::from_value(document).map_err(|e| ClientError::Decode(e.to_string()))
}
