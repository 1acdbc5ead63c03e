//! Backend configuration
//!
//! The endpoint and project id come from the environment; every other
//! identifier is fixed for the deployed backend project.

use std::time::Duration;

use common::{ClientError, ClientResult, RetryPolicy};
use config::{Config, Environment};
use reqwest::Url;
use serde::Deserialize;

pub const PLATFORM: &str = "com.jsm.foodordering";
pub const DATABASE_ID: &str = "689f744f000ee7af7078";
pub const BUCKET_ID: &str = "68a1ad51000764dd913b";
pub const USERS_COLLECTION_ID: &str = "689f74730001ef030bca";
pub const CATEGORIES_COLLECTION_ID: &str = "68a1a8360034ca521ce0";
pub const MENU_COLLECTION_ID: &str = "68a1a90a003d1fb9eb6a";
pub const CUSTOMIZATIONS_COLLECTION_ID: &str = "68a1ab2e0026f4d3566a";
pub const MENU_CUSTOMIZATIONS_COLLECTION_ID: &str = "68a1ac4800141ed473b6";

/// Collection identifiers inside the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionIds {
    pub users: String,
    pub categories: String,
    pub menu: String,
    pub customizations: String,
    pub menu_customizations: String,
}

impl Default for CollectionIds {
    fn default() -> Self {
        Self {
            users: USERS_COLLECTION_ID.to_string(),
            categories: CATEGORIES_COLLECTION_ID.to_string(),
            menu: MENU_COLLECTION_ID.to_string(),
            customizations: CUSTOMIZATIONS_COLLECTION_ID.to_string(),
            menu_customizations: MENU_CUSTOMIZATIONS_COLLECTION_ID.to_string(),
        }
    }
}

/// Backend configuration, immutable for the lifetime of the process
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// API endpoint, e.g. `https://cloud.appwrite.io/v1`
    pub endpoint: Url,
    pub project_id: String,
    /// Platform (application) identifier registered with the project
    pub platform: String,
    pub database_id: String,
    /// Storage bucket holding menu images
    pub bucket_id: String,
    pub collections: CollectionIds,
    pub retry: RetryPolicy,
}

/// Raw values read from `APPWRITE_*` environment variables
#[derive(Debug, Deserialize)]
struct EnvSettings {
    endpoint: Option<String>,
    project_id: Option<String>,
    max_retries: Option<u32>,
    retry_delay_ms: Option<u64>,
}

impl BackendConfig {
    /// Create a configuration for the given endpoint and project, with the
    /// built-in identifiers and the default retry policy
    pub fn new(endpoint: &str, project_id: impl Into<String>) -> ClientResult<Self> {
        let project_id = project_id.into();
        if project_id.trim().is_empty() {
            return Err(ClientError::Configuration(
                "Project id must not be empty".to_string(),
            ));
        }

        Ok(Self {
            endpoint: parse_endpoint(endpoint)?,
            project_id,
            platform: PLATFORM.to_string(),
            database_id: DATABASE_ID.to_string(),
            bucket_id: BUCKET_ID.to_string(),
            collections: CollectionIds::default(),
            retry: RetryPolicy::default(),
        })
    }

    /// Create a new BackendConfig from environment variables
    ///
    /// # Environment Variables
    /// - `APPWRITE_ENDPOINT`: API endpoint URL (required)
    /// - `APPWRITE_PROJECT_ID`: Project identifier (required)
    /// - `APPWRITE_MAX_RETRIES`: Attempts for rate-limited calls (default: 3)
    /// - `APPWRITE_RETRY_DELAY_MS`: Base backoff delay in milliseconds (default: 1000)
    pub fn from_env() -> ClientResult<Self> {
        let settings: EnvSettings = Config::builder()
            .add_source(Environment::with_prefix("APPWRITE"))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ClientError::Configuration(format!("Invalid environment: {}", e)))?;

        let endpoint = settings.endpoint.ok_or_else(|| {
            ClientError::Configuration("APPWRITE_ENDPOINT environment variable not set".to_string())
        })?;
        let project_id = settings.project_id.ok_or_else(|| {
            ClientError::Configuration(
                "APPWRITE_PROJECT_ID environment variable not set".to_string(),
            )
        })?;

        let mut config = Self::new(&endpoint, project_id)?;
        let defaults = RetryPolicy::default();
        config.retry = RetryPolicy::new(
            settings.max_retries.unwrap_or(defaults.max_retries),
            settings
                .retry_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.base_delay),
        );

        Ok(config)
    }

    /// Replace the retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

fn parse_endpoint(endpoint: &str) -> ClientResult<Url> {
    let url = Url::parse(endpoint.trim())
        .map_err(|e| ClientError::Configuration(format!("Invalid endpoint URL: {}", e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ClientError::Configuration(format!(
            "Unsupported endpoint scheme: {}",
            other
        ))),
    }
}
