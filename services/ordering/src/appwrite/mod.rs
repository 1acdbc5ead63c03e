//! HTTP adapter for the hosted Appwrite backend
//!
//! [`AppwriteClient`] implements the capability traits from
//! [`crate::backend`] over the REST API. [`Avatars`] and [`Storage`] only
//! build URLs and never touch the network.

mod account;
mod avatars;
mod databases;
mod id;
mod storage;

pub use avatars::Avatars;
pub use id::unique_id;
pub use storage::Storage;

use common::{ClientError, ClientResult, ErrorKind, ServiceError, ServiceResult};
use reqwest::{
    RequestBuilder, Response, Url,
    header::{HeaderMap, HeaderValue, ORIGIN},
};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{error, info};

use crate::config::BackendConfig;

/// Response format version requested from the API
const RESPONSE_FORMAT: &str = "1.6.0";

/// Scheme used to build the `Origin` header for a native platform
const PLATFORM_ORIGIN_SCHEME: &str = "appwrite-android";

/// Appwrite REST client
///
/// Cloning is cheap and clones share the cookie jar, which holds the
/// session cookie.
#[derive(Debug, Clone)]
pub struct AppwriteClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl AppwriteClient {
    /// Initialize a new client for the configured endpoint and project
    pub fn new(config: &BackendConfig) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "X-Appwrite-Project",
            HeaderValue::from_str(&config.project_id)
                .map_err(|e| ClientError::Configuration(format!("Invalid project id: {}", e)))?,
        );
        headers.insert(
            "X-Appwrite-Response-Format",
            HeaderValue::from_static(RESPONSE_FORMAT),
        );
        headers.insert(
            ORIGIN,
            HeaderValue::from_str(&format!("{}://{}", PLATFORM_ORIGIN_SCHEME, config.platform))
                .map_err(|e| ClientError::Configuration(format!("Invalid platform: {}", e)))?,
        );

        let http = reqwest::Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .build()
            .map_err(|e| {
                ClientError::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        info!("Appwrite client initialized with endpoint: {}", config.endpoint);

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }

    fn url(&self, path: &str) -> Url {
        endpoint_url(&self.endpoint, path)
    }

    /// Send a request, turning non-success statuses into classified errors
    async fn send(&self, request: RequestBuilder) -> ServiceResult<Response> {
        let response = request.send().await.map_err(|e| {
            error!("Request to backend failed: {}", e);
            ServiceError::with_kind(ErrorKind::Transport, e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(parse_error(
            status.as_u16(),
            status.canonical_reason().unwrap_or("Request failed"),
            &body,
        ))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ServiceResult<T> {
        let response = self.send(request).await?;
        response.json::<T>().await.map_err(|e| {
            ServiceError::with_kind(ErrorKind::Other, format!("Invalid backend response: {}", e))
        })
    }
}

/// Append `path` to the endpoint's path, keeping any base path such as `/v1`
pub(crate) fn endpoint_url(endpoint: &Url, path: &str) -> Url {
    let mut url = endpoint.clone();
    let joined = format!("{}{}", url.path().trim_end_matches('/'), path);
    url.set_path(&joined);
    url.set_query(None);
    url
}

/// Error payload returned by the API
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(rename = "type", default)]
    error_type: Option<String>,
}

/// Build a classified error from a failed response
fn parse_error(status: u16, reason: &str, body: &str) -> ServiceError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => ServiceError::new(Some(status), parsed.error_type, parsed.message),
        Err(_) if body.trim().is_empty() => ServiceError::new(Some(status), None, reason),
        Err(_) => ServiceError::new(Some(status), None, body.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_body() {
        let err = parse_error(
            401,
            "Unauthorized",
            r#"{"message":"User (role: guests) missing scope (account)","code":401,"type":"general_unauthorized_scope","version":"1.6.0"}"#,
        );
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert_eq!(err.code, Some(401));
        assert_eq!(err.error_type.as_deref(), Some("general_unauthorized_scope"));
        assert_eq!(err.message, "User (role: guests) missing scope (account)");
    }

    #[test]
    fn test_parse_rate_limit_body() {
        let err = parse_error(
            429,
            "Too Many Requests",
            r#"{"message":"Rate limit for the current endpoint has been exceeded. Please try again after some time.","code":429,"type":"general_rate_limit_exceeded"}"#,
        );
        assert_eq!(err.kind, ErrorKind::RateLimited);
    }

    #[test]
    fn test_parse_error_without_json_body() {
        let err = parse_error(502, "Bad Gateway", "");
        assert_eq!(err.kind, ErrorKind::Other);
        assert_eq!(err.message, "Bad Gateway");

        let err = parse_error(503, "Service Unavailable", "upstream down\n");
        assert_eq!(err.message, "upstream down");
    }

    #[test]
    fn test_endpoint_url_keeps_base_path() {
        let endpoint = Url::parse("https://cloud.appwrite.io/v1").unwrap();
        assert_eq!(
            endpoint_url(&endpoint, "/account/sessions/current").as_str(),
            "https://cloud.appwrite.io/v1/account/sessions/current"
        );

        let endpoint = Url::parse("https://cloud.appwrite.io/v1/").unwrap();
        assert_eq!(
            endpoint_url(&endpoint, "/account").as_str(),
            "https://cloud.appwrite.io/v1/account"
        );
    }

    #[test]
    fn test_client_builds_from_config() {
        let config = BackendConfig::new("https://cloud.appwrite.io/v1", "food-project").unwrap();
        assert!(AppwriteClient::new(&config).is_ok());
    }
}
