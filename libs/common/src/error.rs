//! Error types shared by the backend access layer
//!
//! [`ServiceError`] is what a backend adapter reports for a failed call,
//! already classified into an [`ErrorKind`]. [`ClientError`] is what the
//! client operations return to the UI layer.

use std::fmt;
use thiserror::Error;

/// Message shown to the user once rate-limit retries are exhausted
pub const RATE_LIMITED_MESSAGE: &str =
    "Too many login attempts. Please wait a few minutes before trying again.";

/// Classification of a backend failure, decided once at the adapter boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The backend throttled the request
    RateLimited,
    /// Missing or invalid session / scope
    Unauthorized,
    /// The addressed resource does not exist
    NotFound,
    /// A resource with the same id or unique field already exists
    Conflict,
    /// The request never produced a backend response
    Transport,
    /// Anything else
    Other,
}

impl ErrorKind {
    /// Classify a failure from its status code, backend error type and message
    ///
    /// Rate limiting wins over every other signal: a 429, an error type
    /// mentioning `rate_limit`, or a message containing "rate limit" in any
    /// casing.
    pub fn classify(code: Option<u16>, error_type: Option<&str>, message: &str) -> Self {
        let rate_limited = code == Some(429)
            || error_type.is_some_and(|t| t.contains("rate_limit"))
            || message.to_lowercase().contains("rate limit");

        if rate_limited {
            return ErrorKind::RateLimited;
        }

        match code {
            Some(401) | Some(403) => ErrorKind::Unauthorized,
            Some(404) => ErrorKind::NotFound,
            Some(409) => ErrorKind::Conflict,
            _ => ErrorKind::Other,
        }
    }
}

/// A failed backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    pub kind: ErrorKind,
    /// HTTP status or backend numeric code, when there was one
    pub code: Option<u16>,
    /// Backend error type identifier (e.g. `user_session_not_found`)
    pub error_type: Option<String>,
    pub message: String,
}

impl ServiceError {
    /// Build a classified error from the parts of a backend response
    pub fn new(code: Option<u16>, error_type: Option<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        let kind = ErrorKind::classify(code, error_type.as_deref(), &message);
        Self {
            kind,
            code,
            error_type,
            message,
        }
    }

    /// Build an error of a known kind, skipping classification
    pub fn with_kind(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: None,
            error_type: None,
            message: message.into(),
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.kind == ErrorKind::RateLimited
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ServiceError {}

/// Error returned by the client operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// Caller-supplied fields are missing or malformed
    #[error("{0}")]
    Validation(String),

    /// The backend kept throttling until retries ran out
    #[error("{}", RATE_LIMITED_MESSAGE)]
    RateLimited,

    /// The backend did not return the account it was asked to create
    #[error("Failed to create account")]
    AccountCreation,

    /// No authenticated account, or no profile document for it
    #[error("No signed-in user found")]
    NotFound,

    /// Signing out failed
    #[error("Failed to sign out: {0}")]
    SignOut(String),

    /// Any other backend failure, message passed through
    #[error(transparent)]
    Backend(#[from] ServiceError),

    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A backend document did not have the expected shape
    #[error("Failed to decode backend response: {0}")]
    Decode(String),
}

impl ClientError {
    /// True when the underlying backend failure was a rate limit
    ///
    /// `ClientError::RateLimited` itself is not retryable: it is the
    /// terminal form of an exhausted retry loop.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ClientError::Backend(e) if e.is_rate_limited())
    }
}

/// Type alias for Result with ClientError
pub type ClientResult<T> = Result<T, ClientError>;

/// Type alias for Result with ServiceError
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_rate_limit_by_code() {
        assert_eq!(
            ErrorKind::classify(Some(429), None, "slow down"),
            ErrorKind::RateLimited
        );
    }

    #[test]
    fn test_classify_rate_limit_by_message_any_case() {
        assert_eq!(
            ErrorKind::classify(Some(400), None, "Rate limit for the current endpoint has been exceeded"),
            ErrorKind::RateLimited
        );
        assert_eq!(
            ErrorKind::classify(None, None, "RATE LIMIT hit"),
            ErrorKind::RateLimited
        );
    }

    #[test]
    fn test_classify_rate_limit_by_type() {
        assert_eq!(
            ErrorKind::classify(Some(400), Some("general_rate_limit_exceeded"), "Too many requests"),
            ErrorKind::RateLimited
        );
    }

    #[test]
    fn test_classify_other_statuses() {
        assert_eq!(ErrorKind::classify(Some(401), None, "x"), ErrorKind::Unauthorized);
        assert_eq!(ErrorKind::classify(Some(404), None, "x"), ErrorKind::NotFound);
        assert_eq!(ErrorKind::classify(Some(409), None, "x"), ErrorKind::Conflict);
        assert_eq!(ErrorKind::classify(Some(500), None, "x"), ErrorKind::Other);
        assert_eq!(ErrorKind::classify(None, None, "x"), ErrorKind::Other);
    }

    #[test]
    fn test_backend_error_passes_message_through() {
        let err = ClientError::from(ServiceError::new(Some(400), None, "Invalid credentials"));
        assert_eq!(err.to_string(), "Invalid credentials");
        assert!(!err.is_rate_limited());
    }

    #[test]
    fn test_rate_limited_message() {
        assert_eq!(ClientError::RateLimited.to_string(), RATE_LIMITED_MESSAGE);
        assert!(!ClientError::RateLimited.is_rate_limited());
    }
}
