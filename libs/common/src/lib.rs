//! Common library for the food ordering client
//!
//! This crate provides the pieces shared by the backend access layer: the
//! error taxonomy and the retry-with-backoff policy applied to mutating
//! backend calls.

pub mod error;
pub mod retry;

pub use error::{ClientError, ClientResult, ErrorKind, ServiceError, ServiceResult};
pub use retry::RetryPolicy;
