//! Backend access layer for the food ordering app
//!
//! The screens call into [`BackendClient`] for sign-up, sign-in, sign-out,
//! the current user's profile, the menu and its categories. The client
//! talks to the hosted backend through [`appwrite::AppwriteClient`], or to
//! any other implementation of the [`backend`] traits such as
//! [`memory::InMemoryBackend`].

pub mod alert;
pub mod appwrite;
pub mod backend;
pub mod client;
pub mod config;
pub mod memory;
pub mod models;
pub mod validation;

pub use crate::alert::Alert;
pub use crate::client::BackendClient;
pub use crate::config::BackendConfig;
pub use common::{ClientError, ClientResult};
