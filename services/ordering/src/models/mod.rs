//! Data transfer objects exchanged with the backend

pub mod document;
pub mod menu;
pub mod user;

// Re-export for convenience
pub use document::DocumentList;
pub use menu::{Category, MenuItem, MenuQuery};
pub use user::{Account, Credentials, NewUserRequest, Session, UserProfile};
