//! Account, session and user profile models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Email/password pair used to create a session
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Sign-up payload
#[derive(Clone, Serialize, Deserialize)]
pub struct NewUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl NewUserRequest {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Credentials for the session opened right after sign-up
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.email.clone(), self.password.clone())
    }
}

impl fmt::Debug for NewUserRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUserRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Backend account identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "$createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Backend session; opaque apart from its identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire: Option<DateTime<Utc>>,
    #[serde(default)]
    pub current: bool,
}

/// Profile document created at sign-up in the users collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "$id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(rename = "accountId")]
    pub account_id: String,
    pub name: String,
    pub email: String,
    /// Avatar image URL
    #[serde(rename = "avatar")]
    pub avatar_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let request = NewUserRequest::new("Ada", "ada@x.com", "p@ss");
        let debug = format!("{:?}", request);
        assert!(debug.contains("ada@x.com"));
        assert!(!debug.contains("p@ss"));

        let debug = format!("{:?}", request.credentials());
        assert!(!debug.contains("p@ss"));
    }

    #[test]
    fn test_user_profile_document_shape() {
        let doc = serde_json::json!({
            "$id": "doc1",
            "$collectionId": "users",
            "accountId": "acc1",
            "name": "Ada",
            "email": "ada@x.com",
            "avatar": "https://cloud.appwrite.io/v1/avatars/initials?name=Ada"
        });

        let profile: UserProfile = serde_json::from_value(doc).unwrap();
        assert_eq!(profile.id, "doc1");
        assert_eq!(profile.account_id, "acc1");
        assert_eq!(
            profile.avatar_url,
            "https://cloud.appwrite.io/v1/avatars/initials?name=Ada"
        );
    }

    #[test]
    fn test_account_timestamp_parses() {
        let account: Account = serde_json::from_value(serde_json::json!({
            "$id": "acc1",
            "$createdAt": "2025-08-15T10:00:00.000+00:00",
            "name": "Ada",
            "email": "ada@x.com",
            "status": true
        }))
        .unwrap();

        assert_eq!(account.id, "acc1");
        assert!(account.created_at.is_some());
    }
}
