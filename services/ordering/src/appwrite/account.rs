//! Account and session endpoints

use async_trait::async_trait;
use common::{ErrorKind, ServiceError, ServiceResult};
use reqwest::Method;
use serde_json::{Value, json};
use tracing::info;

use super::AppwriteClient;
use crate::backend::{AccountApi, SessionProbe};
use crate::models::{Account, Session};

#[async_trait]
impl AccountApi for AppwriteClient {
    async fn create(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> ServiceResult<Option<Account>> {
        let request = self
            .http
            .request(Method::POST, self.url("/account"))
            .json(&json!({
                "userId": user_id,
                "email": email,
                "password": password,
                "name": name,
            }));

        let body: Option<Value> = self.send_json(request).await?;
        created_account(body)
    }

    async fn create_email_password_session(
        &self,
        email: &str,
        password: &str,
    ) -> ServiceResult<Session> {
        let request = self
            .http
            .request(Method::POST, self.url("/account/sessions/email"))
            .json(&json!({
                "email": email,
                "password": password,
            }));

        self.send_json(request).await
    }

    async fn delete_current_session(&self) -> ServiceResult<SessionProbe> {
        let request = self
            .http
            .request(Method::DELETE, self.url("/account/sessions/current"));

        match self.send(request).await {
            Ok(_) => Ok(SessionProbe::Deleted),
            Err(e) if e.kind == ErrorKind::Unauthorized => {
                info!("No active session to delete");
                Ok(SessionProbe::NoSession)
            }
            Err(e) => Err(e),
        }
    }

    async fn get(&self) -> ServiceResult<Option<Account>> {
        let request = self.http.request(Method::GET, self.url("/account"));

        match self.send_json::<Account>(request).await {
            Ok(account) => Ok(Some(account)),
            Err(e) if e.kind == ErrorKind::Unauthorized => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Account from a create response; a body without an id means nothing was created
fn created_account(body: Option<Value>) -> ServiceResult<Option<Account>> {
    let Some(body) = body else {
        return Ok(None);
    };

    let has_id = body
        .get("$id")
        .and_then(Value::as_str)
        .is_some_and(|id| !id.is_empty());
    if !has_id {
        return Ok(None);
    }

    serde_json::from_value(body).map(Some).map_err(|e| {
        ServiceError::with_kind(ErrorKind::Other, format!("Invalid backend response: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_account() {
        let account = created_account(Some(json!({
            "$id": "64f0c1a2b3c4d5e6f7a8",
            "name": "Ada",
            "email": "ada@x.com",
        })))
        .unwrap()
        .unwrap();
        assert_eq!(account.id, "64f0c1a2b3c4d5e6f7a8");
        assert_eq!(account.email, "ada@x.com");
    }

    #[test]
    fn test_created_account_without_id() {
        assert_eq!(created_account(None).unwrap(), None);
        assert_eq!(created_account(Some(json!({}))).unwrap(), None);
        assert_eq!(created_account(Some(json!({"$id": ""}))).unwrap(), None);
        assert_eq!(created_account(Some(Value::Null)).unwrap(), None);
    }
}
