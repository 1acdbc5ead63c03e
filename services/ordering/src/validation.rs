//! Input validation for the sign-in and sign-up forms

use common::{ClientError, ClientResult};
use regex::Regex;
use std::sync::OnceLock;

use crate::models::{Credentials, NewUserRequest};

/// Message shown when a required form field is empty
pub const MISSING_FIELDS_MESSAGE: &str = "Please enter valid email address & password.";

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    })
}

/// Check a form email address
///
/// Surrounding whitespace is ignored. An empty address is reported with the
/// same message as any other missing form field.
pub fn validate_email(email: &str) -> ClientResult<()> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ClientError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
    }

    if email.len() > 254 || !email_regex().is_match(email) {
        return Err(ClientError::Validation("Invalid email format".to_string()));
    }

    Ok(())
}

/// Validate the sign-in form
pub fn validate_credentials(credentials: &Credentials) -> ClientResult<()> {
    if credentials.password.is_empty() {
        return Err(ClientError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
    }

    validate_email(&credentials.email)
}

/// Validate the sign-up form
pub fn validate_sign_up(request: &NewUserRequest) -> ClientResult<()> {
    if request.name.trim().is_empty() {
        return Err(ClientError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
    }

    validate_credentials(&request.credentials())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ada@x.com").is_ok());
        assert!(validate_email(" ada@x.com ").is_ok());
        assert_eq!(
            validate_email("  ").unwrap_err().to_string(),
            MISSING_FIELDS_MESSAGE
        );
        assert!(validate_email("ada").is_err());
        assert!(validate_email("ada@x").is_err());
        let long = format!("{}@x.com", "a".repeat(250));
        assert_eq!(validate_email(&long).unwrap_err().to_string(), "Invalid email format");
    }

    #[test]
    fn test_missing_fields() {
        let err = validate_credentials(&Credentials::new("", "p@ss")).unwrap_err();
        assert_eq!(err.to_string(), MISSING_FIELDS_MESSAGE);

        let err = validate_credentials(&Credentials::new("ada@x.com", "")).unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));

        let err = validate_sign_up(&NewUserRequest::new(" ", "ada@x.com", "p@ss")).unwrap_err();
        assert_eq!(err.to_string(), MISSING_FIELDS_MESSAGE);
    }

    #[test]
    fn test_valid_forms() {
        assert!(validate_credentials(&Credentials::new("ada@x.com", "p@ss")).is_ok());
        assert!(validate_sign_up(&NewUserRequest::new("Ada", "ada@x.com", "p@ss")).is_ok());
    }

    #[test]
    fn test_malformed_email() {
        let err = validate_credentials(&Credentials::new("not-an-email", "p@ss")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid email format");
    }
}
