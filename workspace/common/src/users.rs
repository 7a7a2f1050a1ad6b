use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use std::borrow::Cow;
use validator::{Validate, ValidationError};

/// Request body for `POST /signup`.
///
/// Password strength is a business rule and is checked by the signup use
/// case, not here.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, PartialEq)]
pub struct SignupRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(
        length(min = 1, message = "is required"),
        custom(function = "alphanumeric")
    )]
    pub username: String,
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

/// Request body for `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, PartialEq)]
pub struct LoginRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

/// Successful login payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct LoginResponse {
    /// Signed bearer token
    pub token: String,
}

/// Public view of a freshly registered user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub username: String,
}

fn alphanumeric(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(ValidationError::new("alphanumeric")
            .with_message(Cow::Borrowed("must contain only letters and digits")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation_messages;

    fn signup(email: &str, username: &str, password: &str) -> SignupRequest {
        SignupRequest {
            email: email.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_valid_signup_shape() {
        assert!(signup("neo@example.com", "neo42", "whatever").validate().is_ok());
    }

    #[test]
    fn test_signup_rejects_bad_email_and_username() {
        let errors = signup("not-an-email", "neo anderson", "x").validate().unwrap_err();
        let messages = validation_messages(&errors);

        assert_eq!(
            messages,
            vec![
                "email: must be a valid email address".to_string(),
                "username: must contain only letters and digits".to_string(),
            ]
        );
    }

    #[test]
    fn test_login_requires_password() {
        let request = LoginRequest {
            email: "neo@example.com".to_string(),
            password: String::new(),
        };
        let messages = validation_messages(&request.validate().unwrap_err());

        assert_eq!(messages, vec!["password: is required".to_string()]);
    }
}
