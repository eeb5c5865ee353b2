pub mod credentials;
pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

// Re-export necessary items
pub use extractors::{AdminUser, CurrentUser};
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenError, TokenService};

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address for the new account; also the login identifier.
    /// Must be a valid email format.
    #[validate(email)]
    pub email: String,
    /// Password for the new account.
    /// bcrypt only looks at the first 72 bytes, so longer passwords are refused.
    #[validate(length(min = 1), custom = "validate_password_bytes")]
    pub password: String,
}

/// Measures in bytes, not characters: `"é".repeat(40)` is 40 characters but 80 bytes.
fn validate_password_bytes(value: &str) -> Result<(), ValidationError> {
    if value.len() > password::MAX_PASSWORD_BYTES {
        let mut error = ValidationError::new("password_too_long");
        error.message = Some("Password must be at most 72 bytes".into());
        return Err(error);
    }
    Ok(())
}

/// Form-encoded login payload in the OAuth2 password-grant shape: the email goes
/// in `username`.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Response structure after a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The signed bearer token.
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_register_request_validation() {
        let valid_register = RegisterRequest {
            email: "a@x.com".to_string(),
            password: "pw1".to_string(),
        };
        assert!(valid_register.validate().is_ok());

        let invalid_email_register = RegisterRequest {
            email: "testexample.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(invalid_email_register.validate().is_err());

        let empty_password_register = RegisterRequest {
            email: "a@x.com".to_string(),
            password: String::new(),
        };
        assert!(empty_password_register.validate().is_err());

        let long_password_register = RegisterRequest {
            email: "a@x.com".to_string(),
            password: "p".repeat(73),
        };
        assert!(long_password_register.validate().is_err());

        let multibyte_password_register = RegisterRequest {
            email: "a@x.com".to_string(),
            password: "é".repeat(40),
        };
        assert!(multibyte_password_register.validate().is_err());

        let exactly_72_bytes = RegisterRequest {
            email: "a@x.com".to_string(),
            password: "é".repeat(36),
        };
        assert!(exactly_72_bytes.validate().is_ok());
    }

    #[test]
    fn test_token_response_shape() {
        let json = serde_json::to_value(TokenResponse::bearer("abc".into())).unwrap();
        assert_eq!(json["access_token"], "abc");
        assert_eq!(json["token_type"], "bearer");
    }
}
