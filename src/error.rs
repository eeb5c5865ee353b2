//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every failure a handler can produce, from a rejected bearer token to a lost database
//! connection, is one of its variants.
//!
//! `AppError` implements `actix_web::error::ResponseError` so handlers can return it
//! directly; each variant maps to a fixed status code and a JSON body of the form
//! `{"error": "<message>"}`. `From` implementations for `sqlx::Error`,
//! `validator::ValidationErrors`, `bcrypt::BcryptError` and `TokenError` allow the `?`
//! operator everywhere.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use validator::ValidationErrors;

use crate::auth::token::TokenError;

/// Represents all possible errors that can occur within the application.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Input passed deserialization but failed field validation (HTTP 422).
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// A malformed or otherwise unacceptable request (HTTP 400).
    #[error("{0}")]
    BadRequest(String),

    /// Registration with an email that already has an account (HTTP 400).
    #[error("Email already registered")]
    DuplicateEmail,

    /// Unknown email or wrong password. Deliberately indistinguishable (HTTP 401).
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Bearer token with a bad signature or structure (HTTP 401).
    #[error("Invalid token")]
    InvalidToken,

    /// Bearer token whose expiry has passed (HTTP 401).
    #[error("Token has expired")]
    ExpiredToken,

    /// Authentication is required but missing, or the token outlived its user (HTTP 401).
    #[error("{0}")]
    Unauthorized(String),

    /// The authenticated user lacks the required role (HTTP 403).
    #[error("{0}")]
    Forbidden(String),

    /// The resource does not exist or is not visible to the caller (HTTP 404).
    #[error("{0}")]
    NotFound(String),

    /// An error originating from database operations (HTTP 500).
    #[error("Database error: {0}")]
    Database(String),

    /// An unexpected server-side error (HTTP 500).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) | AppError::DuplicateEmail => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials
            | AppError::InvalidToken
            | AppError::ExpiredToken
            | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self {
            AppError::Validation(errors) => HttpResponse::build(status).json(json!({
                "error": "Validation failed",
                "details": errors
            })),
            // Server-side details stay in the log.
            AppError::Database(_) | AppError::Internal(_) => {
                log::error!("{}", self);
                HttpResponse::build(status).json(json!({
                    "error": "Internal server error"
                }))
            }
            _ => HttpResponse::build(status).json(json!({
                "error": self.to_string()
            })),
        }
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `sqlx::Error::RowNotFound` becomes `AppError::NotFound`; everything else is a
/// `AppError::Database`. Unique-constraint violations are mapped by the store that
/// knows which constraint was hit.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::Database(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        AppError::Validation(errors)
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(error.to_string())
    }
}

impl From<TokenError> for AppError {
    fn from(error: TokenError) -> AppError {
        match error {
            TokenError::Expired => AppError::ExpiredToken,
            TokenError::Invalid(_) => AppError::InvalidToken,
            TokenError::Encode(msg) => AppError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use validator::Validate;

    #[test]
    fn test_error_responses() {
        let cases = [
            (AppError::BadRequest("bad".into()), 400),
            (AppError::DuplicateEmail, 400),
            (AppError::InvalidCredentials, 401),
            (AppError::InvalidToken, 401),
            (AppError::ExpiredToken, 401),
            (AppError::Unauthorized("Missing bearer token".into()), 401),
            (AppError::Forbidden("Admins only".into()), 403),
            (AppError::NotFound("Task not found".into()), 404),
            (AppError::Database("connection reset".into()), 500),
            (AppError::Internal("boom".into()), 500),
        ];

        for (error, status) in cases {
            assert_eq!(error.error_response().status(), status, "{:?}", error);
        }
    }

    #[actix_rt::test]
    async fn test_internal_details_are_not_exposed() {
        let response = AppError::Database("password authentication failed".into()).error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Internal server error");
    }

    #[actix_rt::test]
    async fn test_validation_error_carries_field_detail() {
        #[derive(Validate)]
        struct Probe {
            #[validate(email)]
            email: String,
        }

        let errors = Probe {
            email: "not-an-email".into(),
        }
        .validate()
        .unwrap_err();
        let response = AppError::from(errors).error_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(!json["details"]["email"].is_null());
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        assert!(matches!(
            AppError::from(sqlx::Error::RowNotFound),
            AppError::NotFound(_)
        ));
    }

    #[test]
    fn test_token_errors_map_to_401_variants() {
        assert!(matches!(AppError::from(TokenError::Expired), AppError::ExpiredToken));
        assert!(matches!(
            AppError::from(TokenError::Invalid("InvalidSignature".into())),
            AppError::InvalidToken
        ));
    }
}
