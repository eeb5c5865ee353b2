use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::models::Role;

/// Errors produced while issuing or verifying tokens.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Failed to generate token: {0}")]
    Encode(String),
}

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject of the token: the user's email.
    pub sub: String,
    /// Numeric id of the user.
    pub user_id: i32,
    /// Role at the time the token was issued.
    pub role: Role,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Issues and verifies signed, time-limited bearer tokens.
///
/// Built once from [`Config`]; the secret and algorithm never change afterwards.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    default_ttl_minutes: i64,
}

impl TokenService {
    pub fn new(secret: &[u8], algorithm: Algorithm, default_ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            algorithm,
            default_ttl_minutes,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.jwt_secret.as_bytes(),
            config.jwt_algorithm,
            config.access_token_expire_minutes,
        )
    }

    /// Issues a token expiring after the configured default lifetime.
    pub fn issue(&self, subject: &str, user_id: i32, role: Role) -> Result<String, TokenError> {
        self.issue_with_ttl(subject, user_id, role, self.default_ttl_minutes)
    }

    /// Issues a token expiring `ttl_minutes` from now. A negative TTL yields an
    /// already-expired token.
    pub fn issue_with_ttl(
        &self,
        subject: &str,
        user_id: i32,
        role: Role,
        ttl_minutes: i64,
    ) -> Result<String, TokenError> {
        let expiration = Utc::now()
            .checked_add_signed(Duration::minutes(ttl_minutes))
            .ok_or_else(|| TokenError::Encode("expiry out of range".into()))?
            .timestamp();

        let claims = Claims {
            sub: subject.to_string(),
            user_id,
            role,
            exp: usize::try_from(expiration)
                .map_err(|_| TokenError::Encode("expiry before epoch".into()))?,
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding)
            .map_err(|e| TokenError::Encode(e.to_string()))
    }

    /// Verifies the signature and expiry of a token and returns its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(format!("{:?}", e.kind())),
            })
    }
}
