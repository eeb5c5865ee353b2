//! Process configuration, read once at startup.

use jsonwebtoken::Algorithm;
use std::env;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value: {value}")]
    Invalid { var: &'static str, value: String },
}

/// Application settings shared by the token service, the storage layer and the
/// HTTP server.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_algorithm: Algorithm,
    pub access_token_expire_minutes: i64,
    pub bcrypt_cost: u32,
    pub server_host: String,
    pub server_port: u16,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
    pub env: String,
}

impl Config {
    /// Reads the configuration from process environment variables.
    ///
    /// Call `dotenv::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| lookup(var).ok_or(ConfigError::Missing(var));

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_algorithm: parse_algorithm(lookup("JWT_ALGORITHM"))?,
            access_token_expire_minutes: parse_or(&lookup, "ACCESS_TOKEN_EXPIRE_MINUTES", 30)?,
            bcrypt_cost: parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            server_port: parse_or(&lookup, "SERVER_PORT", 8080)?,
            cors_origins: lookup("CORS_ORIGINS")
                .map(|raw| split_origins(&raw))
                .unwrap_or_default(),
            env: lookup("APP_ENV").unwrap_or_else(|| "dev".to_string()),
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        Some(value) => {
            let parsed: Result<T, _> = value.trim().parse();
            parsed.map_err(|_| ConfigError::Invalid { var, value })
        }
        None => Ok(default),
    }
}

// Tokens are signed with a shared secret, so only the HMAC family applies.
fn parse_algorithm(value: Option<String>) -> Result<Algorithm, ConfigError> {
    match value.as_deref().map(str::trim) {
        None | Some("HS256") => Ok(Algorithm::HS256),
        Some("HS384") => Ok(Algorithm::HS384),
        Some("HS512") => Ok(Algorithm::HS512),
        Some(other) => Err(ConfigError::Invalid {
            var: "JWT_ALGORITHM",
            value: other.to_string(),
        }),
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
