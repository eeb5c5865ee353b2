use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Role of an account.
/// Corresponds to the `role_enum` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[sqlx(type_name = "role_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular account; sees only its own tasks.
    #[default]
    User,
    /// Administrator; may list every user's tasks.
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user record as stored in the database.
///
/// Never serialized directly: the password hash must not leave the server.
/// Use [`UserOut`] for responses.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of a user returned by the API.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UserOut {
    pub id: i32,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserOut {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
            created_at: user.created_at,
        }
    }
}

impl From<User> for UserOut {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}
