use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::TokenService;
use crate::error::AppError;
use crate::models::{Role, User};
use crate::store::UserStore;

/// Creates a regular account.
///
/// Concurrent registrations of one email are settled by the store's unique
/// constraint, which also yields `DuplicateEmail`.
pub async fn register(
    users: &dyn UserStore,
    email: &str,
    password: &str,
    bcrypt_cost: u32,
) -> Result<User, AppError> {
    if users.find_user_by_email(email).await?.is_some() {
        return Err(AppError::DuplicateEmail);
    }

    let password_hash = hash_password(password, bcrypt_cost)?;
    let user = users.create_user(email, &password_hash, Role::User).await?;
    log::info!("Registered user {}", user.id);
    Ok(user)
}

/// Checks credentials and issues an access token.
///
/// Unknown email and wrong password fail identically.
pub async fn login(
    users: &dyn UserStore,
    tokens: &TokenService,
    email: &str,
    password: &str,
) -> Result<String, AppError> {
    let user = match users.find_user_by_email(email).await? {
        Some(user) if verify_password(password, &user.password_hash) => user,
        _ => {
            log::debug!("Rejected login attempt");
            return Err(AppError::InvalidCredentials);
        }
    };

    Ok(tokens.issue(&user.email, user.id, user.role)?)
}
