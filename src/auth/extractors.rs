use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};
use std::ops::Deref;

use crate::error::AppError;
use crate::models::{Role, User};

/// The user resolved by `AuthMiddleware` for the current request.
///
/// Only usable on routes wrapped by `AuthMiddleware`; anywhere else extraction
/// fails with 401.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl Deref for CurrentUser {
    type Target = User;

    fn deref(&self) -> &User {
        &self.0
    }
}

impl FromRequest for CurrentUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(current_user(req).map_err(Into::into))
    }
}

fn current_user(req: &HttpRequest) -> Result<CurrentUser, AppError> {
    req.extensions()
        .get::<User>()
        .cloned()
        .map(CurrentUser)
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".into()))
}

/// The current user, guaranteed to hold the admin role. Anyone else gets 403.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

impl Deref for AdminUser {
    type Target = User;

    fn deref(&self) -> &User {
        &self.0
    }
}

impl FromRequest for AdminUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(require_admin(req).map_err(Into::into))
    }
}

fn require_admin(req: &HttpRequest) -> Result<AdminUser, AppError> {
    let CurrentUser(user) = current_user(req)?;
    match user.role {
        Role::Admin => Ok(AdminUser(user)),
        Role::User => Err(AppError::Forbidden("Admins only".into())),
    }
}
