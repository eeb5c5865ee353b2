use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, AUTHORIZATION},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;

use crate::error::AppError;
use crate::models::User;
use crate::state::AppState;

/// Resolves the bearer token of every request it wraps to a [`User`] and stores
/// that user in the request extensions.
///
/// Requests without a valid token, or whose token belongs to a deleted account,
/// are answered with 401 before reaching the handler.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let user = authenticate(&req).await?;
            req.extensions_mut().insert(user);
            service.call(req).await
        })
    }
}

async fn authenticate(req: &ServiceRequest) -> Result<User, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("AppState is not registered".into()))?;

    let token = bearer_token(req.headers())
        .ok_or_else(|| AppError::Unauthorized("Missing bearer token".into()))?;

    let claims = state.tokens.verify(token).map_err(|e| {
        log::debug!("Rejected bearer token on {}: {}", req.path(), e);
        AppError::from(e)
    })?;

    state
        .users
        .find_user_by_id(claims.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))
}

/// Returns the token of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
