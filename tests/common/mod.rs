//! Shared helpers for the HTTP integration tests.
//!
//! Apps are built over `MemoryStore`, so these tests need no database.
#![allow(dead_code)]

use actix_http::Request;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::{header, StatusCode},
    middleware::Logger,
    test, web, App,
};
use jsonwebtoken::Algorithm;
use serde_json::json;
use std::sync::Arc;
use tasktrack::{
    auth::TokenResponse, config::Config, models::UserOut, routes, store::MemoryStore, AppState,
};

pub const TEST_SECRET: &str = "integration-test-secret";

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        database_max_connections: 1,
        jwt_secret: TEST_SECRET.to_string(),
        jwt_algorithm: Algorithm::HS256,
        access_token_expire_minutes: 30,
        bcrypt_cost: 4,
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        cors_origins: Vec::new(),
        env: "test".to_string(),
    }
}

/// Fresh state over an empty in-process store. The store handle is returned too,
/// for tests that change data behind the API's back.
pub fn memory_state() -> (web::Data<AppState>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = web::Data::new(AppState::with_store(test_config(), store.clone()));
    (state, store)
}

pub async fn init_app(
    state: web::Data<AppState>,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(state)
            .wrap(routes::cors(&[]))
            .wrap(Logger::default())
            .configure(routes::config),
    )
    .await
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

pub struct TestUser {
    pub id: i32,
    pub email: String,
    pub token: String,
}

pub async fn register_user<S, B>(app: &S, email: &str, password: &str) -> UserOut
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    assert_eq!(
        status,
        StatusCode::CREATED,
        "Registration of {} failed. Body: {:?}",
        email,
        String::from_utf8_lossy(&body)
    );
    serde_json::from_slice(&body).expect("Failed to parse registration response")
}

pub async fn login_user<S, B>(app: &S, email: &str, password: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_form([("username", email), ("password", password)])
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    assert_eq!(
        status,
        StatusCode::OK,
        "Login of {} failed. Body: {:?}",
        email,
        String::from_utf8_lossy(&body)
    );
    let token: TokenResponse =
        serde_json::from_slice(&body).expect("Failed to parse login response");
    assert_eq!(token.token_type, "bearer");
    token.access_token
}

pub async fn register_and_login<S, B>(app: &S, email: &str, password: &str) -> TestUser
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let user = register_user(app, email, password).await;
    let token = login_user(app, email, password).await;
    TestUser {
        id: user.id,
        email: user.email,
        token,
    }
}
