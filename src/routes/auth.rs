use crate::{
    auth::{credentials, AuthMiddleware, CurrentUser, LoginForm, RegisterRequest, TokenResponse},
    error::AppError,
    models::UserOut,
    state::AppState,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// Creates a regular account and returns it without the password hash.
///
/// ## Responses:
/// - `201 Created`: the new user.
/// - `400 Bad Request`: the email is already registered, or the body is malformed.
/// - `422 Unprocessable Entity`: invalid email format or password length.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    let user = credentials::register(
        &*state.users,
        &register_data.email,
        &register_data.password,
        state.config.bcrypt_cost,
    )
    .await?;

    Ok(HttpResponse::Created().json(UserOut::from(user)))
}

/// Login user
///
/// Accepts a form-encoded `username` (the email) and `password` and returns a
/// bearer token.
///
/// ## Responses:
/// - `200 OK`: `{"access_token": ..., "token_type": "bearer"}`.
/// - `401 Unauthorized`: unknown email or wrong password, indistinguishably.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    form: web::Form<LoginForm>,
) -> Result<impl Responder, AppError> {
    let access_token = credentials::login(
        &*state.users,
        &state.tokens,
        &form.username,
        &form.password,
    )
    .await?;

    Ok(HttpResponse::Ok().json(TokenResponse::bearer(access_token)))
}

/// Current user
///
/// Returns the account the bearer token resolves to.
#[get("/me", wrap = "AuthMiddleware")]
pub async fn me(user: CurrentUser) -> impl Responder {
    HttpResponse::Ok().json(UserOut::from(user.0))
}
