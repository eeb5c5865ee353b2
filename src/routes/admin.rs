use crate::{
    auth::AdminUser, error::AppError, models::UserOut, routes::tasks::ListQuery,
    state::AppState,
};
use actix_web::{get, web, HttpResponse, Responder};

/// Lists registered users. Admins only.
#[get("/users")]
pub async fn list_users(
    state: web::Data<AppState>,
    _admin: AdminUser,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AppError> {
    let users: Vec<UserOut> = state
        .users
        .list_users(query.page())
        .await?
        .into_iter()
        .map(UserOut::from)
        .collect();

    Ok(HttpResponse::Ok().json(users))
}
