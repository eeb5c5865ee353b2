pub mod admin;
pub mod auth;
pub mod health;
pub mod tasks;

use actix_cors::Cors;
use actix_web::web;

use crate::auth::AuthMiddleware;

/// Registers every route. `/auth/register` and `/auth/login` are public; the task
/// and admin scopes and `/auth/me` go through `AuthMiddleware`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(health::index)
        .service(
            web::scope("/auth")
                .service(auth::register)
                .service(auth::login)
                .service(auth::me),
        )
        .service(
            web::scope("/tasks")
                .wrap(AuthMiddleware)
                .service(tasks::list_tasks)
                .service(tasks::create_task)
                .service(tasks::get_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        )
        .service(
            web::scope("/admin")
                .wrap(AuthMiddleware)
                .service(admin::list_users),
        );
}

/// CORS policy: any origin when `origins` is empty, otherwise only the listed ones.
pub fn cors(origins: &[String]) -> Cors {
    let cors = if origins.is_empty() {
        Cors::default().allow_any_origin()
    } else {
        origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allow_any_method().allow_any_header().max_age(3600)
}
