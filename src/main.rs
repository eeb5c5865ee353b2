use actix_web::{middleware::Logger, web, App, HttpServer};
use std::io;
use std::sync::Arc;

use tasktrack::{config::Config, db, routes, store::PgStore, AppState};

fn startup_error(context: &str, error: impl std::fmt::Display) -> io::Error {
    log::error!("{}: {}", context, error);
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, error))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| startup_error("Invalid configuration", e))?;

    let pool = db::connect(&config)
        .await
        .map_err(|e| startup_error("Failed to connect to database", e))?;
    db::run_migrations(&pool)
        .await
        .map_err(|e| startup_error("Failed to run migrations", e))?;

    let bind_address = (config.server_host.clone(), config.server_port);
    let cors_origins = config.cors_origins.clone();
    log::info!(
        "Starting tasktrack ({}) at {}",
        config.env,
        config.server_url()
    );

    let state = web::Data::new(AppState::with_store(config, Arc::new(PgStore::new(pool))));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(routes::cors(&cors_origins))
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind(bind_address)?
    .run()
    .await
}
