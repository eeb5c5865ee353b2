//! Connection pool bootstrap and embedded migrations.

use sqlx::{migrate::MigrateError, postgres::PgPoolOptions, PgPool};

use crate::config::Config;

/// Opens the connection pool described by `config`.
pub async fn connect(config: &Config) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
}

/// Applies any pending migrations from `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
