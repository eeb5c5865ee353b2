#![doc = "The `tasktrack` library crate."]
#![doc = ""]
#![doc = "Authentication (password hashing, bearer tokens, access-control middleware),"]
#![doc = "owner-scoped task storage, routing configuration and error handling for the"]
#![doc = "task tracker. The `tasktrack` binary serves it; the `seed` binary fills a"]
#![doc = "database with demo data."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use error::AppError;
pub use state::AppState;
