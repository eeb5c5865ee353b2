use std::sync::Arc;

use crate::auth::TokenService;
use crate::config::Config;
use crate::store::{TaskStore, UserStore};

/// Shared application state, registered once as `web::Data<AppState>`.
pub struct AppState {
    pub config: Arc<Config>,
    pub tokens: TokenService,
    pub users: Arc<dyn UserStore>,
    pub tasks: Arc<dyn TaskStore>,
}

impl AppState {
    pub fn new(config: Config, users: Arc<dyn UserStore>, tasks: Arc<dyn TaskStore>) -> Self {
        Self {
            tokens: TokenService::from_config(&config),
            config: Arc::new(config),
            users,
            tasks,
        }
    }

    /// Builds state around a single store that holds both users and tasks.
    pub fn with_store<S>(config: Config, store: Arc<S>) -> Self
    where
        S: UserStore + TaskStore + 'static,
    {
        Self::new(config, store.clone(), store)
    }
}
