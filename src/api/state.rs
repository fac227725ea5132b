//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Cache, Database, Mailer};
use crate::services::{ServiceContainer, Services};

/// Application state shared by every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    /// All marketplace services
    pub services: Arc<dyn ServiceContainer>,
    /// Redis cache (rate limiting)
    pub cache: Arc<Cache>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Wire every service onto the shared database connection.
    pub fn from_config(
        database: Arc<Database>,
        cache: Arc<Cache>,
        config: Config,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let services = Arc::new(Services::from_connection(
            database.get_connection(),
            config,
            mailer,
        ));

        Self::new(services, cache, database)
    }

    /// Create application state with an already built container.
    pub fn new(
        services: Arc<dyn ServiceContainer>,
        cache: Arc<Cache>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            services,
            cache,
            database,
        }
    }
}
