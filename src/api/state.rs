//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, UploadStore};
use crate::services::{
    AuthService, BookingService, CatalogService, ServiceContainer, Services, UserService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Catalog service
    pub catalog_service: Arc<dyn CatalogService>,
    /// Booking service
    pub booking_service: Arc<dyn BookingService>,
    /// Database connection
    pub database: Arc<Database>,
    /// Uploaded image storage
    pub uploads: Arc<UploadStore>,
    /// Runtime configuration (cookie flags, session lifetime)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create application state from database connection and config.
    ///
    /// This is the recommended way to create AppState as it uses
    /// the ServiceContainer for centralized service management.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config.clone());
        Self::from_container(&container, database, config)
    }

    /// Create application state around an existing service container.
    pub fn from_container(
        container: &dyn ServiceContainer,
        database: Arc<Database>,
        config: Config,
    ) -> Self {
        Self {
            auth_service: container.auth(),
            user_service: container.users(),
            catalog_service: container.catalog(),
            booking_service: container.bookings(),
            database,
            uploads: Arc::new(UploadStore::new(&config.upload_dir)),
            config: Arc::new(config),
        }
    }
}
