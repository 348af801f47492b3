//! Service Container - Centralized service access.
//!
//! SOLID (SRP): Manages service lifecycle and access.
//! SOLID (DIP): Depends on service traits, not implementations.
//!
//! One container is built at start-up around a single `Persistence` hub and
//! handed to the HTTP layer; nothing is looked up globally.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, BookingManager, BookingService, CatalogManager, CatalogService,
    UserManager, UserService,
};
use crate::config::Config;
use crate::infra::Persistence;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;

    /// Get catalog service
    fn catalog(&self) -> Arc<dyn CatalogService>;

    /// Get booking service
    fn bookings(&self) -> Arc<dyn BookingService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    catalog_service: Arc<dyn CatalogService>,
    booking_service: Arc<dyn BookingService>,
}

impl Services {
    /// Create a service container from already built services
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        catalog_service: Arc<dyn CatalogService>,
        booking_service: Arc<dyn BookingService>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            catalog_service,
            booking_service,
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: Arc<sea_orm::DatabaseConnection>, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            user_service: Arc::new(UserManager::new(uow.clone())),
            catalog_service: Arc::new(CatalogManager::new(uow.clone())),
            booking_service: Arc::new(BookingManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogService> {
        self.catalog_service.clone()
    }

    fn bookings(&self) -> Arc<dyn BookingService> {
        self.booking_service.clone()
    }
}
