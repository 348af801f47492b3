//! Unit of Work: a single hub for repository access.
//!
//! Services receive one `Arc<dyn UnitOfWork>` and reach every aggregate's
//! repository through it. Multi-row writes that must be atomic (a booking
//! header and its lines) run inside a database transaction opened by the
//! owning repository.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::repositories::{
    BookingRepository, BookingStore, ServiceRepository, ServiceStore, UserRepository, UserStore,
};

/// Unit of Work trait for dependency injection.
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get catalog repository
    fn services(&self) -> Arc<dyn ServiceRepository>;

    /// Get booking repository
    fn bookings(&self) -> Arc<dyn BookingRepository>;
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    user_repo: Arc<UserStore>,
    service_repo: Arc<ServiceStore>,
    booking_repo: Arc<BookingStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            service_repo: Arc::new(ServiceStore::new(db.clone())),
            booking_repo: Arc::new(BookingStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn services(&self) -> Arc<dyn ServiceRepository> {
        self.service_repo.clone()
    }

    fn bookings(&self) -> Arc<dyn BookingRepository> {
        self.booking_repo.clone()
    }
}
