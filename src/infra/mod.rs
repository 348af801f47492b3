//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections, migrations and repositories
//! - Unit of Work for repository access
//! - Uploaded file storage

pub mod db;
pub mod repositories;
pub mod unit_of_work;
pub mod uploads;

pub use db::{Database, Migrator};
pub use repositories::{
    catalog_query, BookingRepository, BookingStore, NewUser, ServiceRepository, ServiceStore,
    UserRepository, UserStore,
};
pub use unit_of_work::{Persistence, UnitOfWork};
pub use uploads::{StoredFile, UploadStore};

#[cfg(test)]
pub use repositories::{MockBookingRepository, MockServiceRepository, MockUserRepository};
