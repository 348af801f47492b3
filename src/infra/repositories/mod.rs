//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod booking_repository;
pub(crate) mod entities;
mod service_repository;
mod user_repository;

pub use booking_repository::{BookingRepository, BookingStore};
pub use service_repository::{catalog_query, ServiceRepository, ServiceStore};
pub use user_repository::{NewUser, UserRepository, UserStore};

#[cfg(test)]
pub use booking_repository::MockBookingRepository;
#[cfg(test)]
pub use service_repository::MockServiceRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
