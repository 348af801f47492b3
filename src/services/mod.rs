//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! All services use the Unit of Work hub for repository access.

mod auth_service;
mod booking_service;
mod catalog_service;
pub mod container;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, Claims, Session};
pub use booking_service::{BookingManager, BookingService};
pub use catalog_service::{CatalogManager, CatalogService};
pub use user_service::{UserManager, UserService};
