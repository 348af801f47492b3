//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns:
//! users, the service catalog, and the booking state machine.

pub mod booking;
pub mod catalog;
pub mod password;
pub mod user;

pub use booking::{
    Booking, BookingItem, BookingLineResponse, BookingRequest, BookingResponse, BookingStatus,
    LineRequest, NewBooking, PaymentStatus, ServiceRef, MOBILE_PATTERN,
};
pub use catalog::{
    CatalogFilter, NewService, Service, ServiceChanges, ServiceSummary, ServiceType, SortKey,
};
pub use password::Password;
pub use user::{ProfileUpdate, User, UserResponse, UserRole};
