//! HTTP request handlers.

pub mod booking_handler;
pub mod catalog_handler;
pub mod user_handler;

pub use booking_handler::booking_routes;
pub use catalog_handler::{catalog_admin_routes, catalog_routes};
pub use user_handler::{user_protected_routes, user_public_routes};
