//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod booking;
pub mod booking_item;
pub mod service;
pub mod user;
