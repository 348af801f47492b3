//! Door Elite - Home-services marketplace backend
//!
//! Customers browse a catalog of home services, book one or more of them for
//! an address and time slot, and follow each booking through its lifecycle.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and logic (booking state machine, totals)
//! - **services**: Application use cases
//! - **infra**: Infrastructure concerns (database, repositories, uploads)
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared response envelope
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Load the demo catalog and an admin account
//! cargo run -- seed services
//! cargo run -- seed user --email admin@example.com --password secret123 --name Admin --admin
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Booking, BookingStatus, Password, Service, User, UserRole};
pub use errors::{AppError, AppResult};
