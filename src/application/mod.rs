//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::customer_service::CustomerService`] - Customer CRUD, search and filtering

pub mod services;
