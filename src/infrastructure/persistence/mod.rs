//! Customer repository implementations.
//!
//! - [`PgCustomerRepository`] - PostgreSQL storage via SQLx
//! - [`InMemoryCustomerRepository`] - process-local storage, used when no database
//!   is configured and in tests

pub mod in_memory_customer_repository;
pub mod pg_customer_repository;

pub use in_memory_customer_repository::InMemoryCustomerRepository;
pub use pg_customer_repository::PgCustomerRepository;
