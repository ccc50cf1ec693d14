//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated via
//! `mockall` for unit tests.

pub mod customer_repository;

pub use customer_repository::{CustomerFilter, CustomerRepository, matches_keyword};

#[cfg(test)]
pub use customer_repository::MockCustomerRepository;
