//! Core domain entities.
//!
//! - [`Customer`] - A persisted customer record
//! - [`NewCustomer`] - Values for creating or fully replacing a customer
//! - [`CustomerPatch`] - Partial update, `None` fields unchanged
//! - [`CustomerStatus`] - Account lifecycle state

pub mod customer;

pub use customer::{Customer, CustomerPatch, CustomerStatus, NewCustomer, normalize_email};
