//! Domain layer containing business entities and repository contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Customer record and the value types used to create and modify it
//! - [`paging`] - Sorting and pagination primitives
//! - [`repositories`] - Data access trait definitions
//!
//! The domain layer has no dependencies on the infrastructure or API layers.
//! Business rules live in services (see [`crate::application::services`]).

pub mod entities;
pub mod paging;
pub mod repositories;
