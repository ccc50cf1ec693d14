//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod customers;
pub mod health;

pub use customers::{
    advanced_search_handler, create_customer_handler, customers_by_status_handler,
    delete_customer_handler, get_customer_handler, list_all_customers_handler,
    list_customers_handler, patch_customer_handler, search_customers_handler,
    update_customer_handler,
};
pub use health::health_handler;
