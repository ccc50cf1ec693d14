//! Shared state handed to every request handler.

use std::sync::Arc;

use crate::application::services::CustomerService;
use crate::domain::repositories::CustomerRepository;

/// Application state, cloned per request.
///
/// Holds only shared references; handlers never mutate it.
#[derive(Clone)]
pub struct AppState {
    pub customer_service: Arc<CustomerService>,
}

impl AppState {
    /// Builds the service graph on top of a customer repository.
    pub fn new(repository: Arc<dyn CustomerRepository>) -> Self {
        Self {
            customer_service: Arc::new(CustomerService::new(repository)),
        }
    }
}
