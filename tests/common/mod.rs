#![allow(dead_code)]

use axum_test::TestServer;
use customer_api::domain::entities::{Customer, CustomerStatus, NewCustomer};
use customer_api::domain::repositories::CustomerRepository;
use customer_api::infrastructure::persistence::InMemoryCustomerRepository;
use customer_api::routes::api_router;
use customer_api::state::AppState;
use std::sync::Arc;

pub fn create_test_state() -> (AppState, Arc<InMemoryCustomerRepository>) {
    let repo = Arc::new(InMemoryCustomerRepository::new());
    let state = AppState::new(repo.clone());
    (state, repo)
}

/// Full application router over a fresh in-memory store.
pub fn make_server() -> (TestServer, Arc<InMemoryCustomerRepository>) {
    let (state, repo) = create_test_state();
    let server = TestServer::new(api_router(state)).unwrap();
    (server, repo)
}

pub async fn create_test_customer(
    repo: &InMemoryCustomerRepository,
    name: &str,
    email: &str,
    status: CustomerStatus,
) -> Customer {
    repo.create(NewCustomer {
        name: name.to_string(),
        email: email.to_string(),
        phone: Some("+1 555 0100".to_string()),
        address: Some("1 Main St".to_string()),
        status,
    })
    .await
    .unwrap()
}

/// Seeds five customers, ids 1..=5:
/// John Smith (active), Alice Jones (inactive), Bob Stone (active),
/// Joanna White (suspended), Carol King (active).
pub async fn seed_customers(repo: &InMemoryCustomerRepository) -> Vec<Customer> {
    let mut customers = Vec::new();
    for (name, email, status) in [
        ("John Smith", "john@example.com", CustomerStatus::Active),
        ("Alice Jones", "alice@example.com", CustomerStatus::Inactive),
        ("Bob Stone", "bob@corp.io", CustomerStatus::Active),
        ("Joanna White", "joanna@example.com", CustomerStatus::Suspended),
        ("Carol King", "carol@corp.io", CustomerStatus::Active),
    ] {
        customers.push(create_test_customer(repo, name, email, status).await);
    }
    customers
}

pub fn names(json: &serde_json::Value) -> Vec<String> {
    json.as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect()
}
