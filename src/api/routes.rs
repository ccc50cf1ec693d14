//! Customer API route configuration.

use crate::api::handlers::{
    advanced_search_handler, create_customer_handler, customers_by_status_handler,
    delete_customer_handler, get_customer_handler, list_all_customers_handler,
    list_customers_handler, patch_customer_handler, search_customers_handler,
    update_customer_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Customer routes, nested under `/api/customers`.
///
/// # Endpoints
///
/// - `GET    /`                  - List, optionally paged (`page`, `size`) and sorted (`sortBy`, `sortDir`)
/// - `POST   /`                  - Create a customer
/// - `GET    /all`               - List every customer
/// - `GET    /search`            - Keyword search (`keyword`)
/// - `GET    /status/{status}`   - Filter by status
/// - `GET    /advanced-search`   - Filter by any of `name`, `email`, `status`
/// - `GET    /{id}`              - Get one customer
/// - `PUT    /{id}`              - Replace a customer
/// - `PATCH  /{id}`              - Partially update a customer
/// - `DELETE /{id}`              - Delete a customer
///
/// Static segments take precedence over the `{id}` capture, so `/all` or
/// `/search` are never parsed as an id.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_customers_handler).post(create_customer_handler),
        )
        .route("/all", get(list_all_customers_handler))
        .route("/search", get(search_customers_handler))
        .route("/status/{status}", get(customers_by_status_handler))
        .route("/advanced-search", get(advanced_search_handler))
        .route(
            "/{id}",
            get(get_customer_handler)
                .put(update_customer_handler)
                .patch(patch_customer_handler)
                .delete(delete_customer_handler),
        )
}
