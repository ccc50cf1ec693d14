//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`          - Health check (storage)
//! - `/api/customers/*`      - Customer REST API
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Any origin, no credentials
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{cors, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Routes and middleware, without trailing-slash normalization.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/api/customers", api::routes::customer_routes())
        .with_state(state)
        .layer(cors::layer())
        .layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
///
/// Trailing slashes are trimmed before routing, so `/api/customers/` reaches
/// the same handler as `/api/customers`.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(api_router(state))
}
