//! Cross-origin resource sharing policy.

use tower_http::cors::{Any, CorsLayer};

/// Allows requests from any origin, with any method and header. No credentials.
pub fn layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
