//! shop-api - Gateway REST API layer
//!
//! This crate provides the HTTP surface of the gateway: the aggregated
//! user-orders endpoint, a health check, and passthrough mounts for the
//! three backend services.
//!
//! # Usage
//!
//! ```ignore
//! use shop_api::{create_router, AppState};
//!
//! let aggregator = Aggregator::new(backend, tracer);
//! let router = create_router(AppState::new(aggregator), proxies);
//! ```

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use shop_proxy::{proxy_router, UpstreamProxy};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the gateway router with the given application state.
///
/// Each entry in `proxies` is mounted on its own prefix next to the
/// gateway's own routes.
pub fn create_router(state: AppState, proxies: Vec<Arc<UpstreamProxy>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        // Health check
        .route("/health", get(handlers::health::health))
        // Aggregated view
        .route(
            "/api/user/{user_id}/orders",
            get(handlers::aggregate::get_user_orders),
        )
        .with_state(state);

    // Passthrough mounts (/api/users, /api/orders, /api/inventory)
    for proxy in proxies {
        router = router.merge(proxy_router(proxy));
    }

    // Middleware
    router.layer(TraceLayer::new_for_http()).layer(cors)
}
