//! order-service - Order backend
//!
//! Serves the order records behind the storefront gateway and accepts
//! new orders. Creation is the interesting path: the order is only
//! written after the user is verified against the user service and
//! every line item is checked against the inventory service, each
//! under its own child span of the request's `create_order` span.
//!
//! Router construction lives here so tests can mount the service
//! in-process; the binary only adds config loading and a listener.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use shop_client::BackendClient;
use shop_trace::Tracer;

pub mod config;
mod routes;
mod store;

pub use config::{ConfigError, ServiceConfig};
pub use routes::CreateOrderRequest;
pub use store::{OrderStore, DEFAULT_UNIT_PRICE};

/// Shared state behind every route
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<OrderStore>,
    pub tracer: Tracer,
    /// Client for the user service (order validation)
    pub users: BackendClient,
    /// Client for the inventory service (line-item validation)
    pub inventory: BackendClient,
    /// Upper bound for the simulated database delay in milliseconds.
    /// Zero disables the delay.
    pub max_query_delay_ms: u64,
}

impl AppState {
    pub fn new(
        store: OrderStore,
        tracer: Tracer,
        users: BackendClient,
        inventory: BackendClient,
    ) -> Self {
        Self {
            store: Arc::new(store),
            tracer,
            users,
            inventory,
            max_query_delay_ms: 0,
        }
    }
}

/// Build the service router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/orders", get(routes::get_orders).post(routes::create_order))
        .route("/orders/{id}", get(routes::get_order))
        .with_state(state)
}
