//! inventory-service - Product catalog backend
//!
//! Serves the product records the gateway enriches order items with.
//! Router construction lives here so tests can mount the service
//! in-process; the binary only adds config loading and a listener.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use shop_trace::Tracer;

pub mod config;
mod routes;
mod store;

pub use config::{ConfigError, ServiceConfig};
pub use store::InventoryStore;

/// Shared state behind every route
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<InventoryStore>,
    pub tracer: Tracer,
    /// Upper bound for the simulated database delay in milliseconds.
    /// Zero disables the delay.
    pub max_query_delay_ms: u64,
}

impl AppState {
    pub fn new(store: InventoryStore, tracer: Tracer) -> Self {
        Self {
            store: Arc::new(store),
            tracer,
            max_query_delay_ms: 0,
        }
    }
}

/// Build the service router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/inventory", get(routes::get_inventory))
        .route("/inventory/{product_id}", get(routes::get_product))
        .with_state(state)
}
