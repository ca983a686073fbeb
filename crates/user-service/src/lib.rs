//! user-service - User directory backend
//!
//! Serves the user records behind the storefront gateway. Router
//! construction lives here so tests can mount the service in-process;
//! the binary only adds config loading and a listener on top.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use shop_trace::Tracer;

pub mod config;
mod routes;
mod store;

pub use config::{ConfigError, ServiceConfig};
pub use store::UserStore;

/// Shared state behind every route
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<UserStore>,
    pub tracer: Tracer,
    /// Upper bound for the simulated database delay in milliseconds.
    /// Zero disables the delay.
    pub max_query_delay_ms: u64,
}

impl AppState {
    pub fn new(store: UserStore, tracer: Tracer) -> Self {
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
        .route("/users", get(routes::get_users))
        .route("/users/{id}", get(routes::get_user))
        .with_state(state)
}
