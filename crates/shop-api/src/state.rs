//! Application state for the gateway API

use shop_gateway::Aggregator;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Aggregation pipeline over the three backend services
    pub aggregator: Aggregator,
}

impl AppState {
    pub fn new(aggregator: Aggregator) -> Self {
        Self { aggregator }
    }
}
