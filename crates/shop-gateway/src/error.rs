//! Aggregation failure classification
//!
//! Upstream failures collapse into two client-visible outcomes: the
//! requested user does not exist, or an upstream dependency failed. The
//! full upstream detail stays on the error source (and on the span) and
//! is never forwarded to the HTTP client.

use shop_core::BackendError;
use thiserror::Error;

/// Result type for aggregation operations
pub type AggregateResult<T> = Result<T, AggregateError>;

/// Errors the aggregation pipeline can end in.
///
/// Per-item enrichment failures are not represented here: they degrade
/// the affected item to `product_details: null` and never abort the
/// request.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// The requested user does not exist
    #[error("user {user_id} not found")]
    EntityNotFound { user_id: u64 },

    /// A required upstream call failed for any reason other than the
    /// user being absent
    #[error("upstream request failed: {source}")]
    UpstreamUnavailable {
        #[source]
        source: BackendError,
    },
}

impl AggregateError {
    /// Returns the HTTP status code this error maps to
    pub fn status_code(&self) -> u16 {
        match self {
            AggregateError::EntityNotFound { .. } => 404,
            AggregateError::UpstreamUnavailable { .. } => 500,
        }
    }
}
