//! Command implementations for shop-cli

pub mod errors;
pub mod slow;
pub mod summary;

pub use errors::errors;
pub use slow::slow;
pub use summary::summary;

#[cfg(test)]
pub(crate) mod testutil {
    use std::collections::HashMap;

    use chrono::Utc;
    use shop_trace::{SpanRecord, SpanStatus};
    use uuid::Uuid;

    /// A finished span with the given duration
    pub fn span(service: &str, name: &str, duration_us: u64, status: SpanStatus) -> SpanRecord {
        SpanRecord {
            span_id: Uuid::new_v4(),
            parent_span_id: None,
            trace_id: Uuid::new_v4(),
            service: service.to_string(),
            name: name.to_string(),
            status,
            started_at: Utc::now(),
            ended_at: Some(Utc::now()),
            duration_us: Some(duration_us),
            attributes: HashMap::new(),
            error: None,
            exception: None,
        }
    }
}
