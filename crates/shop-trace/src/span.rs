//! Finished-span record types
//!
//! A [`SpanRecord`] is the immutable result of one closed span. Records
//! are append-only, JSON-serializable without loss, and carry everything
//! an exporter needs; live span state is managed by
//! [`crate::tracer::SpanGuard`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of a span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanStatus {
    Unset,
    Ok,
    Error,
}

/// An exception recorded on a span.
///
/// Recording an exception attaches diagnostic detail; it does not by
/// itself change the span's status or the traced operation's control
/// flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanException {
    /// Error type name (e.g., "BackendError")
    pub kind: String,
    /// Error message
    pub message: String,
}

/// A single finished span.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpanRecord {
    pub span_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_span_id: Option<Uuid>,
    pub trace_id: Uuid,
    /// Service that recorded the span
    pub service: String,
    /// Operation name (e.g., "get_user_orders_aggregate")
    pub name: String,
    pub status: SpanStatus,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    /// Wall-clock duration in microseconds, set when the span ends
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_us: Option<u64>,
    pub attributes: HashMap<String, serde_json::Value>,
    /// Status message for error spans (e.g., "User not found")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<SpanException>,
}

impl SpanRecord {
    /// Create a started span with a fresh trace id (a root span)
    pub(crate) fn start_root(service: &str, name: &str) -> Self {
        Self {
            span_id: Uuid::new_v4(),
            parent_span_id: None,
            trace_id: Uuid::new_v4(),
            service: service.to_string(),
            name: name.to_string(),
            status: SpanStatus::Unset,
            started_at: Utc::now(),
            ended_at: None,
            duration_us: None,
            attributes: HashMap::new(),
            error: None,
            exception: None,
        }
    }

    /// Create a started span under an existing trace
    pub(crate) fn start_child(service: &str, name: &str, trace_id: Uuid, parent: Uuid) -> Self {
        Self {
            parent_span_id: Some(parent),
            trace_id,
            ..Self::start_root(service, name)
        }
    }

    /// Close the span, computing its duration. Idempotence is enforced by
    /// the guard, which only finalizes once.
    pub(crate) fn finish(&mut self) {
        let now = Utc::now();
        self.duration_us = Some((now - self.started_at).num_microseconds().unwrap_or(0).max(0) as u64);
        self.ended_at = Some(now);
    }

    /// Whether the span ended with error status
    pub fn is_error(&self) -> bool {
        self.status == SpanStatus::Error
    }

    /// Duration in milliseconds, if the span has ended
    pub fn duration_ms(&self) -> Option<f64> {
        self.duration_us.map(|us| us as f64 / 1000.0)
    }
}
