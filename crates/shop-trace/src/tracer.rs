//! Tracer and span guard
//!
//! A [`SpanGuard`] is acquired at the start of an operation and ends its
//! span exactly once when dropped, whatever path the operation takes out
//! of scope. Ending during a panic unwind marks the span as failed before
//! submitting it.

use std::sync::Arc;

use uuid::Uuid;

use crate::export::InMemoryExporter;
use crate::pipeline::SpanSender;
use crate::span::{SpanException, SpanRecord, SpanStatus};

/// Starts spans for one service.
///
/// Cloning is cheap; all clones feed the same sink.
#[derive(Debug, Clone)]
pub struct Tracer {
    service: Arc<str>,
    sender: SpanSender,
}

impl Tracer {
    pub fn new(service: impl AsRef<str>, sender: SpanSender) -> Self {
        Self {
            service: Arc::from(service.as_ref()),
            sender,
        }
    }

    /// A tracer that drops every span. Useful when telemetry is turned off.
    pub fn disabled(service: impl AsRef<str>) -> Self {
        Self::new(service, SpanSender::disabled())
    }

    /// A tracer whose spans collect synchronously into the returned
    /// exporter. Intended for tests.
    pub fn with_memory(service: impl AsRef<str>) -> (Self, Arc<InMemoryExporter>) {
        let exporter = Arc::new(InMemoryExporter::new());
        let tracer = Self::new(service, SpanSender::memory(exporter.clone()));
        (tracer, exporter)
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Start a root span (fresh trace id)
    pub fn span(&self, name: &str) -> SpanGuard {
        let record = SpanRecord::start_root(&self.service, name);
        SpanGuard::new(record, self.sender.clone())
    }

    /// Start a span under `parent`'s trace
    pub fn child_span(&self, name: &str, parent: &SpanGuard) -> SpanGuard {
        let record =
            SpanRecord::start_child(&self.service, name, parent.trace_id(), parent.span_id());
        SpanGuard::new(record, self.sender.clone())
    }
}

/// A live span.
///
/// Dropping the guard ends the span and submits the finished record to
/// the tracer's sink. The record is taken out on the first finalization,
/// so the span cannot be ended twice.
#[derive(Debug)]
pub struct SpanGuard {
    record: Option<SpanRecord>,
    span_id: Uuid,
    trace_id: Uuid,
    sender: SpanSender,
}

impl SpanGuard {
    fn new(record: SpanRecord, sender: SpanSender) -> Self {
        Self {
            span_id: record.span_id,
            trace_id: record.trace_id,
            record: Some(record),
            sender,
        }
    }

    pub fn span_id(&self) -> Uuid {
        self.span_id
    }

    pub fn trace_id(&self) -> Uuid {
        self.trace_id
    }

    /// Set one attribute (last write wins per key)
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        if let Some(record) = self.record.as_mut() {
            record.attributes.insert(key.into(), value.into());
        }
    }

    /// Merge a set of attributes (last write wins per key)
    pub fn set_attributes<K, I>(&mut self, entries: I)
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, serde_json::Value)>,
    {
        if let Some(record) = self.record.as_mut() {
            for (key, value) in entries {
                record.attributes.insert(key.into(), value);
            }
        }
    }

    pub fn set_status_ok(&mut self) {
        if let Some(record) = self.record.as_mut() {
            record.status = SpanStatus::Ok;
        }
    }

    pub fn set_status_error(&mut self, message: impl Into<String>) {
        if let Some(record) = self.record.as_mut() {
            record.status = SpanStatus::Error;
            record.error = Some(message.into());
        }
    }

    /// Attach an exception to the span without altering control flow.
    /// Does not change the span status by itself.
    pub fn record_exception<E>(&mut self, error: &E)
    where
        E: std::error::Error + ?Sized,
    {
        if let Some(record) = self.record.as_mut() {
            record.exception = Some(SpanException {
                kind: short_type_name::<E>(),
                message: error.to_string(),
            });
        }
    }

    /// End the span now. Dropping the guard has the same effect; this
    /// exists for call sites that want the end to be visible.
    pub fn end(self) {}

    fn finalize(&mut self) {
        if let Some(mut record) = self.record.take() {
            if std::thread::panicking() {
                record.status = SpanStatus::Error;
                if record.error.is_none() {
                    record.error = Some("operation panicked".to_string());
                }
                if record.exception.is_none() {
                    record.exception = Some(SpanException {
                        kind: "panic".to_string(),
                        message: "operation panicked".to_string(),
                    });
                }
            }
            record.finish();
            self.sender.submit(record);
        }
    }
}

impl Drop for SpanGuard {
    fn drop(&mut self) {
        self.finalize();
    }
}

/// Last path segment of a type name: `shop_core::error::BackendError`
/// becomes `BackendError`.
fn short_type_name<E: ?Sized>() -> String {
    let full = std::any::type_name::<E>();
    full.rsplit("::").next().unwrap_or(full).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropping_the_guard_ends_the_span_once() {
        let (tracer, exporter) = Tracer::with_memory("test");
        {
            let mut span = tracer.span("operation");
            span.set_attribute("user.id", 7);
        }
        let spans = exporter.finished();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].name, "operation");
        assert!(spans[0].ended_at.is_some());
        assert_eq!(spans[0].attributes["user.id"], serde_json::json!(7));
    }

    #[test]
    fn explicit_end_does_not_double_submit() {
        let (tracer, exporter) = Tracer::with_memory("test");
        let span = tracer.span("operation");
        span.end();
        assert_eq!(exporter.len(), 1);
    }

    #[test]
    fn attributes_merge_last_write_wins() {
        let (tracer, exporter) = Tracer::with_memory("test");
        {
            let mut span = tracer.span("operation");
            span.set_attributes([
                ("operation.type", serde_json::json!("read")),
                ("user.id", serde_json::json!(1)),
            ]);
            span.set_attribute("operation.type", "aggregate");
        }
        let spans = exporter.finished();
        assert_eq!(
            spans[0].attributes["operation.type"],
            serde_json::json!("aggregate")
        );
        assert_eq!(spans[0].attributes["user.id"], serde_json::json!(1));
    }

    #[test]
    fn recorded_exception_keeps_control_flow_and_status() {
        let (tracer, exporter) = Tracer::with_memory("test");
        {
            let mut span = tracer.span("operation");
            let err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
            span.record_exception(&err);
        }
        let spans = exporter.finished();
        let exception = spans[0].exception.as_ref().unwrap();
        assert_eq!(exception.kind, "Error");
        assert_eq!(exception.message, "refused");
        // recording alone leaves the status untouched
        assert_eq!(spans[0].status, SpanStatus::Unset);
    }

    #[test]
    fn panicking_still_closes_the_span_as_error() {
        let (tracer, exporter) = Tracer::with_memory("test");
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut span = tracer.span("operation");
            span.set_attribute("user.id", 1);
            panic!("boom");
        }));
        assert!(result.is_err());

        let spans = exporter.finished();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].status, SpanStatus::Error);
        assert!(spans[0].ended_at.is_some());
        assert_eq!(spans[0].exception.as_ref().unwrap().kind, "panic");
    }

    #[test]
    fn child_spans_link_to_their_parent() {
        let (tracer, exporter) = Tracer::with_memory("order-service");
        {
            let parent = tracer.span("create_order");
            let child = tracer.child_span("verify_user", &parent);
            assert_eq!(child.trace_id(), parent.trace_id());
            child.end();
            parent.end();
        }
        let spans = exporter.finished();
        assert_eq!(spans.len(), 2);
        // children finish first
        assert_eq!(spans[0].name, "verify_user");
        assert_eq!(spans[0].parent_span_id, Some(spans[1].span_id));
    }

    #[test]
    fn disabled_tracer_drops_spans() {
        let tracer = Tracer::disabled("test");
        let mut span = tracer.span("operation");
        span.set_status_ok();
        span.end();
        // nothing to observe; the point is that this does not panic
    }
}
