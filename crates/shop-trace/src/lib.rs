//! shop-trace - Span recording and export for the storefront services
//!
//! Every service records one span per logical operation: the span carries
//! a name, timing, key/value attributes and an optional exception, and is
//! guaranteed to be closed exactly once on every exit path (including
//! panics) via [`SpanGuard`]'s drop semantics.
//!
//! Finished spans flow through a batching pipeline to an exporter:
//!
//! ```text
//! Tracer → SpanGuard (drop) → channel → BatchPipeline → SpanExporter
//! ```
//!
//! Exporters: [`LogExporter`] (tracing logs), [`FileExporter`] (JSON
//! lines, consumed by shop-cli), [`OtlpExporter`] (OTLP/HTTP JSON to a
//! collector), and [`InMemoryExporter`] for tests. Export failures are
//! logged and never propagate into the traced operation.

pub mod config;
pub mod export;
pub mod otlp;
pub mod pipeline;
pub mod span;
pub mod tracer;

pub use config::{init_telemetry, ExporterKind, TelemetryConfig, TelemetryError};
pub use export::{ExportError, FileExporter, InMemoryExporter, LogExporter, SpanExporter};
pub use otlp::OtlpExporter;
pub use pipeline::{BatchConfig, BatchPipeline, SpanSender};
pub use span::{SpanException, SpanRecord, SpanStatus};
pub use tracer::{SpanGuard, Tracer};
