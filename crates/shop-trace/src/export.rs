//! Span exporters
//!
//! Exporters receive batches of finished spans from the pipeline. They
//! must tolerate being called concurrently with span recording; failures
//! are returned to the pipeline, which logs and drops the batch.

use std::path::PathBuf;

use async_trait::async_trait;
use parking_lot::Mutex;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

use crate::span::SpanRecord;

/// Errors surfaced by exporters
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP export failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("collector rejected batch: HTTP {status}")]
    Rejected { status: u16 },
}

/// Destination for finished spans
#[async_trait]
pub trait SpanExporter: Send + Sync {
    async fn export(&self, batch: Vec<SpanRecord>) -> Result<(), ExportError>;
}

// =============================================================================
// Log exporter
// =============================================================================

/// Emits spans as structured log events. Error spans log at warn level.
#[derive(Debug, Default)]
pub struct LogExporter;

#[async_trait]
impl SpanExporter for LogExporter {
    async fn export(&self, batch: Vec<SpanRecord>) -> Result<(), ExportError> {
        for span in batch {
            if span.is_error() {
                tracing::warn!(
                    service = %span.service,
                    name = %span.name,
                    trace_id = %span.trace_id,
                    duration_us = span.duration_us,
                    error = span.error.as_deref(),
                    "span"
                );
            } else {
                tracing::debug!(
                    service = %span.service,
                    name = %span.name,
                    trace_id = %span.trace_id,
                    duration_us = span.duration_us,
                    "span"
                );
            }
        }
        Ok(())
    }
}

// =============================================================================
// In-memory exporter
// =============================================================================

/// Collects spans in memory for test introspection.
#[derive(Debug, Default)]
pub struct InMemoryExporter {
    spans: Mutex<Vec<SpanRecord>>,
}

impl InMemoryExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, span: SpanRecord) {
        self.spans.lock().push(span);
    }

    /// Snapshot of everything exported so far, in submission order
    pub fn finished(&self) -> Vec<SpanRecord> {
        self.spans.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.spans.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.lock().is_empty()
    }

    pub fn clear(&self) {
        self.spans.lock().clear();
    }
}

#[async_trait]
impl SpanExporter for InMemoryExporter {
    async fn export(&self, batch: Vec<SpanRecord>) -> Result<(), ExportError> {
        self.spans.lock().extend(batch);
        Ok(())
    }
}

// =============================================================================
// File exporter
// =============================================================================

/// Appends spans to a file as JSON lines, one span per line. The format
/// is what `shop-cli` consumes.
#[derive(Debug)]
pub struct FileExporter {
    path: PathBuf,
}

impl FileExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl SpanExporter for FileExporter {
    async fn export(&self, batch: Vec<SpanRecord>) -> Result<(), ExportError> {
        let mut buf = String::new();
        for span in &batch {
            buf.push_str(&serde_json::to_string(span)?);
            buf.push('\n');
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(buf.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
