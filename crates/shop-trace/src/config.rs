//! Telemetry configuration and bootstrap
//!
//! Every binary carries a `[telemetry]` config section with the same
//! shape; [`init_telemetry`] turns it into a [`Tracer`] plus the batch
//! pipeline feeding the configured exporter.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::export::{FileExporter, LogExporter, SpanExporter};
use crate::otlp::OtlpExporter;
use crate::pipeline::{BatchConfig, BatchPipeline};
use crate::tracer::Tracer;

/// Environment variable overriding the configured OTLP endpoint
pub const OTLP_ENDPOINT_ENV: &str = "OTEL_EXPORTER_OTLP_TRACES_ENDPOINT";

/// Which exporter finished spans go to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExporterKind {
    /// Drop all spans
    None,
    /// Emit spans as log events
    Log,
    /// Append spans to a JSON-lines file
    File,
    /// Post spans to an OTLP/HTTP collector
    Otlp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_exporter")]
    pub exporter: ExporterKind,
    /// Collector endpoint for the OTLP exporter
    #[serde(default = "default_otlp_endpoint")]
    pub otlp_endpoint: String,
    /// Output path for the file exporter
    #[serde(default)]
    pub trace_file: Option<PathBuf>,
    /// Export as soon as this many spans are buffered
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Export whatever is buffered at this interval
    #[serde(default = "default_flush_interval_ms")]
    pub flush_interval_ms: u64,
}

fn default_exporter() -> ExporterKind {
    ExporterKind::Log
}

fn default_otlp_endpoint() -> String {
    "http://localhost:4318/v1/traces".to_string()
}

fn default_batch_size() -> usize {
    64
}

fn default_flush_interval_ms() -> u64 {
    5000
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            exporter: default_exporter(),
            otlp_endpoint: default_otlp_endpoint(),
            trace_file: None,
            batch_size: default_batch_size(),
            flush_interval_ms: default_flush_interval_ms(),
        }
    }
}

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("file exporter requires telemetry.trace_file to be set")]
    MissingTraceFile,

    #[error("invalid OTLP endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build export HTTP client: {0}")]
    Client(#[from] crate::export::ExportError),
}

/// Build a tracer and its export pipeline from configuration.
///
/// Returns `None` for the pipeline when the exporter is `none`; callers
/// should flush or shut the pipeline down before process exit. Must be
/// called from within a tokio runtime.
pub fn init_telemetry(
    service: &str,
    config: &TelemetryConfig,
) -> Result<(Tracer, Option<BatchPipeline>), TelemetryError> {
    let exporter: Arc<dyn SpanExporter> = match config.exporter {
        ExporterKind::None => return Ok((Tracer::disabled(service), None)),
        ExporterKind::Log => Arc::new(LogExporter),
        ExporterKind::File => {
            let path = config
                .trace_file
                .clone()
                .ok_or(TelemetryError::MissingTraceFile)?;
            Arc::new(FileExporter::new(path))
        }
        ExporterKind::Otlp => {
            let endpoint = resolve_otlp_endpoint(config);
            let url = Url::parse(&endpoint).map_err(|source| TelemetryError::InvalidEndpoint {
                endpoint: endpoint.clone(),
                source,
            })?;
            Arc::new(OtlpExporter::new(url)?)
        }
    };

    let pipeline = BatchPipeline::spawn(
        exporter,
        BatchConfig {
            max_batch_size: config.batch_size,
            flush_interval: Duration::from_millis(config.flush_interval_ms),
        },
    );
    let tracer = Tracer::new(service, pipeline.sender());
    Ok((tracer, Some(pipeline)))
}

/// The OTLP endpoint, with the standard environment variable taking
/// precedence over configuration.
pub fn resolve_otlp_endpoint(config: &TelemetryConfig) -> String {
    std::env::var(OTLP_ENDPOINT_ENV).unwrap_or_else(|_| config.otlp_endpoint.clone())
}
