//! Batching export pipeline
//!
//! One background task per process receives finished spans over an
//! unbounded channel and hands them to the exporter in batches, flushing
//! when the batch fills or the interval elapses. Span submission is a
//! plain channel send, so it is safe from `Drop` impls and during panic
//! unwinds.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::warn;

use crate::export::{InMemoryExporter, SpanExporter};
use crate::span::SpanRecord;

/// Batching parameters for the pipeline worker
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Export as soon as this many spans are buffered
    pub max_batch_size: usize,
    /// Export whatever is buffered at this interval
    pub flush_interval: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 64,
            flush_interval: Duration::from_secs(5),
        }
    }
}

pub(crate) enum Message {
    Span(Box<SpanRecord>),
    Flush(oneshot::Sender<()>),
    Shutdown,
}

/// Handle to a tracer's span sink. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct SpanSender(Sink);

#[derive(Debug, Clone)]
enum Sink {
    Disabled,
    Channel(mpsc::UnboundedSender<Message>),
    Memory(Arc<InMemoryExporter>),
}

impl SpanSender {
    /// A sender that drops every span
    pub fn disabled() -> Self {
        SpanSender(Sink::Disabled)
    }

    /// A sender that collects synchronously into `exporter` (tests)
    pub fn memory(exporter: Arc<InMemoryExporter>) -> Self {
        SpanSender(Sink::Memory(exporter))
    }

    pub(crate) fn channel(tx: mpsc::UnboundedSender<Message>) -> Self {
        SpanSender(Sink::Channel(tx))
    }

    /// Submit a finished span. Never blocks; a span submitted after the
    /// pipeline shut down is silently dropped.
    pub(crate) fn submit(&self, span: SpanRecord) {
        match &self.0 {
            Sink::Disabled => {}
            Sink::Channel(tx) => {
                let _ = tx.send(Message::Span(Box::new(span)));
            }
            Sink::Memory(exporter) => exporter.push(span),
        }
    }
}

impl std::fmt::Debug for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Message::Span(span) => write!(f, "Span({})", span.name),
            Message::Flush(_) => write!(f, "Flush"),
            Message::Shutdown => write!(f, "Shutdown"),
        }
    }
}

/// The background export worker and its channel.
pub struct BatchPipeline {
    tx: mpsc::UnboundedSender<Message>,
    worker: JoinHandle<()>,
}

impl BatchPipeline {
    /// Spawn the worker on the current runtime.
    pub fn spawn(exporter: Arc<dyn SpanExporter>, config: BatchConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(rx, exporter, config));
        Self { tx, worker }
    }

    /// A sender feeding this pipeline
    pub fn sender(&self) -> SpanSender {
        SpanSender::channel(self.tx.clone())
    }

    /// Export everything buffered so far. Spans submitted before this
    /// call are guaranteed to have reached the exporter when it returns.
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(Message::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.await;
        }
    }

    /// Drain buffered spans and stop the worker.
    pub async fn shutdown(self) {
        let _ = self.tx.send(Message::Shutdown);
        let _ = self.worker.await;
    }
}

async fn run_worker(
    mut rx: mpsc::UnboundedReceiver<Message>,
    exporter: Arc<dyn SpanExporter>,
    config: BatchConfig,
) {
    let mut batch: Vec<SpanRecord> = Vec::with_capacity(config.max_batch_size);
    let mut ticker = tokio::time::interval(config.flush_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            msg = rx.recv() => match msg {
                Some(Message::Span(span)) => {
                    batch.push(*span);
                    if batch.len() >= config.max_batch_size {
                        export_batch(&exporter, &mut batch).await;
                    }
                }
                Some(Message::Flush(ack)) => {
                    export_batch(&exporter, &mut batch).await;
                    let _ = ack.send(());
                }
                Some(Message::Shutdown) | None => {
                    export_batch(&exporter, &mut batch).await;
                    break;
                }
            },
            _ = ticker.tick() => {
                export_batch(&exporter, &mut batch).await;
            }
        }
    }
}

async fn export_batch(exporter: &Arc<dyn SpanExporter>, batch: &mut Vec<SpanRecord>) {
    if batch.is_empty() {
        return;
    }
    let spans = std::mem::take(batch);
    let count = spans.len();
    if let Err(error) = exporter.export(spans).await {
        warn!(%error, count, "span export failed, dropping batch");
    }
}
