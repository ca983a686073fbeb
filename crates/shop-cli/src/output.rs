//! Output formatting for shop-cli (table, json)

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use shop_trace::SpanStatus;
use tabled::{Table, Tabled};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format (default)
    Table,
    /// JSON format
    Json,
}

/// Context for output rendering
pub struct OutputContext {
    pub format: OutputFormat,
    pub quiet: bool,
}

impl OutputContext {
    pub fn new(format: OutputFormat, no_color: bool, quiet: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { format, quiet }
    }

    /// Print a success message (unless in quiet mode)
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg.green());
        }
    }

    /// Print an info message (unless in quiet mode)
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg);
        }
    }

    /// Print data in the configured format
    pub fn print<T: Tabled + Serialize>(&self, data: &[T]) {
        match self.format {
            OutputFormat::Table => {
                if data.is_empty() {
                    if !self.quiet {
                        println!("No data");
                    }
                } else {
                    let table = Table::new(data).to_string();
                    println!("{}", table);
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(data).unwrap_or_else(|_| "[]".to_string())
                );
            }
        }
    }
}

/// Span status as a fixed label
pub fn status_label(status: SpanStatus) -> &'static str {
    match status {
        SpanStatus::Unset => "unset",
        SpanStatus::Ok => "ok",
        SpanStatus::Error => "error",
    }
}

// =============================================================================
// Display types for the subcommands
// =============================================================================

/// Per-service aggregate for the summary command
#[derive(Debug, Tabled, Serialize)]
pub struct SummaryRow {
    #[tabled(rename = "Service")]
    pub service: String,
    #[tabled(rename = "Spans")]
    pub spans: usize,
    #[tabled(rename = "Min (ms)")]
    pub min_ms: String,
    #[tabled(rename = "Avg (ms)")]
    pub avg_ms: String,
    #[tabled(rename = "Max (ms)")]
    pub max_ms: String,
}

/// One slow span for the slow command
#[derive(Debug, Tabled, Serialize)]
pub struct SlowRow {
    #[tabled(rename = "Service")]
    pub service: String,
    #[tabled(rename = "Span")]
    pub name: String,
    #[tabled(rename = "Duration (ms)")]
    pub duration_ms: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Trace")]
    pub trace_id: String,
}

/// One failed span for the errors command
#[derive(Debug, Tabled, Serialize)]
pub struct ErrorRow {
    #[tabled(rename = "Time")]
    pub time: String,
    #[tabled(rename = "Service")]
    pub service: String,
    #[tabled(rename = "Span")]
    pub name: String,
    #[tabled(rename = "Error")]
    pub error: String,
    #[tabled(rename = "Exception")]
    pub exception: String,
}
