//! shop-cli - Trace analysis for span files
//!
//! Reads the JSON-lines span files written by the services' file
//! exporter and answers the usual post-run questions: what ran, what
//! was slow, what failed.

mod commands;
mod output;
mod reader;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::output::{OutputContext, OutputFormat};

#[derive(Parser)]
#[command(name = "shop-cli")]
#[command(author, version, about = "Trace analysis for storefront span files")]
#[command(propagate_version = true)]
struct Cli {
    /// Span file written by the file exporter (JSON lines)
    #[arg(short, long, env = "SHOP_TRACE_FILE", default_value = "traces.jsonl")]
    file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    output: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Minimal output (for scripting)
    #[arg(short, long)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-service span counts and durations
    Summary,

    /// Spans slower than a threshold, slowest first
    Slow {
        /// Duration threshold in milliseconds
        #[arg(long, default_value = "100")]
        threshold_ms: f64,
    },

    /// Spans that ended with error status
    Errors,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    let ctx = OutputContext::new(cli.output, cli.no_color, cli.quiet);
    let spans = reader::load_spans(&cli.file)?;

    match &cli.command {
        Commands::Summary => commands::summary(&spans, &ctx)?,
        Commands::Slow { threshold_ms } => commands::slow(&spans, *threshold_ms, &ctx)?,
        Commands::Errors => commands::errors(&spans, &ctx)?,
    }

    Ok(())
}
