//! order-service binary
//!
//! # Usage
//!
//! ```bash
//! order-service --config orders.toml --port 3002
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use shop_client::BackendClient;
use shop_trace::init_telemetry;
use tracing::{error, info};

use order_service::{AppState, OrderStore, ServiceConfig};

#[derive(Parser, Debug)]
#[command(name = "order-service")]
#[command(about = "Order management backend", long_about = None)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<String>,

    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        "order_service=debug,shop_client=debug,shop_trace=debug"
    } else {
        "order_service=info"
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = ServiceConfig::load_or_default(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let (tracer, pipeline) = init_telemetry("order-service", &config.telemetry)
        .context("telemetry setup failed")?;

    let request_timeout = Duration::from_millis(config.backends.request_timeout_ms);
    let connect_timeout = Duration::from_millis(config.backends.connect_timeout_ms);
    let users = BackendClient::with_config(
        "user-service",
        &config.backends.users_url,
        request_timeout,
        connect_timeout,
    )?;
    let inventory = BackendClient::with_config(
        "inventory-service",
        &config.backends.inventory_url,
        request_timeout,
        connect_timeout,
    )?;

    let state = AppState {
        store: Arc::new(OrderStore::seeded()),
        tracer,
        users,
        inventory,
        max_query_delay_ms: config.simulation.max_query_delay_ms,
    };
    let app = order_service::create_router(state);

    let addr = config.server.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Order service listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down");
    if let Some(pipeline) = pipeline {
        pipeline.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
}
