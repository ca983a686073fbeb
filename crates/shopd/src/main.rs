//! shopd - Storefront API gateway daemon
//!
//! Serves the aggregated user-orders view and proxies the per-service
//! REST APIs under one origin.
//!
//! # Usage
//!
//! ```bash
//! # All defaults: listen on 3000, backends on localhost:3001-3003
//! shopd
//!
//! # Custom config
//! shopd --config gateway.toml --port 8080
//! ```
//!
//! Log verbosity follows `RUST_LOG`.

mod config;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use shop_api::{create_router, AppState};
use shop_client::HttpShopBackend;
use shop_gateway::Aggregator;
use shop_proxy::UpstreamProxy;
use shop_trace::init_telemetry;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use config::GatewayConfig;

#[derive(Parser, Debug)]
#[command(name = "shopd")]
#[command(about = "Aggregating storefront API gateway", long_about = None)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<String>,

    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "shopd=info,shop_api=info,shop_gateway=info,shop_proxy=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = GatewayConfig::load_or_default(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let (tracer, pipeline) =
        init_telemetry("shopd", &config.telemetry).context("telemetry setup failed")?;

    info!(
        users = %config.backends.users_url,
        orders = %config.backends.orders_url,
        inventory = %config.backends.inventory_url,
        "Wiring backend services"
    );

    let backend = HttpShopBackend::with_timeouts(
        &config.backends.users_url,
        &config.backends.orders_url,
        &config.backends.inventory_url,
        Duration::from_millis(config.backends.request_timeout_ms),
        Duration::from_millis(config.backends.connect_timeout_ms),
    )?;
    let aggregator = Aggregator::new(Arc::new(backend), tracer);

    let proxies = vec![
        Arc::new(UpstreamProxy::new(
            "user-service",
            &config.backends.users_url,
            "/api/users",
            "/users",
        )?),
        Arc::new(UpstreamProxy::new(
            "order-service",
            &config.backends.orders_url,
            "/api/orders",
            "/orders",
        )?),
        Arc::new(UpstreamProxy::new(
            "inventory-service",
            &config.backends.inventory_url,
            "/api/inventory",
            "/inventory",
        )?),
    ];

    let app = create_router(AppState::new(aggregator), proxies);

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("API Gateway listening on http://{}", addr);

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
