//! Gateway configuration
//!
//! Everything has a default, so `shopd` starts without any config file
//! and reaches the three backend services on their conventional local
//! ports.

use std::net::{AddrParseError, SocketAddr};
use std::path::Path;

use serde::Deserialize;
use shop_trace::TelemetryConfig;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid listen address '{addr}'")]
    Addr {
        addr: String,
        #[source]
        source: AddrParseError,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backends: BackendsConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendsConfig {
    #[serde(default = "default_users_url")]
    pub users_url: String,
    #[serde(default = "default_orders_url")]
    pub orders_url: String,
    #[serde(default = "default_inventory_url")]
    pub inventory_url: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_users_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_orders_url() -> String {
    "http://localhost:3002".to_string()
}

fn default_inventory_url() -> String {
    "http://localhost:3003".to_string()
}

fn default_request_timeout_ms() -> u64 {
    5000
}

fn default_connect_timeout_ms() -> u64 {
    2000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for BackendsConfig {
    fn default() -> Self {
        Self {
            users_url: default_users_url(),
            orders_url: default_orders_url(),
            inventory_url: default_inventory_url(),
            request_timeout_ms: default_request_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

impl GatewayConfig {
    /// Load from a TOML file, or fall back to defaults when no path is
    /// given or the file does not exist.
    pub fn load_or_default(path: Option<&str>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        match std::fs::read_to_string(Path::new(path)) {
            Ok(raw) => Ok(toml::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path, "Config file not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse().map_err(|source| ConfigError::Addr { addr, source })
    }
}
