//! Service configuration
//!
//! Same shape as the other backend services: TOML with serde defaults,
//! a missing file falls back to the defaults, a malformed one is a
//! startup error.

use std::net::SocketAddr;

use serde::Deserialize;
use shop_trace::TelemetryConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid listen address '{addr}': {source}")]
    Addr {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub simulation: SimulationConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listen host
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SimulationConfig {
    /// Upper bound for the simulated database delay in milliseconds.
    /// Zero disables the delay.
    #[serde(default)]
    pub max_query_delay_ms: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3003
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// The socket address to bind
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|source| ConfigError::Addr { addr, source })
    }
}

impl ServiceConfig {
    /// Load from `path` when one is given. A missing file falls back to
    /// the defaults; a malformed one is an error.
    pub fn load_or_default(path: Option<&str>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path, "Config file not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(ConfigError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_listen_on_3003() {
        let config = ServiceConfig::default();
        assert_eq!(config.server.port, 3003);
        assert_eq!(config.simulation.max_query_delay_ms, 0);
    }

    #[test]
    fn telemetry_section_is_parsed() {
        let config: ServiceConfig = toml::from_str(
            r#"
            [telemetry]
            exporter = "file"
            trace_file = "/tmp/inventory-spans.jsonl"
            "#,
        )
        .unwrap();
        assert_eq!(config.telemetry.exporter, shop_trace::ExporterKind::File);
        assert_eq!(config.server.port, 3003);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config =
            ServiceConfig::load_or_default(Some("/nonexistent/inventory-service.toml")).unwrap();
        assert_eq!(config.server.port, 3003);
    }
}
