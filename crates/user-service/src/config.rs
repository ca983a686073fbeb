//! Service configuration
//!
//! TOML with serde defaults throughout; every field and section may be
//! omitted. A missing config file falls back to the built-in defaults,
//! a malformed one is a startup error.

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
    3001
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
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_listen_on_3001() {
        let config = ServiceConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.simulation.max_query_delay_ms, 0);
    }

    #[test]
    fn partial_toml_keeps_the_other_defaults() {
        let config: ServiceConfig = toml::from_str(
            r#"
            [server]
            port = 4001

            [simulation]
            max_query_delay_ms = 50
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 4001);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.simulation.max_query_delay_ms, 50);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = ServiceConfig::load_or_default(Some("/nonexistent/user-service.toml")).unwrap();
        assert_eq!(config.server.port, 3001);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server").unwrap();

        let result = ServiceConfig::load_or_default(file.path().to_str());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn bind_addr_combines_host_and_port() {
        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3001,
        };
        assert_eq!(server.bind_addr().unwrap().to_string(), "127.0.0.1:3001");
    }
}
