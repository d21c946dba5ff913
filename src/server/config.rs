//! Server Configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::core::error::{Result, TtsError};
use crate::engine::catalog::Engine;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Per-engine enablement overrides applied on top of the
    /// environment-derived credential store
    #[serde(default)]
    pub engines: BTreeMap<Engine, bool>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Enable per-request access log
    #[serde(default = "default_true")]
    pub access_log: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            access_log: true,
        }
    }
}

/// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ServerConfig {
    /// Load from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        serde_yaml::from_str(&content).map_err(|e| TtsError::Config {
            message: format!("failed to parse {}: {}", path.as_ref().display(), e),
        })
    }

    /// Save to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self).map_err(|e| TtsError::Config {
            message: format!("failed to serialize config: {}", e),
        })?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            engines: BTreeMap::new(),
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert!(config.logging.access_log);
    }

    #[test]
    fn test_yaml_round_trip() {
        let yaml = "host: 127.0.0.1\nport: 9090\nengines:\n  mock: true\n  azure: false\n";
        let config: ServerConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9090);
        assert_eq!(config.engines.get(&Engine::Mock), Some(&true));
        assert_eq!(config.engines.get(&Engine::Azure), Some(&false));

        let back = serde_yaml::to_string(&config).unwrap();
        let reparsed: ServerConfig = serde_yaml::from_str(&back).unwrap();
        assert_eq!(reparsed.port, 9090);
    }
}
