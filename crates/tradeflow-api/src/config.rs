//! Server configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use tradeflow_config::{ConfigError, ConfigResult, EngineConfig, Validate, ValidationError};

/// Server configuration.
///
/// Listener settings sit at the top level of the TOML document; the engine
/// sections (`[rates]`, `[inventory]`, `[metrics]`, `[storage]`) share the
/// same file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Engine configuration
    #[serde(flatten)]
    pub engine: EngineConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            engine: EngineConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.host.trim().is_empty() {
            errors.push(ValidationError::new("host", "must not be empty"));
        }
        errors.extend(self.engine.validate());
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tradeflow_config::StorageBackend;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_toml_str("").unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.engine, EngineConfig::default());
    }

    #[test]
    fn test_shared_document() {
        let config = ServerConfig::from_toml_str(
            r#"
port = 9090

[inventory]
term_months = 12

[storage]
backend = "redb"
path = "/var/lib/tradeflow/ledger.redb"
"#,
        )
        .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.engine.inventory.term_months, 12);
        assert_eq!(config.engine.storage.backend, StorageBackend::Redb);
    }

    #[test]
    fn test_invalid_engine_section_rejected() {
        let err = ServerConfig::from_toml_str("[inventory]\nterm_months = 0\n").unwrap_err();
        assert!(err.to_string().contains("inventory.term_months"));
    }
}
