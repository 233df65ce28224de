//! Top-level engine configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{nested, ConfigError, ConfigResult, Validate, ValidationError};
use crate::policy::{InventoryPolicy, MetricsConfig, RatePolicy};
use crate::storage::StorageConfig;

/// Engine configuration, loaded from TOML.
///
/// Every section is optional; missing sections and fields take the
/// documented defaults.
///
/// ```toml
/// [rates]
/// po_base_rate = 5.0
/// po_rating_step = 0.5
///
/// [inventory]
/// term_months = 6
///
/// [metrics]
/// top_categories = 3
///
/// [storage]
/// backend = "redb"
/// path = "./data/tradeflow.redb"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Rate policy.
    pub rates: RatePolicy,
    /// Inventory financing policy.
    pub inventory: InventoryPolicy,
    /// Metrics settings.
    pub metrics: MetricsConfig,
    /// Storage backend selection.
    pub storage: StorageConfig,
}

impl EngineConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Loads and validates a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

impl Validate for EngineConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = nested("rates", self.rates.validate());
        errors.extend(nested("inventory", self.inventory.validate()));
        errors.extend(nested("metrics", self.metrics.validate()));
        errors.extend(nested("storage", self.storage.validate()));
        errors
    }
}
