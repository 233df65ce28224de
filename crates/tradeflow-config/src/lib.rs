//! Tradeflow Configuration Layer
//!
//! Configuration for the Tradeflow supply-chain financing engine: the
//! credit-rating rate policy, the inventory financing term and rounding
//! scale, metrics settings, and storage backend selection.
//!
//! # Example
//!
//! ```rust
//! use tradeflow_config::{EngineConfig, Validate};
//!
//! let config = EngineConfig::from_toml_str("[inventory]\nterm_months = 12\n").unwrap();
//! assert_eq!(config.inventory.term_months, 12);
//! assert_eq!(config.metrics.top_categories, 3);
//! assert!(config.is_valid());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod engine;
mod error;
mod policy;
mod storage;

pub use engine::EngineConfig;
pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
pub use policy::{InventoryPolicy, MetricsConfig, RatePolicy};
pub use storage::{StorageBackend, StorageConfig};
