//! Builder pattern for the financing engine.

use std::sync::Arc;

use tradeflow_config::{EngineConfig, Validate};
use tradeflow_storage::StorageAdapter;

use crate::clock::{Clock, SystemClock};
use crate::engine::FinancingEngine;
use crate::error::EngineError;

/// Builder for constructing a [`FinancingEngine`].
///
/// ```rust
/// use std::sync::Arc;
/// use tradeflow_engine::FinancingEngineBuilder;
/// use tradeflow_storage::InMemoryStorage;
///
/// let engine = FinancingEngineBuilder::new()
///     .with_storage(Arc::new(InMemoryStorage::new()))
///     .build()
///     .unwrap();
/// assert_eq!(engine.backend_name(), "memory");
/// ```
pub struct FinancingEngineBuilder {
    config: Option<EngineConfig>,
    storage: Option<Arc<dyn StorageAdapter>>,
    clock: Option<Arc<dyn Clock>>,
}

impl FinancingEngineBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: None,
            storage: None,
            clock: None,
        }
    }

    /// Set the engine configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the storage adapter.
    pub fn with_storage(mut self, storage: Arc<dyn StorageAdapter>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Set the clock. Defaults to [`SystemClock`].
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the financing engine.
    ///
    /// Validates the configuration and seeds id sequences from the records
    /// already in storage.
    pub fn build(self) -> Result<FinancingEngine, EngineError> {
        let config = self.config.unwrap_or_default();
        config.validate_or_error()?;

        let storage = self
            .storage
            .ok_or(EngineError::MissingComponent("storage"))?;
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        Ok(FinancingEngine::new(config, storage, clock)?)
    }
}

impl Default for FinancingEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
