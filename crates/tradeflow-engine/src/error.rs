//! Engine construction errors.

use thiserror::Error;

use tradeflow_config::ConfigError;
use tradeflow_core::FinanceError;

/// Errors raised while assembling a [`FinancingEngine`](crate::FinancingEngine).
///
/// Operations on a running engine return [`FinanceError`] directly.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration was rejected.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A required component was not supplied.
    #[error("missing component: {0}")]
    MissingComponent(&'static str),

    /// Seeding from storage failed.
    #[error(transparent)]
    Finance(#[from] FinanceError),
}
