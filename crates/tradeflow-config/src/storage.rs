//! Storage backend selection.

use serde::{Deserialize, Serialize};

use crate::error::{Validate, ValidationError};

/// Which storage backend the host process should construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local maps; nothing survives a restart.
    #[default]
    Memory,
    /// Embedded redb database file.
    Redb,
}

/// Storage section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend to use.
    pub backend: StorageBackend,
    /// Database file, used by the redb backend.
    pub path: String,
}

fn default_storage_path() -> String {
    "./data/tradeflow.redb".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            path: default_storage_path(),
        }
    }
}

impl Validate for StorageConfig {
    fn validate(&self) -> Vec<ValidationError> {
        if self.backend == StorageBackend::Redb && self.path.trim().is_empty() {
            vec![ValidationError::new(
                "path",
                "required when backend is redb",
            )]
        } else {
            Vec::new()
        }
    }
}
