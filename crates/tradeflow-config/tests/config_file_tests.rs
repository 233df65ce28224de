//! Loading configuration from disk.

use std::io::Write;

use rust_decimal_macros::dec;
use tempfile::NamedTempFile;
use tradeflow_config::{ConfigError, EngineConfig, StorageBackend};

#[test]
fn test_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[rates]
inventory_base_rate = 7.5
inventory_rating_step = 0.25

[metrics]
top_categories = 5

[storage]
backend = "memory"
"#
    )
    .unwrap();

    let config = EngineConfig::from_file(file.path()).unwrap();
    assert_eq!(config.rates.inventory_base_rate, dec!(7.5));
    assert_eq!(config.rates.inventory_rating_step, dec!(0.25));
    assert_eq!(config.metrics.top_categories, 5);
    assert_eq!(config.storage.backend, StorageBackend::Memory);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    match EngineConfig::from_file(&path) {
        Err(ConfigError::Io { path: reported, .. }) => {
            assert!(reported.ends_with("absent.toml"));
        }
        other => panic!("unexpected: {other:?}"),
    }
}
