//! Integration tests for configuration loading.
//!
//! These tests exercise the full `ConfigBuilder` path: data directory
//! selection, `config.yaml`, `PARKING_*` overrides and validation.
//!
//! Tests that modify environment variables are marked with `#[serial]`;
//! environment variables are process-global, so they must not run
//! concurrently.

use serial_test::serial;
use std::env;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use parking::config::{Config, ConfigBuilder, OutputFormat, StorageKind, CONFIG_FILE_NAME};
use parking::error::Error;
use parking::{Lot, ReservationService};

/// RAII guard for setting and restoring environment variables.
struct EnvGuard {
    key: String,
    old_value: Option<String>,
}

impl EnvGuard {
    fn new(key: &str, value: &str) -> Self {
        let old_value = env::var(key).ok();
        env::set_var(key, value);
        Self {
            key: key.to_string(),
            old_value,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.old_value {
            Some(value) => env::set_var(&self.key, value),
            None => env::remove_var(&self.key),
        }
    }
}

fn data_dir_with(yaml: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(CONFIG_FILE_NAME), yaml).unwrap();
    dir
}

#[test]
fn test_file_values_are_used() {
    let dir = data_dir_with(
        "lots: 2\nrows: 3\ncolumns: 4\nopening_time: \"07:00\"\nclosing_time: \"21:30\"\n\
         minimum_notice_minutes: 15\noutput_format: tsv\n",
    );
    let config = ConfigBuilder::new()
        .skip_env()
        .with_data_dir(dir.path())
        .build()
        .unwrap();

    assert_eq!(config.lots, 2);
    assert_eq!(config.output_format, OutputFormat::Tsv);
    assert_eq!(config.roster_path(), dir.path().join("usuarios.csv"));

    let inventory = config.inventory().unwrap();
    assert_eq!(inventory.spaces_per_lot(), 12);
    let rules = config.service_rules().unwrap();
    assert_eq!(rules.minimum_notice, chrono::Duration::minutes(15));
}

#[test]
fn test_missing_file_means_defaults() {
    let dir = TempDir::new().unwrap();
    let config = ConfigBuilder::new()
        .skip_env()
        .with_data_dir(dir.path())
        .build()
        .unwrap();
    assert_eq!(config, Config::default().with_data_dir(dir.path()));
}

#[test]
fn test_unknown_key_is_configuration_error() {
    let dir = data_dir_with("lots: 3\nparking_fee: 5\n");
    let result = ConfigBuilder::new()
        .skip_env()
        .with_data_dir(dir.path())
        .build();
    assert!(matches!(result, Err(Error::Configuration(_))));
}

#[test]
fn test_invalid_values_fail_validation() {
    let dir = data_dir_with("opening_time: \"22:00\"\nclosing_time: \"08:00\"\n");
    let result = ConfigBuilder::new()
        .skip_env()
        .with_data_dir(dir.path())
        .build();
    assert!(matches!(result, Err(Error::Validation { .. })));
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    let dir = data_dir_with("storage: csv\nminimum_notice_minutes: 90\n");
    let _storage = EnvGuard::new("PARKING_STORAGE", "sqlite");
    let _notice = EnvGuard::new("PARKING_MINIMUM_NOTICE_MINUTES", "10");

    let config = ConfigBuilder::new()
        .with_data_dir(dir.path())
        .build()
        .unwrap();
    assert_eq!(config.storage, StorageKind::Sqlite);
    assert_eq!(config.minimum_notice_minutes, 10);
}

#[test]
#[serial]
fn test_data_dir_from_environment() {
    let dir = data_dir_with("lots: 1\n");
    let _data_dir = EnvGuard::new("PARKING_DATA_DIR", dir.path().to_str().unwrap());

    let config = ConfigBuilder::new().build().unwrap();
    assert_eq!(config.data_dir, dir.path());
    assert_eq!(config.lots, 1);

    // An explicit directory wins over the variable.
    let other = TempDir::new().unwrap();
    let config = ConfigBuilder::new().with_data_dir(other.path()).build().unwrap();
    assert_eq!(config.data_dir, other.path());
    assert_eq!(config.lots, 3);
}

#[test]
#[serial]
fn test_skip_env_ignores_variables() {
    let _lots = EnvGuard::new("PARKING_LOTS", "not-a-number");
    let dir = TempDir::new().unwrap();
    let config = ConfigBuilder::new()
        .skip_env()
        .with_data_dir(dir.path())
        .build()
        .unwrap();
    assert_eq!(config.lots, 3);
}

#[test]
fn test_service_from_configured_grid() {
    let dir = data_dir_with("lots: 1\nrows: 2\ncolumns: 2\nreservations_file: log/reservas.csv\n");
    let config = ConfigBuilder::new()
        .skip_env()
        .with_data_dir(dir.path())
        .build()
        .unwrap();

    let service = ReservationService::from_config(&config).unwrap();
    let codes: Vec<String> = service
        .spaces_for(Lot::try_from(1).unwrap())
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(codes, ["01A", "02B", "03A", "04B"]);
    assert_eq!(
        config.reservations_path(),
        PathBuf::from(dir.path()).join("log/reservas.csv")
    );
    assert!(config.reservations_path().exists());
}
