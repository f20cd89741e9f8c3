//! Environment variable handling for configuration overrides.
//!
//! `PARKING_*` variables override values read from `config.yaml`.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::schema::{Config, OutputFormat};
use crate::error::{Error, Result};

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "PARKING_DATA_DIR";

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use parking::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to config.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to a value of the wrong type,
    /// e.g. a non-numeric `PARKING_LOTS`.
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Ok(path) = env::var("PARKING_ROSTER_FILE") {
            config.roster_file = PathBuf::from(path);
        }

        if let Ok(path) = env::var("PARKING_RESERVATIONS_FILE") {
            config.reservations_file = PathBuf::from(path);
        }

        if let Ok(storage) = env::var("PARKING_STORAGE") {
            config.storage = Self::parse("PARKING_STORAGE", &storage)?;
        }

        if let Ok(lots) = env::var("PARKING_LOTS") {
            config.lots = Self::parse_number("PARKING_LOTS", &lots)?;
        }

        if let Ok(rows) = env::var("PARKING_ROWS") {
            config.rows = Self::parse_number("PARKING_ROWS", &rows)?;
        }

        if let Ok(columns) = env::var("PARKING_COLUMNS") {
            config.columns = Self::parse_number("PARKING_COLUMNS", &columns)?;
        }

        if let Ok(time) = env::var("PARKING_OPENING_TIME") {
            config.opening_time = time;
        }

        if let Ok(time) = env::var("PARKING_CLOSING_TIME") {
            config.closing_time = time;
        }

        if let Ok(minutes) = env::var("PARKING_MINIMUM_NOTICE_MINUTES") {
            config.minimum_notice_minutes =
                Self::parse_number("PARKING_MINIMUM_NOTICE_MINUTES", &minutes)?;
        }

        if let Ok(domain) = env::var("PARKING_INSTITUTIONAL_DOMAIN") {
            config.institutional_domain = domain;
        }

        if let Ok(format) = env::var("PARKING_OUTPUT_FORMAT") {
            config.output_format = Self::parse_output_format(&format)?;
        }

        Ok(())
    }

    /// The data directory named by `PARKING_DATA_DIR`, if set and non-empty.
    #[must_use]
    pub fn data_dir() -> Option<PathBuf> {
        env::var_os(DATA_DIR_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    }

    fn parse<T: FromStr<Err = String>>(field: &str, value: &str) -> Result<T> {
        value.parse().map_err(|message| Error::Validation {
            field: field.into(),
            message,
        })
    }

    fn parse_number<T: FromStr>(field: &str, value: &str) -> Result<T> {
        value.trim().parse().map_err(|_| Error::Validation {
            field: field.into(),
            message: format!("Must be a non-negative integer, got '{value}'"),
        })
    }

    fn parse_output_format(value: &str) -> Result<OutputFormat> {
        match value.trim().to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "tsv" => Ok(OutputFormat::Tsv),
            _ => Err(Error::Validation {
                field: "PARKING_OUTPUT_FORMAT".into(),
                message: format!("Invalid output format '{value}' (expected table/json/csv/tsv)"),
            }),
        }
    }
}
