//! Configuration schema definitions.
//!
//! Every field has a default, so an empty or missing `config.yaml` yields
//! the stock deployment: three lots of 4x6 spaces, open 08:00-23:00, with
//! thirty minutes of notice.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::inventory::Inventory;
use crate::reservation::parse_time;
use crate::validator::ServiceRules;

/// Default data directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Name of the configuration file inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Complete configuration.
///
/// # Examples
///
/// ```
/// use parking::config::{Config, StorageKind};
///
/// let config = Config {
///     storage: StorageKind::Sqlite,
///     lots: 2,
///     ..Default::default()
/// };
/// assert_eq!(config.inventory().unwrap().lot_count(), 2);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    /// Directory relative paths are resolved against. Not read from the
    /// file itself.
    #[serde(skip)]
    pub data_dir: PathBuf,

    /// Member roster (`correo,nombre,categoria`).
    pub roster_file: PathBuf,

    /// Reservation log or database.
    pub reservations_file: PathBuf,

    /// Storage backend.
    pub storage: StorageKind,

    /// Number of lots.
    pub lots: u8,

    /// Grid rows per lot.
    pub rows: u8,

    /// Grid columns per lot.
    pub columns: u8,

    /// Earliest start, `HH:MM`.
    pub opening_time: String,

    /// Latest end, `HH:MM`.
    pub closing_time: String,

    /// Minimum minutes between booking and start.
    pub minimum_notice_minutes: u32,

    /// Email suffix required at login, e.g. `@utp.edu.pe`.
    pub institutional_domain: String,

    /// Default output format for listings.
    pub output_format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            roster_file: PathBuf::from("usuarios.csv"),
            reservations_file: PathBuf::from("reservas.csv"),
            storage: StorageKind::Csv,
            lots: Inventory::DEFAULT_LOTS,
            rows: Inventory::DEFAULT_ROWS,
            columns: Inventory::DEFAULT_COLUMNS,
            opening_time: "08:00".to_string(),
            closing_time: "23:00".to_string(),
            minimum_notice_minutes: 30,
            institutional_domain: "@utp.edu.pe".to_string(),
            output_format: OutputFormat::Table,
        }
    }
}

impl Config {
    /// Sets the data directory.
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl AsRef<Path>) -> Self {
        self.data_dir = expand_home(data_dir.as_ref());
        self
    }

    /// Resolved path of the roster file.
    #[must_use]
    pub fn roster_path(&self) -> PathBuf {
        self.resolve(&self.roster_file)
    }

    /// Resolved path of the reservation log or database.
    #[must_use]
    pub fn reservations_path(&self) -> PathBuf {
        self.resolve(&self.reservations_file)
    }

    /// The lot inventory described by `lots`, `rows` and `columns`.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are out of range.
    pub fn inventory(&self) -> Result<Inventory> {
        Inventory::new(self.lots, self.rows, self.columns)
    }

    /// The time rules described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if either service time is not a valid `HH:MM`.
    pub fn service_rules(&self) -> Result<ServiceRules> {
        Ok(ServiceRules {
            opening: parse_time("opening_time", &self.opening_time)?,
            closing: parse_time("closing_time", &self.closing_time)?,
            minimum_notice: Duration::minutes(i64::from(self.minimum_notice_minutes)),
            ..ServiceRules::default()
        })
    }

    /// Returns `true` if `email` ends with the institutional domain
    /// (case-insensitive).
    #[must_use]
    pub fn is_institutional_email(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        let domain = self.institutional_domain.to_lowercase();
        email.len() > domain.len() && email.ends_with(&domain)
    }

    fn resolve(&self, file: &Path) -> PathBuf {
        let file = expand_home(file);
        if file.is_absolute() {
            file
        } else {
            self.data_dir.join(file)
        }
    }
}

/// Expands a leading `~` to the home directory.
fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => home::home_dir().map_or_else(|| path.to_path_buf(), |home| home.join(rest)),
        Err(_) => path.to_path_buf(),
    }
}

/// Reservation storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Header-first CSV append log.
    #[default]
    Csv,
    /// `SQLite` database.
    Sqlite,
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(format!("unknown storage backend '{other}' (expected csv or sqlite)")),
        }
    }
}

/// Output format for reservation listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output format.
    Json,
    /// CSV output format.
    Csv,
    /// TSV output format.
    Tsv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
            Self::Tsv => write!(f, "tsv"),
        }
    }
}
