//! Configuration file loading.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::{Config, CONFIG_FILE_NAME};
use crate::error::{Error, Result};

/// Loads `config.yaml` from a data directory.
///
/// # Examples
///
/// ```no_run
/// use parking::config::ConfigLoader;
/// use std::path::Path;
///
/// if let Some(config) = ConfigLoader::load_from_dir(Path::new("data")).unwrap() {
///     println!("{} lots", config.lots);
/// }
/// ```
pub struct ConfigLoader;

impl ConfigLoader {
    /// Path of the configuration file inside `data_dir`.
    #[must_use]
    pub fn config_path(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE_NAME)
    }

    /// Loads the configuration file of `data_dir`, if there is one.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from_dir(data_dir: &Path) -> Result<Option<Config>> {
        let path = Self::config_path(data_dir);
        if !path.exists() {
            log::debug!("no configuration file at {}", path.display());
            return Ok(None);
        }
        Self::load_file(&path).map(Some)
    }

    /// Load and parse a YAML configuration file.
    ///
    /// An empty file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the YAML is invalid.
    pub fn load_file(path: &Path) -> Result<Config> {
        let contents = fs::read_to_string(path).map_err(|e| Error::Validation {
            field: path.display().to_string(),
            message: format!("Failed to read configuration file: {e}"),
        })?;

        if contents.trim().is_empty() {
            return Ok(Config::default());
        }

        let config = serde_yaml::from_str(&contents)?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }
}
