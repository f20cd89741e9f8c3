//! Assembles the final configuration from its sources.

use std::path::{Path, PathBuf};

use crate::config::environment::EnvironmentConfig;
use crate::config::loader::ConfigLoader;
use crate::config::schema::{Config, DEFAULT_DATA_DIR};
use crate::config::validator::ConfigValidator;
use crate::error::Result;

/// Builder for [`Config`].
///
/// Precedence, highest first: [`ConfigBuilder::with_config`], `PARKING_*`
/// environment variables, `<data_dir>/config.yaml`, built-in defaults. The
/// data directory comes from [`ConfigBuilder::with_data_dir`], then
/// `PARKING_DATA_DIR`, then `./data`.
///
/// # Examples
///
/// ```
/// use parking::config::{Config, ConfigBuilder};
///
/// let config = ConfigBuilder::new()
///     .skip_files()
///     .skip_env()
///     .with_data_dir("/srv/parking")
///     .build()
///     .unwrap();
/// assert_eq!(config, Config::default().with_data_dir("/srv/parking"));
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    data_dir: Option<PathBuf>,
    skip_files: bool,
    skip_env: bool,
    overrides: Option<Config>,
}

impl ConfigBuilder {
    /// Creates a builder that reads every source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `data_dir` instead of `PARKING_DATA_DIR` or the default.
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl AsRef<Path>) -> Self {
        self.data_dir = Some(data_dir.as_ref().to_path_buf());
        self
    }

    /// Ignores `config.yaml`.
    #[must_use]
    pub const fn skip_files(mut self) -> Self {
        self.skip_files = true;
        self
    }

    /// Ignores `PARKING_*` environment variables.
    #[must_use]
    pub const fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Replaces everything read from files and the environment.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.overrides = Some(config);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or parsed, or if the
    /// result fails validation.
    pub fn build(self) -> Result<Config> {
        let data_dir = self
            .data_dir
            .or_else(|| {
                if self.skip_env {
                    None
                } else {
                    EnvironmentConfig::data_dir()
                }
            })
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let mut config = if let Some(overrides) = self.overrides {
            overrides
        } else {
            let mut config = if self.skip_files {
                Config::default()
            } else {
                ConfigLoader::load_from_dir(&data_dir)?.unwrap_or_default()
            };
            if !self.skip_env {
                EnvironmentConfig::apply_overrides(&mut config)?;
            }
            config
        };

        config = config.with_data_dir(&data_dir);
        ConfigValidator::validate(&config)?;
        log::debug!(
            "configuration: data dir {}, {} storage, {} lots",
            config.data_dir.display(),
            config.storage,
            config.lots
        );
        Ok(config)
    }
}
