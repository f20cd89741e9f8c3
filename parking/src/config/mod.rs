//! Configuration for the parking library.
//!
//! Configuration is layered, highest precedence first:
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_config`)
//! 2. Environment variables (`PARKING_*`)
//! 3. `<data_dir>/config.yaml`
//! 4. Built-in defaults
//!
//! # Examples
//!
//! ```
//! use parking::config::{Config, ConfigBuilder, StorageKind};
//!
//! let custom = Config {
//!     storage: StorageKind::Sqlite,
//!     reservations_file: "reservas.db".into(),
//!     ..Default::default()
//! };
//!
//! let config = ConfigBuilder::new()
//!     .skip_files()
//!     .skip_env()
//!     .with_config(custom)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.storage, StorageKind::Sqlite);
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod schema;
pub mod validator;

#[cfg(test)]
mod proptests;

pub use builder::ConfigBuilder;
pub use environment::{EnvironmentConfig, DATA_DIR_ENV};
pub use loader::ConfigLoader;
pub use schema::{Config, OutputFormat, StorageKind, CONFIG_FILE_NAME, DEFAULT_DATA_DIR};
pub use validator::ConfigValidator;
