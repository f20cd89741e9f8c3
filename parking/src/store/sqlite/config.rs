//! Connection parameters for the `SQLite` backend.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for opening a [`super::SqliteStore`].
///
/// # Examples
///
/// ```
/// use parking::store::DatabaseConfig;
/// use std::time::Duration;
///
/// let config = DatabaseConfig::new("/tmp/reservas.db")
///     .with_busy_timeout(Duration::from_secs(10));
/// assert_eq!(config.busy_timeout, Duration::from_secs(10));
/// assert!(config.auto_create);
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to the database file.
    pub path: PathBuf,
    /// How long to wait on a database locked by another connection.
    pub busy_timeout: Duration,
    /// Whether to create the file and its parent directory if missing.
    pub auto_create: bool,
}

impl DatabaseConfig {
    /// Creates a configuration with a 5 second busy timeout and
    /// auto-creation enabled.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            busy_timeout: Duration::from_millis(5000),
            auto_create: true,
        }
    }

    /// Sets the busy timeout.
    #[must_use]
    pub const fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Requires the database file to exist already.
    #[must_use]
    pub const fn existing_only(mut self) -> Self {
        self.auto_create = false;
        self
    }
}
