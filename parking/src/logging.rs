//! Logging infrastructure for the parking library.
//!
//! Library code logs through the [`log`] facade. This module provides the
//! stderr backend used by the CLI, with three coarse verbosity levels.

use std::env;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Environment variable consulted when no verbosity flag is given.
pub const LOG_MODE_ENV: &str = "PARKING_LOG_MODE";

/// Logging level for controlling output verbosity.
///
/// Log levels are ordered from least verbose (Quiet) to most verbose (Verbose).
///
/// # Examples
///
/// ```
/// use parking::LogLevel;
///
/// assert!(LogLevel::Quiet < LogLevel::Normal);
/// assert!(LogLevel::Normal < LogLevel::Verbose);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Suppress all log output.
    Quiet,
    /// Errors and warnings.
    Normal,
    /// Errors, warnings, info, and debug messages.
    Verbose,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quiet => write!(f, "quiet"),
            Self::Normal => write!(f, "normal"),
            Self::Verbose => write!(f, "verbose"),
        }
    }
}

impl LogLevel {
    /// Parses a log level from a string.
    ///
    /// Recognizes: "quiet", "normal", "verbose" (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not recognized.
    ///
    /// # Examples
    ///
    /// ```
    /// use parking::LogLevel;
    ///
    /// assert_eq!(LogLevel::parse("VERBOSE").unwrap(), LogLevel::Verbose);
    /// assert!(LogLevel::parse("loud").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "quiet" => Ok(Self::Quiet),
            "normal" => Ok(Self::Normal),
            "verbose" => Ok(Self::Verbose),
            _ => Err(format!("invalid log level: {s}")),
        }
    }

    /// The most verbose `log` level let through at this setting.
    #[must_use]
    pub const fn filter(self) -> log::LevelFilter {
        match self {
            Self::Quiet => log::LevelFilter::Off,
            Self::Normal => log::LevelFilter::Warn,
            Self::Verbose => log::LevelFilter::Debug,
        }
    }

    const fn to_u8(self) -> u8 {
        match self {
            Self::Quiet => 0,
            Self::Normal => 1,
            Self::Verbose => 2,
        }
    }

    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Quiet,
            1 => Self::Normal,
            _ => Self::Verbose,
        }
    }
}

/// A stderr logger usable as the global [`log`] backend.
///
/// The level lives in an atomic so the process-wide instance can be
/// reconfigured after it has been installed.
///
/// # Examples
///
/// ```
/// use parking::{LogLevel, Logger};
///
/// let logger = Logger::new(LogLevel::Normal);
/// assert_eq!(logger.level(), LogLevel::Normal);
/// ```
#[derive(Debug)]
pub struct Logger {
    level: AtomicU8,
}

static GLOBAL_LOGGER: Logger = Logger::new(LogLevel::Normal);

impl Logger {
    /// Creates a new logger with the specified log level.
    #[must_use]
    pub const fn new(level: LogLevel) -> Self {
        Self {
            level: AtomicU8::new(level.to_u8()),
        }
    }

    /// Returns the current log level.
    #[must_use]
    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::Relaxed))
    }

    /// Changes the log level.
    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level.to_u8(), Ordering::Relaxed);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LogLevel::Normal)
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= self.level().filter()
    }

    fn log(&self, record: &log::Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("{}: {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Resolves the effective level from CLI flags and the environment.
///
/// The priority order is:
/// 1. CLI flags (verbose/quiet, verbose wins when both are set)
/// 2. `PARKING_LOG_MODE` environment variable
/// 3. Default (Normal)
#[must_use]
pub fn resolve_level(verbose: bool, quiet: bool) -> LogLevel {
    if verbose {
        return LogLevel::Verbose;
    }
    if quiet {
        return LogLevel::Quiet;
    }

    env::var(LOG_MODE_ENV)
        .ok()
        .and_then(|value| LogLevel::parse(&value).ok())
        .unwrap_or(LogLevel::Normal)
}

/// Installs the stderr logger as the global `log` backend.
///
/// Safe to call more than once; later calls only change the level.
///
/// # Examples
///
/// ```
/// use parking::{init_logger, LogLevel};
///
/// let level = init_logger(false, true);
/// assert_eq!(level, LogLevel::Quiet);
/// ```
pub fn init_logger(verbose: bool, quiet: bool) -> LogLevel {
    let level = resolve_level(verbose, quiet);
    GLOBAL_LOGGER.set_level(level);
    // Already installed on repeat calls.
    let _ = log::set_logger(&GLOBAL_LOGGER);
    log::set_max_level(level.filter());
    level
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;
    use serial_test::serial;

    struct EnvGuard {
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(value: Option<&str>) -> Self {
            let old_value = env::var(LOG_MODE_ENV).ok();
            match value {
                Some(v) => env::set_var(LOG_MODE_ENV, v),
                None => env::remove_var(LOG_MODE_ENV),
            }
            Self { old_value }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(LOG_MODE_ENV, v),
                None => env::remove_var(LOG_MODE_ENV),
            }
        }
    }

    #[test]
    fn test_log_level_display_and_parse() {
        for level in [LogLevel::Quiet, LogLevel::Normal, LogLevel::Verbose] {
            assert_eq!(LogLevel::parse(&level.to_string()).unwrap(), level);
        }
        assert_eq!(LogLevel::parse("Normal").unwrap(), LogLevel::Normal);
        assert!(LogLevel::parse("").is_err());
    }

    #[test]
    fn test_level_filters() {
        assert_eq!(LogLevel::Quiet.filter(), log::LevelFilter::Off);
        assert_eq!(LogLevel::Normal.filter(), log::LevelFilter::Warn);
        assert_eq!(LogLevel::Verbose.filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_logger_enabled_respects_level() {
        let logger = Logger::new(LogLevel::Normal);
        let warn = log::Metadata::builder().level(log::Level::Warn).build();
        let debug = log::Metadata::builder().level(log::Level::Debug).build();
        assert!(logger.enabled(&warn));
        assert!(!logger.enabled(&debug));

        logger.set_level(LogLevel::Verbose);
        assert!(logger.enabled(&debug));

        logger.set_level(LogLevel::Quiet);
        assert!(!logger.enabled(&warn));
    }

    #[test]
    fn test_logger_default() {
        assert_eq!(Logger::default().level(), LogLevel::Normal);
    }

    #[test]
    #[serial]
    fn test_resolve_level_defaults_to_normal() {
        let _guard = EnvGuard::set(None);
        assert_eq!(resolve_level(false, false), LogLevel::Normal);
    }

    #[test]
    #[serial]
    fn test_resolve_level_flags_override_env() {
        let _guard = EnvGuard::set(Some("quiet"));
        assert_eq!(resolve_level(true, false), LogLevel::Verbose);
        assert_eq!(resolve_level(true, true), LogLevel::Verbose);
        assert_eq!(resolve_level(false, false), LogLevel::Quiet);
    }

    #[test]
    #[serial]
    fn test_resolve_level_invalid_env_falls_back() {
        let _guard = EnvGuard::set(Some("chatty"));
        assert_eq!(resolve_level(false, false), LogLevel::Normal);
    }

    #[test]
    #[serial]
    fn test_init_logger_is_repeatable() {
        let _guard = EnvGuard::set(None);
        assert_eq!(init_logger(true, false), LogLevel::Verbose);
        assert_eq!(init_logger(false, true), LogLevel::Quiet);
        assert_eq!(GLOBAL_LOGGER.level(), LogLevel::Quiet);
    }
}
