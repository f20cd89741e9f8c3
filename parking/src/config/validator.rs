//! Configuration validation.

use crate::config::schema::Config;
use crate::error::{Error, Result};

/// Upper bound on `minimum_notice_minutes` (one week).
const MAX_NOTICE_MINUTES: u32 = 7 * 24 * 60;

/// Validates a fully assembled configuration.
///
/// # Examples
///
/// ```
/// use parking::config::{Config, ConfigValidator};
///
/// ConfigValidator::validate(&Config::default()).unwrap();
///
/// let closed = Config {
///     opening_time: "23:00".into(),
///     closing_time: "08:00".into(),
///     ..Default::default()
/// };
/// assert!(ConfigValidator::validate(&closed).is_err());
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: bad grid dimensions, unparseable or
    /// inverted service hours, an out-of-range notice, a malformed
    /// institutional domain, or an empty file name.
    pub fn validate(config: &Config) -> Result<()> {
        config.inventory()?;

        let rules = config.service_rules()?;
        if rules.opening >= rules.closing {
            return Err(Error::Validation {
                field: "opening_time".into(),
                message: format!(
                    "must be before closing_time ({} >= {})",
                    config.opening_time, config.closing_time
                ),
            });
        }

        if config.minimum_notice_minutes > MAX_NOTICE_MINUTES {
            return Err(Error::Validation {
                field: "minimum_notice_minutes".into(),
                message: format!("cannot exceed {MAX_NOTICE_MINUTES}"),
            });
        }

        Self::validate_domain(&config.institutional_domain)?;

        if config.roster_file.as_os_str().is_empty() {
            return Err(Error::Validation {
                field: "roster_file".into(),
                message: "cannot be empty".into(),
            });
        }
        if config.reservations_file.as_os_str().is_empty() {
            return Err(Error::Validation {
                field: "reservations_file".into(),
                message: "cannot be empty".into(),
            });
        }

        Ok(())
    }

    fn validate_domain(domain: &str) -> Result<()> {
        let invalid = |message: &str| Error::Validation {
            field: "institutional_domain".into(),
            message: message.into(),
        };

        if !domain.starts_with('@') {
            return Err(invalid("must start with '@', e.g. @utp.edu.pe"));
        }
        if domain.len() < 2 || domain[1..].contains('@') {
            return Err(invalid("must contain exactly one '@' followed by a host"));
        }
        if domain.chars().any(char::is_whitespace) {
            return Err(invalid("cannot contain whitespace"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn with(f: impl FnOnce(&mut Config)) -> Result<()> {
        let mut config = Config::default();
        f(&mut config);
        ConfigValidator::validate(&config)
    }

    #[test]
    fn test_default_is_valid() {
        assert!(with(|_| {}).is_ok());
    }

    #[test]
    fn test_grid_dimensions() {
        assert!(with(|c| c.lots = 0).is_err());
        assert!(with(|c| c.rows = 0).is_err());
        assert!(with(|c| c.columns = 27).is_err());
        assert!(with(|c| {
            c.rows = 10;
            c.columns = 10;
        })
        .is_err());
        assert!(with(|c| {
            c.rows = 9;
            c.columns = 11;
        })
        .is_ok());
    }

    #[test]
    fn test_service_hours() {
        assert!(with(|c| c.opening_time = "8am".into()).is_err());
        assert!(with(|c| c.closing_time = c.opening_time.clone()).is_err());
        assert!(with(|c| {
            c.opening_time = "06:00".into();
            c.closing_time = "06:30".into();
        })
        .is_ok());
    }

    #[test]
    fn test_notice_bound() {
        assert!(with(|c| c.minimum_notice_minutes = 0).is_ok());
        assert!(with(|c| c.minimum_notice_minutes = MAX_NOTICE_MINUTES + 1).is_err());
    }

    #[test]
    fn test_domain_rules() {
        assert!(with(|c| c.institutional_domain = "utp.edu.pe".into()).is_err());
        assert!(with(|c| c.institutional_domain = "@".into()).is_err());
        assert!(with(|c| c.institutional_domain = "@a@b".into()).is_err());
        assert!(with(|c| c.institutional_domain = "@utp .edu".into()).is_err());
        assert!(with(|c| c.institutional_domain = "@example.org".into()).is_ok());
    }

    #[test]
    fn test_file_names_required() {
        assert!(with(|c| c.roster_file = PathBuf::new()).is_err());
        assert!(with(|c| c.reservations_file = PathBuf::new()).is_err());
    }
}
