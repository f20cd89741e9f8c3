//! Error types for the parking library.
//!
//! This module provides the error hierarchy for I/O faults, configuration
//! problems, and malformed input, using `thiserror` for ergonomic error
//! handling. Business outcomes (a rule violation, a taken space) are not
//! errors; they are reported through [`crate::Rejection`] and
//! [`crate::InsertOutcome`].

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a parking error.
///
/// # Examples
///
/// ```
/// use parking::{Error, Result};
///
/// fn example_operation() -> Result<u8> {
///     Ok(3)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the parking library.
#[derive(Debug, Error)]
pub enum Error {
    /// The member roster could not be read.
    #[error("invalid roster {}: {reason}", path.display())]
    InvalidRoster {
        /// Path of the roster file.
        path: PathBuf,
        /// Why the roster could not be used.
        reason: String,
    },

    /// A persisted reservation line could not be parsed.
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord {
        /// One-based line number in the reservation log.
        line: u64,
        /// Why the record was rejected.
        reason: String,
    },

    /// Appending an accepted reservation to durable storage failed.
    ///
    /// The reservation was NOT persisted; the caller may retry later.
    #[error("failed to persist reservation to {}: {source}", path.display())]
    StorageWrite {
        /// Storage location that rejected the write.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A CSV encoding or decoding error occurred.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A lot number outside the configured inventory.
    #[error("invalid lot {value}: {reason}")]
    InvalidLot {
        /// The rejected lot number.
        value: u8,
        /// The reason the lot is invalid.
        reason: String,
    },

    /// A space code that is not well formed.
    #[error("invalid space code '{value}': {reason}")]
    InvalidSpace {
        /// The rejected code.
        value: String,
        /// The reason the code is invalid.
        reason: String,
    },

    /// A date or time string that could not be parsed.
    #[error("invalid {field} '{value}': expected {expected}")]
    InvalidTime {
        /// Which field was being parsed.
        field: &'static str,
        /// The rejected input.
        value: String,
        /// The expected format.
        expected: &'static str,
    },

    /// A proposal submitted on behalf of a different member.
    #[error("proposal for {proposal_email} submitted as {member_email}")]
    MemberMismatch {
        /// Email carried by the proposal.
        proposal_email: String,
        /// Email of the resolved member.
        member_email: String,
    },

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: i32,
        /// The schema version found in the database.
        found: i32,
    },
}

impl From<crate::inventory::InvalidLotError> for Error {
    fn from(err: crate::inventory::InvalidLotError) -> Self {
        Self::InvalidLot {
            value: err.value,
            reason: err.reason,
        }
    }
}

impl From<crate::inventory::InvalidSpaceError> for Error {
    fn from(err: crate::inventory::InvalidSpaceError) -> Self {
        Self::InvalidSpace {
            value: err.value,
            reason: err.reason,
        }
    }
}

impl Error {
    /// Check if the error means an accepted reservation was not persisted.
    ///
    /// # Examples
    ///
    /// ```
    /// use parking::Error;
    /// use std::path::PathBuf;
    ///
    /// let err = Error::StorageWrite {
    ///     path: PathBuf::from("data/reservas.csv"),
    ///     source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
    /// };
    /// assert!(err.is_storage_failure());
    /// ```
    #[must_use]
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            Self::StorageWrite { .. } | Self::Io(_) | Self::Database(_) | Self::Csv(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_roster_error() {
        let err = Error::InvalidRoster {
            path: PathBuf::from("data/usuarios.csv"),
            reason: "file not found".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("invalid roster"));
        assert!(display.contains("usuarios.csv"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_malformed_record_error() {
        let err = Error::MalformedRecord {
            line: 7,
            reason: "expected 8 fields".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("line 7"));
        assert!(display.contains("expected 8 fields"));
    }

    #[test]
    fn test_storage_write_error_keeps_source() {
        use std::error::Error as _;

        let err = Error::StorageWrite {
            path: PathBuf::from("/data/reservas.csv"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        assert!(err.to_string().contains("failed to persist"));
        assert!(err.source().is_some());
        assert!(err.is_storage_failure());
    }

    #[test]
    fn test_validation_error() {
        let err = Error::Validation {
            field: "opening_time".to_string(),
            message: "must be before closing_time".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("validation error"));
        assert!(display.contains("opening_time"));
    }

    #[test]
    fn test_invalid_time_error() {
        let err = Error::InvalidTime {
            field: "start",
            value: "9am".to_string(),
            expected: "HH:MM",
        };
        assert_eq!(err.to_string(), "invalid start '9am': expected HH:MM");
        assert!(!err.is_storage_failure());
    }

    #[test]
    fn test_member_mismatch_error() {
        let err = Error::MemberMismatch {
            proposal_email: "a@utp.edu.pe".to_string(),
            member_email: "b@utp.edu.pe".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("a@utp.edu.pe"));
        assert!(display.contains("b@utp.edu.pe"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(format!("{err}").contains("I/O error"));
        assert!(err.is_storage_failure());
    }

    #[test]
    fn test_unsupported_schema_version_error() {
        let err = Error::UnsupportedSchemaVersion {
            expected: 1,
            found: 2,
        };
        let display = format!("{err}");
        assert!(display.contains("expected 1"));
        assert!(display.contains("found 2"));
    }
}
