//! CLI-specific error types with exit codes.
//!
//! This module defines error types specific to the CLI layer,
//! wrapping library errors and providing appropriate exit codes.

use parking::{Error as LibError, Rejection};
use std::fmt;

/// CLI-specific error type with exit code mapping.
#[derive(Debug)]
pub enum CliError {
    /// Library error (wrapped).
    Library(LibError),

    /// Invalid command-line arguments.
    InvalidArguments(String),

    /// I/O error.
    Io(std::io::Error),

    /// Configuration error.
    Config(String),

    /// The submission was refused by a business rule or a conflict.
    Rejected(Rejection),

    /// Login failed or the member may not perform the action.
    Unauthorized(String),
}

impl CliError {
    /// Get the appropriate exit code for this error.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: Reservation rejected
    /// - 2: Login or authorization failure
    /// - 4: Invalid arguments
    /// - 5: I/O or storage error
    /// - 6: Other library error
    /// - 7: Configuration error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Rejected(_) => 1,
            CliError::Unauthorized(_) => 2,
            CliError::InvalidArguments(_) => 4,
            CliError::Io(_) => 5,
            CliError::Library(lib_err) => match lib_err {
                e if e.is_storage_failure() => 5,
                LibError::InvalidLot { .. }
                | LibError::InvalidSpace { .. }
                | LibError::InvalidTime { .. }
                | LibError::MemberMismatch { .. } => 4,
                LibError::Configuration(_) => 7,
                _ => 6,
            },
            CliError::Config(_) => 7,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Library(e) => write!(f, "{e}"),
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
            CliError::Config(msg) => write!(f, "Configuration error: {msg}"),
            CliError::Rejected(reason) => {
                write!(f, "Reservation rejected: {reason} ({})", reason.code())
            }
            CliError::Unauthorized(msg) => write!(f, "Access denied: {msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Library(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::Rejected(r) => Some(r),
            _ => None,
        }
    }
}

impl From<LibError> for CliError {
    fn from(e: LibError) -> Self {
        CliError::Library(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<Rejection> for CliError {
    fn from(reason: Rejection) -> Self {
        CliError::Rejected(reason)
    }
}
