//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including configuration loading, roster lookup, login, and parsing of
//! lot numbers, dates and clock overrides.

use crate::error::CliError;
use chrono::{Local, NaiveDate, NaiveDateTime};
use parking::reservation::parse_date;
use parking::{Config, ConfigBuilder, Lot, Member, ReservationService, Roster};
use std::path::PathBuf;

/// Format accepted by `--now`.
pub const NOW_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,
}

/// Load layered configuration.
///
/// Configuration is assembled from these sources, highest priority first:
/// 1. `--data-dir` (selects where everything else is read from)
/// 2. Environment variables
/// 3. `config.yaml` in the data directory
/// 4. Built-in defaults
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let mut builder = ConfigBuilder::new();
    if let Some(ref data_dir) = global.data_dir {
        builder = builder.with_data_dir(data_dir);
    }

    let config = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;
    log::debug!("data directory: {}", config.data_dir.display());

    Ok(config)
}

/// Open the reservation service over the configured store.
pub fn open_service(config: &Config) -> Result<ReservationService, CliError> {
    ReservationService::from_config(config).map_err(CliError::from)
}

/// Load the roster named by the configuration.
///
/// A missing or unreadable roster yields an empty one, so every login fails
/// rather than the command aborting.
pub fn load_roster(config: &Config) -> Roster {
    Roster::load_or_empty(&config.roster_path())
}

/// Resolve `email` to a member, enforcing the institutional domain.
///
/// # Errors
///
/// Returns [`CliError::Unauthorized`] if the address is outside the
/// institutional domain or not on the roster.
pub fn authenticate(config: &Config, roster: &Roster, email: &str) -> Result<Member, CliError> {
    if !config.is_institutional_email(email) {
        return Err(CliError::Unauthorized(format!(
            "'{}' is not a {} address",
            email.trim(),
            config.institutional_domain
        )));
    }

    roster.resolve(email).cloned().ok_or_else(|| {
        CliError::Unauthorized(format!("'{}' is not a registered member", email.trim()))
    })
}

/// Parse a lot number against the configured inventory.
pub fn parse_lot(service: &ReservationService, number: u8) -> Result<Lot, CliError> {
    service.inventory().lot(number).map_err(CliError::from)
}

/// Parse a `YYYY-MM-DD` date argument.
pub fn parse_date_arg(value: &str) -> Result<NaiveDate, CliError> {
    parse_date(value).map_err(CliError::from)
}

/// Resolve the clock: the `--now` override if given, the local time otherwise.
pub fn resolve_now(now: Option<&str>) -> Result<NaiveDateTime, CliError> {
    match now {
        Some(value) => NaiveDateTime::parse_from_str(value.trim(), NOW_FORMAT).map_err(|_| {
            CliError::InvalidArguments(format!(
                "invalid --now '{value}', expected 'YYYY-MM-DD HH:MM'"
            ))
        }),
        None => Ok(Local::now().naive_local()),
    }
}
