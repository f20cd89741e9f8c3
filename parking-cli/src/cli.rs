//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    CompletionsCommand, ListCommand, LoginCommand, ReserveCommand, ShellCommand, SpacesCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for booking parking spaces.
#[derive(Parser)]
#[command(name = "parking")]
#[command(version, about = "Book parking spaces without double-booking", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "PARKING_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Check a member's credentials
    Login(LoginCommand),

    /// Show the spaces of a lot
    Spaces(SpacesCommand),

    /// Reserve a parking space
    Reserve(ReserveCommand),

    /// List every reservation (admins and faculty only)
    List(ListCommand),

    /// Start an interactive booking session
    Shell(ShellCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
