//! Main entry point for the parking CLI.
//!
//! This is the command-line interface for the parking reservation system.
//! It provides commands for booking spaces:
//! - `login`: Check a member's credentials
//! - `spaces`: Show the space grid of a lot
//! - `reserve`: Book a space for an interval
//! - `list`: List every reservation
//! - `shell`: Interactive booking session

mod cli;
mod commands;
mod error;
mod session;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let _level = parking::init_logger(cli.verbose, cli.quiet);

    let global = GlobalOptions {
        quiet: cli.quiet,
        data_dir: cli.data_dir,
    };

    // Execute the command
    let result = match cli.command {
        cli::Command::Login(cmd) => cmd.execute(&global),
        cli::Command::Spaces(cmd) => cmd.execute(&global),
        cli::Command::Reserve(cmd) => cmd.execute(&global),
        cli::Command::List(cmd) => cmd.execute(&global),
        cli::Command::Shell(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
