//! Login command implementation.
//!
//! Checks that an email belongs to a registered member of the institution
//! and prints who they are.

use crate::error::CliError;
use crate::utils::{authenticate, load_configuration, load_roster, GlobalOptions};
use clap::Args;

/// Check a member's credentials.
#[derive(Args)]
pub struct LoginCommand {
    /// Institutional email address
    #[arg(long, value_name = "EMAIL")]
    pub email: String,
}

impl LoginCommand {
    /// Execute the login command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let roster = load_roster(&config);
        if roster.is_empty() {
            log::warn!("roster {} is empty or missing", config.roster_path().display());
        }

        let member = authenticate(&config, &roster, &self.email)?;

        println!("{}\t{}\t{}", member.email(), member.display_name(), member.role());
        if !global.quiet {
            eprintln!("Welcome, {}", member.display_name());
            if member.role().can_view_all() {
                eprintln!("You may view all reservations with `parking list`");
            }
        }
        Ok(())
    }
}
