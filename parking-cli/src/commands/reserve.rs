//! Reserve command implementation.
//!
//! This module implements the `reserve` command, which books one space for
//! an interval on a given day on behalf of a logged-in member.

use crate::error::CliError;
use crate::utils::{
    authenticate, load_configuration, load_roster, open_service, parse_date_arg, resolve_now,
    GlobalOptions,
};
use clap::Args;
use parking::reservation::parse_time;
use parking::{Lot, Rejection, ReservationProposal, SpaceCode, SubmitOutcome};

/// Reserve a parking space.
#[derive(Args)]
pub struct ReserveCommand {
    /// Institutional email of the member booking
    #[arg(long, value_name = "EMAIL")]
    pub email: String,

    /// Lot number
    #[arg(long, value_name = "LOT")]
    pub lot: u8,

    /// Space code, e.g. 05E
    #[arg(long, value_name = "CODE")]
    pub space: String,

    /// Date (YYYY-MM-DD, default: the suggested date)
    #[arg(long, value_name = "DATE")]
    pub date: Option<String>,

    /// Start time (HH:MM, default: the suggested start)
    #[arg(long, value_name = "HH:MM")]
    pub start: Option<String>,

    /// End time (HH:MM, default: the suggested end)
    #[arg(long, value_name = "HH:MM")]
    pub end: Option<String>,

    /// Evaluate the rules as of this moment ('YYYY-MM-DD HH:MM')
    #[arg(long, value_name = "DATETIME", env = "PARKING_NOW")]
    pub now: Option<String>,
}

impl ReserveCommand {
    /// Execute the reserve command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        // 1. Load configuration and log the member in
        let config = load_configuration(global)?;
        let roster = load_roster(&config);
        let member = authenticate(&config, &roster, &self.email)?;

        // 2. Open the store
        let service = open_service(&config)?;
        let now = resolve_now(self.now.as_deref())?;

        // 3. Build the proposal, filling gaps from the suggested window
        // Lots and codes outside the inventory are the validator's call.
        let lot = Lot::try_from(self.lot).map_err(parking::Error::from)?;
        let space: SpaceCode = self
            .space
            .parse()
            .map_err(|_| CliError::Rejected(Rejection::UnknownSpace))?;
        let (suggested_date, suggested_start, suggested_end) = service.suggest_window(now);
        let date = match self.date {
            Some(ref date) => parse_date_arg(date)?,
            None => suggested_date,
        };
        let start = match self.start {
            Some(ref start) => parse_time("start", start)?,
            None => suggested_start,
        };
        let end = match self.end {
            Some(ref end) => parse_time("end", end)?,
            None => suggested_end,
        };

        let proposal = ReservationProposal::new(member.email(), lot, space, date, start, end);

        // 4. Submit and report
        match service.submit(&proposal, &member, now)? {
            SubmitOutcome::Accepted(reservation) => {
                println!("{}", reservation.slot());
                if !global.quiet {
                    eprintln!("Reserved for {}", reservation.member_name());
                }
                Ok(())
            }
            SubmitOutcome::Rejected(reason) => Err(CliError::Rejected(reason)),
        }
    }
}
