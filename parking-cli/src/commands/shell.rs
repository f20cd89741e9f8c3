//! Interactive shell command.
//!
//! A line-oriented front end over the same service the other commands use:
//! log in, pick a lot, pick a space, enter a time, confirm the booking.
//! Admins and faculty can also list every reservation from the main menu.

use crate::commands::list::write_reservations;
use crate::commands::spaces::{booked_spaces, render_grid};
use crate::error::CliError;
use crate::session::{Action, SessionState};
use crate::utils::{
    authenticate, load_configuration, load_roster, open_service, resolve_now, GlobalOptions,
};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::Args;
use parking::reservation::{parse_date, parse_time, DATE_FORMAT, TIME_FORMAT};
use parking::{Config, ReservationProposal, ReservationService, Roster, SpaceCode, SubmitOutcome};
use std::collections::HashSet;
use std::io::{self, BufRead, Write};

/// Start an interactive booking session.
#[derive(Args)]
pub struct ShellCommand {
    /// Log in as this member right away
    #[arg(long, value_name = "EMAIL")]
    pub email: Option<String>,

    /// Evaluate the rules as of this moment ('YYYY-MM-DD HH:MM')
    #[arg(long, value_name = "DATETIME", env = "PARKING_NOW")]
    pub now: Option<String>,
}

impl ShellCommand {
    /// Execute the shell command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let roster = load_roster(&config);
        let service = open_service(&config)?;
        let now = match self.now {
            Some(ref now) => Some(resolve_now(Some(now))?),
            None => None,
        };

        let shell = Shell {
            config: &config,
            roster: &roster,
            service: &service,
            now,
        };

        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut out = stdout.lock();

        let mut state = SessionState::LoggedOut;
        if let Some(ref email) = self.email {
            if let Some(next) = shell.handle(&mut out, &state, email)? {
                state = next;
            }
        }

        shell.run(stdin.lock(), &mut out, state)
    }
}

/// The shell's collaborators, borrowed for one session.
pub struct Shell<'a> {
    /// Loaded configuration.
    pub config: &'a Config,
    /// Members allowed to log in.
    pub roster: &'a Roster,
    /// Service used for every booking.
    pub service: &'a ReservationService,
    /// Fixed clock; the local time is used when absent.
    pub now: Option<NaiveDateTime>,
}

impl Shell<'_> {
    fn clock(&self) -> NaiveDateTime {
        self.now.unwrap_or_else(|| Local::now().naive_local())
    }

    /// Read commands from `input` until it ends or the user quits.
    pub fn run<R: BufRead, W: Write>(
        &self,
        input: R,
        out: &mut W,
        mut state: SessionState,
    ) -> Result<(), CliError> {
        self.prompt(out, &state)?;
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
                writeln!(out, "Bye")?;
                return Ok(());
            }

            if let Some(next) = self.handle(out, &state, line)? {
                state = next;
            }
            self.prompt(out, &state)?;
        }
        writeln!(out)?;
        Ok(())
    }

    /// Act on one line of input, returning the next state if it changed.
    ///
    /// Problems the user can fix and storage faults are printed to `out`;
    /// only failures to write output are returned as errors.
    pub fn handle<W: Write>(
        &self,
        out: &mut W,
        state: &SessionState,
        line: &str,
    ) -> Result<Option<SessionState>, CliError> {
        let line = line.trim();
        let action = match state {
            SessionState::LoggedOut => match authenticate(self.config, self.roster, line) {
                Ok(member) => {
                    writeln!(out, "Welcome, {} ({})", member.display_name(), member.role())?;
                    Action::Login(member)
                }
                Err(e) => {
                    writeln!(out, "{e}")?;
                    return Ok(None);
                }
            },

            SessionState::MainMenu { member } => match line {
                "1" | "reserve" => Action::StartReservation,
                "2" | "list" if member.role().can_view_all() => match self.service.list_all() {
                    Ok(reservations) => {
                        write_reservations(out, &reservations, self.config.output_format)?;
                        Action::ViewAll
                    }
                    Err(e) => {
                        log::error!("listing failed: {e}");
                        writeln!(out, "Could not read the reservations: {e}")?;
                        return Ok(None);
                    }
                },
                "3" | "logout" => {
                    writeln!(out, "Logged out")?;
                    Action::Logout
                }
                _ => {
                    writeln!(out, "Unknown option '{line}'")?;
                    return Ok(None);
                }
            },

            SessionState::SelectingLot { .. } => {
                if is_back(line) {
                    Action::Back
                } else {
                    let lot = line
                        .parse::<u8>()
                        .ok()
                        .and_then(|n| self.service.inventory().lot(n).ok());
                    match lot {
                        Some(lot) => Action::PickLot(lot),
                        None => {
                            writeln!(out, "No lot '{line}'")?;
                            return Ok(None);
                        }
                    }
                }
            }

            SessionState::SelectingSpace { lot, .. } => {
                if is_back(line) {
                    Action::Back
                } else {
                    match line.parse::<SpaceCode>() {
                        Ok(code) if self.service.inventory().contains_space(*lot, &code) => {
                            Action::PickSpace(code)
                        }
                        _ => {
                            writeln!(out, "No space '{line}' in lot {lot}")?;
                            return Ok(None);
                        }
                    }
                }
            }

            SessionState::ConfirmingTime { member, lot, space } => {
                if is_back(line) {
                    Action::Back
                } else {
                    let suggested = self.service.suggest_window(self.clock());
                    let (date, start, end) = match parse_interval(line, suggested) {
                        Ok(window) => window,
                        Err(e) => {
                            writeln!(out, "{e}")?;
                            return Ok(None);
                        }
                    };
                    Action::Propose(ReservationProposal::new(
                        member.email(),
                        *lot,
                        space.clone(),
                        date,
                        start,
                        end,
                    ))
                }
            }

            SessionState::ReviewingBooking { member, proposal } => {
                if is_back(line) || is_answer(line, "n", "no") {
                    Action::Back
                } else if is_answer(line, "y", "yes") {
                    match self.service.submit(proposal, member, self.clock()) {
                        Ok(SubmitOutcome::Accepted(reservation)) => {
                            writeln!(out, "Reserved {}", reservation.slot())?;
                            Action::Submitted { accepted: true }
                        }
                        Ok(SubmitOutcome::Rejected(reason)) => {
                            writeln!(out, "Rejected: {reason} ({})", reason.code())?;
                            Action::Submitted { accepted: false }
                        }
                        Err(e) => {
                            log::error!("submit failed: {e}");
                            writeln!(out, "Could not save the reservation: {e}")?;
                            return Ok(None);
                        }
                    }
                } else {
                    writeln!(out, "Answer y or n")?;
                    return Ok(None);
                }
            }
        };

        Ok(state.next(action))
    }

    fn prompt<W: Write>(&self, out: &mut W, state: &SessionState) -> Result<(), CliError> {
        match state {
            SessionState::LoggedOut => write!(out, "Email ([q] quit): ")?,
            SessionState::MainMenu { member } => {
                write!(out, "[1] reserve  ")?;
                if member.role().can_view_all() {
                    write!(out, "[2] list all  ")?;
                }
                write!(out, "[3] logout  [q] quit\n> ")?;
            }
            SessionState::SelectingLot { .. } => {
                let lots: Vec<String> =
                    self.service.inventory().lots().map(|l| l.to_string()).collect();
                write!(out, "Lot ({}) [b] back: ", lots.join(", "))?;
            }
            SessionState::SelectingSpace { lot, .. } => {
                let (date, _, _) = self.service.suggest_window(self.clock());
                let taken = match self.service.list_all() {
                    Ok(reservations) => booked_spaces(&reservations, *lot, |r| r.date() == date),
                    Err(e) => {
                        log::error!("listing failed: {e}");
                        writeln!(out, "Could not read the reservations, taken spaces not shown: {e}")?;
                        HashSet::new()
                    }
                };
                writeln!(out, "Lot {lot} on {}", date.format(DATE_FORMAT))?;
                write!(out, "{}", render_grid(self.service.inventory(), *lot, &taken))?;
                write!(out, "Space [b] back: ")?;
            }
            SessionState::ConfirmingTime { lot, space, .. } => {
                let (date, start, end) = self.service.suggest_window(self.clock());
                write!(
                    out,
                    "Lot {lot} space {space}: [DATE] START END (empty for {} {}-{}) [b] back: ",
                    date.format(DATE_FORMAT),
                    start.format(TIME_FORMAT),
                    end.format(TIME_FORMAT)
                )?;
            }
            SessionState::ReviewingBooking { member, proposal } => {
                write!(out, "Book {} for {}? [y/n]: ", proposal.slot(), member.display_name())?;
            }
        }
        out.flush()?;
        Ok(())
    }
}

fn is_back(line: &str) -> bool {
    is_answer(line, "b", "back")
}

fn is_answer(line: &str, short: &str, long: &str) -> bool {
    line.eq_ignore_ascii_case(short) || line.eq_ignore_ascii_case(long)
}

/// Parse `[DATE] START END`, falling back to `suggested` for an empty line
/// and to the suggested date when only times are given.
fn parse_interval(
    line: &str,
    suggested: (NaiveDate, NaiveTime, NaiveTime),
) -> Result<(NaiveDate, NaiveTime, NaiveTime), CliError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        [] => Ok(suggested),
        [start, end] => Ok((suggested.0, parse_time("start", start)?, parse_time("end", end)?)),
        [date, start, end] => Ok((
            parse_date(date)?,
            parse_time("start", start)?,
            parse_time("end", end)?,
        )),
        _ => Err(CliError::InvalidArguments(format!(
            "expected '[YYYY-MM-DD] HH:MM HH:MM', got '{line}'"
        ))),
    }
}
