//! Spaces command implementation.
//!
//! Prints the grid of space codes of one lot, optionally marking the
//! spaces that already hold a reservation on a given date.

use crate::error::CliError;
use crate::utils::{load_configuration, open_service, parse_date_arg, parse_lot, GlobalOptions};
use clap::Args;
use parking::{Inventory, Lot, Reservation, SpaceCode};
use std::collections::HashSet;
use std::io::Write;

/// Show the spaces of a lot.
#[derive(Args)]
pub struct SpacesCommand {
    /// Lot number
    #[arg(long, value_name = "LOT")]
    pub lot: u8,

    /// Mark spaces with at least one reservation on this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub date: Option<String>,
}

impl SpacesCommand {
    /// Execute the spaces command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let service = open_service(&config)?;
        let lot = parse_lot(&service, self.lot)?;

        let taken = match self.date {
            Some(ref date) => {
                let date = parse_date_arg(date)?;
                booked_spaces(&service.list_all()?, lot, |r| r.date() == date)
            }
            None => HashSet::new(),
        };

        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "Lot {lot}")?;
        write!(handle, "{}", render_grid(service.inventory(), lot, &taken))?;
        if self.date.is_some() && !global.quiet {
            writeln!(handle, "(* = reserved at least once that day)")?;
        }
        Ok(())
    }
}

/// Spaces of `lot` held by a reservation matching `filter`.
pub fn booked_spaces(
    reservations: &[Reservation],
    lot: Lot,
    filter: impl Fn(&Reservation) -> bool,
) -> HashSet<SpaceCode> {
    reservations
        .iter()
        .filter(|r| r.lot() == lot && filter(r))
        .map(|r| r.space().clone())
        .collect()
}

/// Lay out the spaces of `lot` row by row, marking `taken` ones with `*`.
pub fn render_grid(inventory: &Inventory, lot: Lot, taken: &HashSet<SpaceCode>) -> String {
    let spaces = inventory.spaces_for(lot);
    let mut out = String::new();
    for row in spaces.chunks(usize::from(inventory.columns())) {
        let cells: Vec<String> = row
            .iter()
            .map(|code| {
                let mark = if taken.contains(code) { '*' } else { ' ' };
                format!("{code}{mark}")
            })
            .collect();
        out.push_str(cells.join(" ").trim_end());
        out.push('\n');
    }
    out
}
