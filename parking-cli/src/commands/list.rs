//! List command implementation.
//!
//! This module implements the `list` command, which displays every
//! reservation to admins and faculty in various formats (table, JSON, CSV,
//! TSV).

use crate::error::CliError;
use crate::utils::{
    authenticate, load_configuration, load_roster, open_service, parse_date_arg, parse_lot,
    GlobalOptions,
};
use clap::{Args, ValueEnum};
use parking::config::OutputFormat;
use parking::reservation::{DATE_FORMAT, TIME_FORMAT};
use parking::Reservation;
use std::io::Write;

/// Column headers for CSV/TSV output.
const COLUMN_HEADERS: [&str; 8] = [
    "email", "name", "role", "lot", "space", "date", "start", "end",
];

/// List every reservation (admins and faculty only).
#[derive(Args)]
pub struct ListCommand {
    /// Institutional email of the member asking
    #[arg(long, value_name = "EMAIL")]
    pub email: String,

    /// Output format (defaults to the configured one)
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<FormatArg>,

    /// Only reservations on this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub date: Option<String>,

    /// Only reservations in this lot
    #[arg(long, value_name = "LOT")]
    pub lot: Option<u8>,

    /// Only reservations made by this member
    #[arg(long, value_name = "EMAIL")]
    pub member: Option<String>,
}

/// Output format for list command.
#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum FormatArg {
    /// Tab-separated table format (human-readable)
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// TSV format (tab-separated values)
    Tsv,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Table => OutputFormat::Table,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Tsv => OutputFormat::Tsv,
        }
    }
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        // 1. Load configuration and check who is asking
        let config = load_configuration(global)?;
        let roster = load_roster(&config);
        let member = authenticate(&config, &roster, &self.email)?;
        if !member.role().can_view_all() {
            return Err(CliError::Unauthorized(format!(
                "{} members cannot view all reservations",
                member.role()
            )));
        }

        // 2. Read the reservation log
        let service = open_service(&config)?;
        let mut reservations = service.list_all()?;

        // 3. Apply filters
        if let Some(ref date) = self.date {
            let date = parse_date_arg(date)?;
            reservations.retain(|r| r.date() == date);
        }

        if let Some(lot) = self.lot {
            let lot = parse_lot(&service, lot)?;
            reservations.retain(|r| r.lot() == lot);
        }

        if let Some(ref email) = self.member {
            let email = email.trim().to_lowercase();
            reservations.retain(|r| r.member_email().to_lowercase() == email);
        }

        // 4. Format and output to stdout
        let format = self.format.map_or(config.output_format, OutputFormat::from);
        let stdout = std::io::stdout();
        write_reservations(&mut stdout.lock(), &reservations, format)
    }
}

/// Write `reservations` to `out` in `format`.
pub fn write_reservations<W: Write>(
    out: &mut W,
    reservations: &[Reservation],
    format: OutputFormat,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Table => format_as_table(out, reservations),
        OutputFormat::Json => format_as_json(out, reservations),
        OutputFormat::Csv => format_as_delimited(out, reservations, b','),
        OutputFormat::Tsv => format_as_delimited(out, reservations, b'\t'),
    }
}

fn row(res: &Reservation) -> [String; 8] {
    [
        res.member_email().to_string(),
        res.member_name().to_string(),
        res.member_role().to_string(),
        res.lot().to_string(),
        res.space().to_string(),
        res.date().format(DATE_FORMAT).to_string(),
        res.start().format(TIME_FORMAT).to_string(),
        res.end().format(TIME_FORMAT).to_string(),
    ]
}

/// Format reservations as a human-readable table.
fn format_as_table<W: Write>(out: &mut W, reservations: &[Reservation]) -> Result<(), CliError> {
    // Print header (uppercase for table display)
    let header_line = COLUMN_HEADERS
        .iter()
        .map(|s| s.to_uppercase())
        .collect::<Vec<_>>()
        .join("\t");
    writeln!(out, "{header_line}")?;

    for res in reservations {
        writeln!(out, "{}", row(res).join("\t"))?;
    }

    if reservations.is_empty() {
        writeln!(out, "(no reservations)")?;
    }

    Ok(())
}

/// Format reservations as JSON.
fn format_as_json<W: Write>(out: &mut W, reservations: &[Reservation]) -> Result<(), CliError> {
    let json_data: Vec<serde_json::Value> = reservations
        .iter()
        .map(|r| {
            serde_json::json!({
                "email": r.member_email(),
                "name": r.member_name(),
                "role": r.member_role(),
                "lot": r.lot().number(),
                "space": r.space().as_str(),
                "date": r.date().format(DATE_FORMAT).to_string(),
                "start": r.start().format(TIME_FORMAT).to_string(),
                "end": r.end().format(TIME_FORMAT).to_string(),
            })
        })
        .collect();

    serde_json::to_writer_pretty(&mut *out, &json_data)
        .map_err(|e| CliError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;

    writeln!(out)?;

    Ok(())
}

/// Convert csv::Error to CliError.
fn csv_error(e: csv::Error) -> CliError {
    CliError::Io(std::io::Error::new(std::io::ErrorKind::Other, e))
}

/// Format reservations as delimited output (CSV or TSV).
fn format_as_delimited<W: Write>(
    out: &mut W,
    reservations: &[Reservation],
    delimiter: u8,
) -> Result<(), CliError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(out);

    writer.write_record(COLUMN_HEADERS).map_err(csv_error)?;

    for res in reservations {
        writer.write_record(row(res)).map_err(csv_error)?;
    }

    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use parking::{Lot, Member, Role, Slot};

    fn sample() -> Vec<Reservation> {
        let member = Member::new("ana@utp.edu.pe", "Torres, Ana", Role::Student);
        let slot = Slot {
            lot: Lot::try_from(2).unwrap(),
            space: "05E".parse().unwrap(),
            date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(9, 45, 0).unwrap(),
        };
        vec![Reservation::for_member(&member, slot).unwrap()]
    }

    fn render(format: OutputFormat, reservations: &[Reservation]) -> String {
        let mut out = Vec::new();
        write_reservations(&mut out, reservations, format).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_table_output() {
        let text = render(OutputFormat::Table, &sample());
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("EMAIL\tNAME\tROLE\tLOT\tSPACE\tDATE\tSTART\tEND")
        );
        assert_eq!(
            lines.next(),
            Some("ana@utp.edu.pe\tTorres, Ana\tstudent\t2\t05E\t2024-06-10\t08:00\t09:45")
        );
    }

    #[test]
    fn test_empty_table_says_so() {
        assert!(render(OutputFormat::Table, &[]).contains("(no reservations)"));
    }

    #[test]
    fn test_json_output() {
        let text = render(OutputFormat::Json, &sample());
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["space"], "05E");
        assert_eq!(value[0]["lot"], 2);
        assert_eq!(value[0]["role"], "student");
        assert_eq!(value[0]["end"], "09:45");
    }

    #[test]
    fn test_csv_output_quotes_commas() {
        let text = render(OutputFormat::Csv, &sample());
        assert!(text.starts_with("email,name,role,lot,space,date,start,end\n"));
        assert!(text.contains("\"Torres, Ana\""));
    }

    #[test]
    fn test_tsv_output() {
        let text = render(OutputFormat::Tsv, &sample());
        assert!(text.contains("05E\t2024-06-10\t08:00\t09:45"));
    }
}
