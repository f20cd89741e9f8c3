//! Build script for parking-cli.
//!
//! This script generates man pages at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
fn build_cli() -> Command {
    let email = || {
        Arg::new("email")
            .long("email")
            .value_name("EMAIL")
            .help("Institutional email address")
    };
    let now = || {
        Arg::new("now")
            .long("now")
            .value_name("DATETIME")
            .help("Evaluate the rules as of this moment ('YYYY-MM-DD HH:MM')")
            .env("PARKING_NOW")
    };

    Command::new("parking")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Book parking spaces without double-booking")
        .long_about(
            "Command-line tool for booking time-bounded parking spaces in the institution's lots",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Override the data directory location")
                .value_name("PATH")
                .global(true)
                .env("PARKING_DATA_DIR"),
        )
        .subcommands(vec![
            Command::new("login")
                .about("Check a member's credentials")
                .arg(email().required(true)),
            Command::new("spaces")
                .about("Show the spaces of a lot")
                .arg(Arg::new("lot").long("lot").value_name("LOT").required(true))
                .arg(Arg::new("date").long("date").value_name("DATE")),
            Command::new("reserve")
                .about("Reserve a parking space")
                .long_about("Book one space for an interval on a given day")
                .arg(email().required(true))
                .arg(Arg::new("lot").long("lot").value_name("LOT").required(true))
                .arg(Arg::new("space").long("space").value_name("CODE").required(true))
                .arg(Arg::new("date").long("date").value_name("DATE"))
                .arg(Arg::new("start").long("start").value_name("HH:MM"))
                .arg(Arg::new("end").long("end").value_name("HH:MM"))
                .arg(now()),
            Command::new("list")
                .about("List every reservation (admins and faculty only)")
                .arg(email().required(true))
                .arg(Arg::new("format").long("format").value_name("FORMAT"))
                .arg(Arg::new("date").long("date").value_name("DATE"))
                .arg(Arg::new("lot").long("lot").value_name("LOT"))
                .arg(Arg::new("member").long("member").value_name("EMAIL")),
            Command::new("shell")
                .about("Start an interactive booking session")
                .arg(email())
                .arg(now()),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(Arg::new("shell").required(true)),
        ])
}

fn main() -> io::Result<()> {
    let out_dir = PathBuf::from(std::env::var_os("OUT_DIR").ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "OUT_DIR not set")
    })?);
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir)?;

    let mut buffer = Vec::new();
    Man::new(build_cli()).render(&mut buffer)?;
    fs::write(man_dir.join("parking.1"), buffer)?;

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
    Ok(())
}
