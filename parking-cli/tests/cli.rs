//! Tests for the command-line surface: help, version, global options and
//! completions.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let env = TestEnv::new();
    env.command_bare()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("login")
                .and(predicate::str::contains("spaces"))
                .and(predicate::str::contains("reserve"))
                .and(predicate::str::contains("list"))
                .and(predicate::str::contains("shell")),
        );
}

#[test]
fn test_version() {
    let env = TestEnv::new();
    env.command_bare()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("parking "));
}

#[test]
fn test_missing_subcommand_fails() {
    let env = TestEnv::new();
    env.command_bare().assert().failure();
}

#[test]
fn test_data_dir_from_environment() {
    let env = TestEnv::new();
    env.command_bare()
        .env("PARKING_DATA_DIR", &env.data_dir)
        .args(["login", "--email", "ana@utp.edu.pe"])
        .assert()
        .success();
}

#[test]
fn test_verbose_flag_reaches_logger() {
    let env = TestEnv::new();
    env.command()
        .args(["--verbose", "login", "--email", "ana@utp.edu.pe"])
        .assert()
        .success()
        .stderr(predicate::str::contains("DEBUG: data directory:"));
    env.command()
        .args(["login", "--email", "ana@utp.edu.pe"])
        .assert()
        .success()
        .stderr(predicate::str::contains("DEBUG").not());
}

#[test]
fn test_environment_overrides_config_file() {
    let env = TestEnv::new();
    env.write_config("minimum_notice_minutes: 120\n");
    env.reserve("ana@utp.edu.pe", "1", "01A", "09:20", "10:00")
        .assert()
        .code(1);
    env.reserve("ana@utp.edu.pe", "1", "01A", "09:20", "10:00")
        .env("PARKING_MINIMUM_NOTICE_MINUTES", "30")
        .assert()
        .success();
}

#[test]
fn test_invalid_config_exit_7() {
    let env = TestEnv::new();
    env.write_config("lots: 0\n");
    env.command()
        .args(["login", "--email", "ana@utp.edu.pe"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("Configuration error"));

    env.write_config("no_such_key: 1\n");
    env.command()
        .args(["login", "--email", "ana@utp.edu.pe"])
        .assert()
        .code(7);
}

#[test]
fn test_spaces_grid() {
    let env = TestEnv::new();
    env.command()
        .args(["spaces", "--lot", "1"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Lot 1\n")
                .and(predicate::str::contains("01A  02B  03C  04D  05E  06F\n"))
                .and(predicate::str::contains("19A  20B  21C  22D  23E  24F\n")),
        );
    env.command()
        .args(["spaces", "--lot", "9"])
        .assert()
        .code(4);
}

#[test]
fn test_spaces_marks_reserved() {
    let env = TestEnv::new();
    env.reserve("ana@utp.edu.pe", "1", "03C", "10:00", "11:00")
        .assert()
        .success();
    env.command()
        .args(["spaces", "--lot", "1", "--date", "2024-06-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("03C*"));
}

#[test]
fn test_completions_bash() {
    let env = TestEnv::new();
    env.command_bare()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("parking"));
}
