//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with a temporary data directory and roster
//! - Command builder helpers for common patterns

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A fixed Monday used as the clock in most tests.
#[allow(dead_code)]
pub const MONDAY_0850: &str = "2024-06-10 08:50";

/// Roster written into every test environment.
pub const ROSTER: &str = "correo,nombre,categoria\n\
ana@utp.edu.pe,Ana Torres,alumno\n\
luis@utp.edu.pe,Luis Rojas,docente\n\
rosa@utp.edu.pe,Rosa Diaz,admin\n";

/// Test environment with isolated data directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the parking data directory
    pub data_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment with the standard roster.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join("parking-data");
        std::fs::create_dir_all(&data_dir).expect("Failed to create data dir");
        std::fs::write(data_dir.join("usuarios.csv"), ROSTER).expect("Failed to write roster");

        Self { temp_dir, data_dir }
    }

    /// Get a bare command builder with no `PARKING_*` variables leaking in.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("parking").expect("Failed to find parking binary");
        for (key, _) in std::env::vars() {
            if key.starts_with("PARKING_") {
                cmd.env_remove(key);
            }
        }
        cmd
    }

    /// Get a command builder with the data directory pre-configured.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd
    }

    /// Path of a file in the data directory.
    pub fn file(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    /// Write `config.yaml` into the data directory.
    pub fn write_config(&self, yaml: &str) {
        std::fs::write(self.file("config.yaml"), yaml).expect("Failed to write config");
    }

    /// Contents of the reservation log, or an empty string if absent.
    pub fn reservations_csv(&self) -> String {
        read_or_empty(&self.file("reservas.csv"))
    }

    /// Reserve with the standard Monday clock, returning the command for
    /// further assertions.
    pub fn reserve(&self, email: &str, lot: &str, space: &str, start: &str, end: &str) -> Command {
        let mut cmd = self.command();
        cmd.args([
            "reserve", "--email", email, "--lot", lot, "--space", space, "--date", "2024-06-10",
            "--start", start, "--end", end, "--now", MONDAY_0850,
        ]);
        cmd
    }

    /// List every reservation as an admin and return stdout.
    pub fn list(&self, format: &str) -> String {
        let output = self
            .command()
            .args(["list", "--email", "rosa@utp.edu.pe", "--format", format])
            .output()
            .expect("Failed to run list command");

        assert!(
            output.status.success(),
            "List failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        String::from_utf8(output.stdout).expect("Invalid UTF-8 in output")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

fn read_or_empty(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_default()
}
