//! Common test utilities for integration tests.
//!
//! Fixtures for members, proposals and a clock pinned to a Monday, plus
//! helpers that open every store backend over a temporary directory.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tempfile::TempDir;

use parking::store::{CsvLogStore, DatabaseConfig, MemoryStore, SqliteStore};
use parking::{
    Inventory, Lot, Member, ReservationProposal, ReservationService, ReservationStore, Role,
    ServiceRules,
};

/// Monday 2024-06-10.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
}

/// Sunday 2024-06-09.
pub fn sunday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 9).unwrap()
}

pub fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

/// 07:00 on Monday, early enough for any in-hours proposal that day.
pub fn early_monday() -> NaiveDateTime {
    monday().and_time(time(7, 0))
}

pub fn student(n: usize) -> Member {
    Member::new(format!("alumno{n}@utp.edu.pe"), format!("Alumno {n}"), Role::Student)
}

pub fn lot(n: u8) -> Lot {
    Lot::try_from(n).unwrap()
}

pub fn proposal(
    member: &Member,
    lot_number: u8,
    space: &str,
    start: NaiveTime,
    end: NaiveTime,
) -> ReservationProposal {
    ReservationProposal::new(
        member.email(),
        lot(lot_number),
        space.parse().unwrap(),
        monday(),
        start,
        end,
    )
}

pub fn service_over(store: Arc<dyn ReservationStore>) -> ReservationService {
    ReservationService::new(ServiceRules::default(), Inventory::default(), store)
}

/// One store of each kind; the CSV and SQLite files live in `dir`.
pub fn all_stores(dir: &TempDir) -> Vec<(&'static str, Arc<dyn ReservationStore>)> {
    vec![
        ("memory", Arc::new(MemoryStore::new())),
        (
            "csv",
            Arc::new(CsvLogStore::open(dir.path().join("reservas.csv")).unwrap()),
        ),
        (
            "sqlite",
            Arc::new(SqliteStore::open(DatabaseConfig::new(dir.path().join("reservas.db"))).unwrap()),
        ),
    ]
}
