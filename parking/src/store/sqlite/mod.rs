//! `SQLite` reservation store for deployments with several processes.
//!
//! The conflict check and the insert run inside one `IMMEDIATE`
//! transaction, so writers in other processes are serialized by the
//! database lock. Within a process a mutex serializes use of the single
//! connection.
//!
//! # Examples
//!
//! ```
//! use parking::store::{DatabaseConfig, ReservationStore, SqliteStore};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let store = SqliteStore::open(DatabaseConfig::new(dir.path().join("reservas.db"))).unwrap();
//! assert!(store.load_all().unwrap().is_empty());
//! ```

mod config;
pub mod migrations;
mod schema;

pub use config::DatabaseConfig;
pub use schema::CURRENT_SCHEMA_VERSION;

use std::sync::{Mutex, PoisonError};

use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row, TransactionBehavior};

use crate::error::{Error, Result};
use crate::inventory::{Lot, SpaceCode};
use crate::member::Role;
use crate::reservation::{parse_date, parse_time, Reservation, Slot, DATE_FORMAT, TIME_FORMAT};

use super::{InsertOutcome, ReservationStore};
use schema::{INSERT_RESERVATION, SELECT_ALL_RESERVATIONS, SELECT_CONFLICT};

/// Reservations stored in a `SQLite` database.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
    config: DatabaseConfig,
}

impl SqliteStore {
    /// Opens the database, enabling WAL mode and the busy timeout and
    /// initializing the schema if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, if the parent
    /// directory cannot be created, or if the schema version is unsupported.
    pub fn open(config: DatabaseConfig) -> Result<Self> {
        if config.auto_create && !config.path.exists() {
            if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
        }

        let flags = if config.auto_create {
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX
        };

        let conn = Connection::open_with_flags(&config.path, flags)?;
        // Before any pragma: switching to WAL takes a lock other processes may hold.
        conn.busy_timeout(config.busy_timeout)?;
        let _: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        conn.execute_batch("PRAGMA synchronous = FULL")?;
        migrations::check_schema_compatibility(&conn)?;

        log::debug!("opened reservation database {}", config.path.display());
        Ok(Self {
            conn: Mutex::new(conn),
            config,
        })
    }

    /// The configuration the store was opened with.
    #[must_use]
    pub const fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    fn find_conflict(conn: &Connection, slot: &Slot) -> Result<Option<Reservation>> {
        let row = conn
            .query_row(
                SELECT_CONFLICT,
                params![
                    slot.lot.number(),
                    slot.space.as_str(),
                    slot.date.format(DATE_FORMAT).to_string(),
                    slot.start.format(TIME_FORMAT).to_string(),
                    slot.end.format(TIME_FORMAT).to_string(),
                ],
                read_row,
            )
            .optional()?;
        match row {
            Some(fields) => Ok(Some(fields.into_reservation()?)),
            None => Ok(None),
        }
    }
}

impl ReservationStore for SqliteStore {
    fn load_all(&self) -> Result<Vec<Reservation>> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let mut stmt = conn.prepare(SELECT_ALL_RESERVATIONS)?;
        let rows = stmt.query_map([], read_row)?;

        let mut reservations = Vec::new();
        for (index, row) in rows.enumerate() {
            match row?.into_reservation() {
                Ok(reservation) => reservations.push(reservation),
                Err(e) => log::warn!("skipping database row {}: {e}", index + 1),
            }
        }
        Ok(reservations)
    }

    fn has_conflict(&self, slot: &Slot) -> Result<bool> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(Self::find_conflict(&conn, slot)?.is_some())
    }

    fn try_insert(&self, reservation: Reservation) -> Result<InsertOutcome> {
        let mut conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if let Some(conflict) = Self::find_conflict(&tx, reservation.slot())? {
            log::debug!("{} conflicts with {}", reservation.slot(), conflict.slot());
            return Ok(InsertOutcome::Conflict(conflict));
        }

        let slot = reservation.slot();
        tx.execute(
            INSERT_RESERVATION,
            params![
                reservation.member_email(),
                reservation.member_name(),
                reservation.member_role().roster_label(),
                slot.lot.number(),
                slot.space.as_str(),
                slot.date.format(DATE_FORMAT).to_string(),
                slot.start.format(TIME_FORMAT).to_string(),
                slot.end.format(TIME_FORMAT).to_string(),
            ],
        )?;
        tx.commit()?;

        log::debug!("inserted {} into {}", slot, self.config.path.display());
        Ok(InsertOutcome::Accepted(reservation))
    }
}

/// A row as stored, before domain validation.
struct RowFields {
    email: String,
    name: String,
    role: String,
    lot: i64,
    space: String,
    date: String,
    start: String,
    end: String,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<RowFields> {
    Ok(RowFields {
        email: row.get(0)?,
        name: row.get(1)?,
        role: row.get(2)?,
        lot: row.get(3)?,
        space: row.get(4)?,
        date: row.get(5)?,
        start: row.get(6)?,
        end: row.get(7)?,
    })
}

impl RowFields {
    fn into_reservation(self) -> Result<Reservation> {
        let role: Role = self.role.parse().map_err(|message| Error::Validation {
            field: "member_role".into(),
            message,
        })?;
        let lot = u8::try_from(self.lot)
            .map_err(|e| Error::Validation {
                field: "lot".into(),
                message: e.to_string(),
            })
            .and_then(|n| Ok(Lot::try_from(n)?))?;
        let space: SpaceCode = self.space.parse()?;
        let slot = Slot {
            lot,
            space,
            date: parse_date(&self.date)?,
            start: parse_time("start", &self.start)?,
            end: parse_time("end", &self.end)?,
        };
        Reservation::new(self.email, self.name, role, slot)
    }
}
