//! Durable, append-only reservation storage.
//!
//! Every backend implements [`ReservationStore`]. The one operation callers
//! must use for writes is [`ReservationStore::try_insert`], which checks for
//! an overlapping reservation and appends in a single critical section.
//! There is no update or delete.
//!
//! # Examples
//!
//! ```
//! use parking::store::{MemoryStore, ReservationStore};
//!
//! let store = MemoryStore::new();
//! assert!(store.load_all().unwrap().is_empty());
//! ```

mod csv_log;
mod memory;
pub mod sqlite;

pub use csv_log::{CsvLogStore, RESERVATIONS_HEADER};
pub use memory::MemoryStore;
pub use sqlite::{DatabaseConfig, SqliteStore};

use std::sync::Arc;

use crate::config::{Config, StorageKind};
use crate::error::Result;
use crate::reservation::{Reservation, Slot};

/// Result of [`ReservationStore::try_insert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The reservation was appended and is durable.
    Accepted(Reservation),
    /// An existing reservation overlaps; nothing was written.
    Conflict(Reservation),
}

impl InsertOutcome {
    /// Returns `true` for [`InsertOutcome::Accepted`].
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// A durable collection of reservations with overlap-safe insertion.
///
/// Implementations must make the conflict check and the append of
/// [`try_insert`](Self::try_insert) indivisible with respect to other
/// inserts, and must not return `Accepted` before the record is durable.
#[cfg_attr(test, mockall::automock)]
pub trait ReservationStore: Send + Sync {
    /// Reads every persisted reservation in insertion order.
    ///
    /// Records that fail to parse are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error only if the storage itself cannot be read.
    fn load_all(&self) -> Result<Vec<Reservation>>;

    /// Returns `true` if a persisted reservation conflicts with `slot`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    fn has_conflict(&self, slot: &Slot) -> Result<bool>;

    /// Atomically re-checks for conflicts and appends `reservation`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::StorageWrite`] (or another storage error) if
    /// the append failed; the reservation was not persisted.
    fn try_insert(&self, reservation: Reservation) -> Result<InsertOutcome>;
}

/// First reservation in `existing` that conflicts with `slot`.
pub(crate) fn find_conflict<'a>(
    existing: impl IntoIterator<Item = &'a Reservation>,
    slot: &Slot,
) -> Option<&'a Reservation> {
    existing.into_iter().find(|r| r.slot().conflicts_with(slot))
}

/// Opens the backend selected by `config`.
///
/// # Errors
///
/// Returns an error if the backing file or database cannot be created.
pub fn open(config: &Config) -> Result<Arc<dyn ReservationStore>> {
    let path = config.reservations_path();
    log::debug!("opening {} store at {}", config.storage, path.display());
    let store: Arc<dyn ReservationStore> = match config.storage {
        StorageKind::Csv => Arc::new(CsvLogStore::open(&path)?),
        StorageKind::Sqlite => Arc::new(SqliteStore::open(DatabaseConfig::new(&path))?),
    };
    Ok(store)
}
