//! In-memory reservation store.

use std::sync::{PoisonError, RwLock};

use crate::error::Result;
use crate::reservation::{Reservation, Slot};

use super::{find_conflict, InsertOutcome, ReservationStore};

/// A non-durable store with the same insert semantics as the file-backed
/// ones. Useful for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    reservations: RwLock<Vec<Reservation>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `reservations`, unchecked.
    #[must_use]
    pub fn with_reservations(reservations: Vec<Reservation>) -> Self {
        Self {
            reservations: RwLock::new(reservations),
        }
    }
}

impl ReservationStore for MemoryStore {
    fn load_all(&self) -> Result<Vec<Reservation>> {
        Ok(self
            .reservations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn has_conflict(&self, slot: &Slot) -> Result<bool> {
        let reservations = self.reservations.read().unwrap_or_else(PoisonError::into_inner);
        Ok(find_conflict(reservations.iter(), slot).is_some())
    }

    fn try_insert(&self, reservation: Reservation) -> Result<InsertOutcome> {
        let mut reservations = self.reservations.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(conflict) = find_conflict(reservations.iter(), reservation.slot()) {
            return Ok(InsertOutcome::Conflict(conflict.clone()));
        }
        reservations.push(reservation.clone());
        Ok(InsertOutcome::Accepted(reservation))
    }
}
