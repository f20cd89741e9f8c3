//! The entry point collaborators call to book and list reservations.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::inventory::{Inventory, Lot, SpaceCode};
use crate::member::Member;
use crate::reservation::{Reservation, ReservationProposal};
use crate::store::{self, InsertOutcome, ReservationStore};
use crate::validator::{Rejection, ReservationValidator, ServiceRules};

/// Result of [`ReservationService::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The reservation was persisted.
    Accepted(Reservation),
    /// The proposal broke a rule or hit an existing reservation.
    Rejected(Rejection),
}

impl SubmitOutcome {
    /// The accepted reservation, if any.
    #[must_use]
    pub const fn accepted(&self) -> Option<&Reservation> {
        match self {
            Self::Accepted(reservation) => Some(reservation),
            Self::Rejected(_) => None,
        }
    }

    /// The rejection reason, if any.
    #[must_use]
    pub const fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Accepted(_) => None,
            Self::Rejected(reason) => Some(*reason),
        }
    }
}

/// Validates proposals and records accepted ones in a store.
///
/// The service holds no per-caller state; any number of threads may call
/// [`submit`](Self::submit) on one instance.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use chrono::{NaiveDate, NaiveTime};
/// use parking::{Inventory, Lot, Member, ReservationProposal, ReservationService, Role,
///     ServiceRules, SubmitOutcome};
/// use parking::store::MemoryStore;
///
/// let service = ReservationService::new(
///     ServiceRules::default(),
///     Inventory::default(),
///     Arc::new(MemoryStore::new()),
/// );
/// let member = Member::new("ana@utp.edu.pe", "Ana", Role::Student);
/// let monday = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
/// let proposal = ReservationProposal::new(
///     "ana@utp.edu.pe",
///     Lot::try_from(1).unwrap(),
///     "01A".parse().unwrap(),
///     monday,
///     NaiveTime::from_hms_opt(9, 20, 0).unwrap(),
///     NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
/// );
/// let now = monday.and_hms_opt(8, 50, 0).unwrap();
///
/// let outcome = service.submit(&proposal, &member, now).unwrap();
/// assert!(matches!(outcome, SubmitOutcome::Accepted(_)));
/// assert_eq!(service.list_all().unwrap().len(), 1);
/// ```
#[derive(Clone)]
pub struct ReservationService {
    validator: ReservationValidator,
    store: Arc<dyn ReservationStore>,
}

impl ReservationService {
    /// Creates a service over `store`.
    #[must_use]
    pub fn new(rules: ServiceRules, inventory: Inventory, store: Arc<dyn ReservationStore>) -> Self {
        Self {
            validator: ReservationValidator::new(rules, inventory),
            store,
        }
    }

    /// Creates a service from configuration, opening the configured store.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is inconsistent or the store
    /// cannot be opened.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            config.service_rules()?,
            config.inventory()?,
            store::open(config)?,
        ))
    }

    /// The inventory proposals are checked against.
    #[must_use]
    pub const fn inventory(&self) -> &Inventory {
        self.validator.inventory()
    }

    /// The time rules in force.
    #[must_use]
    pub const fn rules(&self) -> &ServiceRules {
        self.validator.rules()
    }

    /// The ordered space codes of `lot`.
    #[must_use]
    pub fn spaces_for(&self, lot: Lot) -> Vec<SpaceCode> {
        self.inventory().spaces_for(lot)
    }

    /// Validates `proposal` for `member` at `now` and, if admissible,
    /// inserts it.
    ///
    /// Rule violations return without touching the store. A conflict found
    /// by the store becomes [`Rejection::SpaceTaken`]. Nothing is retried.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MemberMismatch`] if the proposal names a different
    /// member, or a storage error if the reservation could not be persisted.
    pub fn submit(
        &self,
        proposal: &ReservationProposal,
        member: &Member,
        now: NaiveDateTime,
    ) -> Result<SubmitOutcome> {
        if !member.has_email(&proposal.member_email) {
            return Err(Error::MemberMismatch {
                proposal_email: proposal.member_email.clone(),
                member_email: member.email().to_string(),
            });
        }

        let reservation = match self.validator.validate(proposal, member, now) {
            Ok(reservation) => reservation,
            Err(reason) => {
                log::info!("rejected {} for {}: {}", proposal.slot(), member.email(), reason.code());
                return Ok(SubmitOutcome::Rejected(reason));
            }
        };

        match self.store.try_insert(reservation)? {
            InsertOutcome::Accepted(reservation) => {
                log::info!("accepted {} for {}", reservation.slot(), reservation.member_email());
                Ok(SubmitOutcome::Accepted(reservation))
            }
            InsertOutcome::Conflict(existing) => {
                log::info!(
                    "rejected {} for {}: overlaps {}",
                    proposal.slot(),
                    member.email(),
                    existing.slot()
                );
                Ok(SubmitOutcome::Rejected(Rejection::SpaceTaken))
            }
        }
    }

    /// Every persisted reservation, unfiltered.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list_all(&self) -> Result<Vec<Reservation>> {
        self.store.load_all()
    }

    /// Default date and interval to offer a member booking at `now`.
    #[must_use]
    pub fn suggest_window(&self, now: NaiveDateTime) -> (NaiveDate, NaiveTime, NaiveTime) {
        self.rules().suggest_window(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::Role;
    use crate::reservation::Slot;
    use crate::store::{MemoryStore, MockReservationStore};
    use std::path::PathBuf;

    fn member() -> Member {
        Member::new("ana@utp.edu.pe", "Ana Torres", Role::Student)
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn proposal(space: &str, start: NaiveTime, end: NaiveTime) -> ReservationProposal {
        ReservationProposal::new(
            "ana@utp.edu.pe",
            Lot::try_from(1).unwrap(),
            space.parse().unwrap(),
            monday(),
            start,
            end,
        )
    }

    fn service_with(store: impl ReservationStore + 'static) -> ReservationService {
        ReservationService::new(ServiceRules::default(), Inventory::default(), Arc::new(store))
    }

    fn early() -> NaiveDateTime {
        monday().and_time(time(7, 0))
    }

    #[test]
    fn test_touching_reservations_both_accepted() {
        let service = service_with(MemoryStore::new());
        let first = service
            .submit(&proposal("01A", time(9, 0), time(10, 0)), &member(), early())
            .unwrap();
        let second = service
            .submit(&proposal("01A", time(10, 0), time(11, 0)), &member(), early())
            .unwrap();
        assert!(first.accepted().is_some());
        assert!(second.accepted().is_some());
    }

    #[test]
    fn test_overlap_is_space_taken() {
        let service = service_with(MemoryStore::new());
        service
            .submit(&proposal("01A", time(9, 0), time(10, 0)), &member(), early())
            .unwrap();
        let outcome = service
            .submit(&proposal("01A", time(9, 30), time(10, 30)), &member(), early())
            .unwrap();
        assert_eq!(outcome.rejection(), Some(Rejection::SpaceTaken));
        assert_eq!(service.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_rule_violation_never_reaches_store() {
        let mut store = MockReservationStore::new();
        store.expect_try_insert().never();
        let service = service_with(store);

        let outcome = service
            .submit(&proposal("01A", time(7, 0), time(9, 0)), &member(), early())
            .unwrap();
        assert_eq!(outcome, SubmitOutcome::Rejected(Rejection::OutsideServiceWindow));
    }

    #[test]
    fn test_storage_failure_propagates() {
        let mut store = MockReservationStore::new();
        store.expect_try_insert().times(1).returning(|_| {
            Err(Error::StorageWrite {
                path: PathBuf::from("reservas.csv"),
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            })
        });
        let service = service_with(store);

        let result = service.submit(&proposal("01A", time(9, 0), time(10, 0)), &member(), early());
        assert!(matches!(result, Err(Error::StorageWrite { .. })));
    }

    #[test]
    fn test_store_conflict_maps_to_space_taken() {
        let mut store = MockReservationStore::new();
        store
            .expect_try_insert()
            .times(1)
            .returning(|r| Ok(InsertOutcome::Conflict(r)));
        let service = service_with(store);

        let outcome = service
            .submit(&proposal("02B", time(9, 0), time(10, 0)), &member(), early())
            .unwrap();
        assert_eq!(outcome.rejection(), Some(Rejection::SpaceTaken));
    }

    #[test]
    fn test_member_mismatch_is_an_error() {
        let service = service_with(MemoryStore::new());
        let other = Member::new("luis@utp.edu.pe", "Luis", Role::Faculty);
        let result = service.submit(&proposal("01A", time(9, 0), time(10, 0)), &other, early());
        assert!(matches!(result, Err(Error::MemberMismatch { .. })));
    }

    #[test]
    fn test_member_email_match_ignores_case() {
        let service = service_with(MemoryStore::new());
        let mut p = proposal("01A", time(9, 0), time(10, 0));
        p.member_email = "ANA@utp.edu.pe".into();
        assert!(service.submit(&p, &member(), early()).unwrap().accepted().is_some());
    }

    #[test]
    fn test_accepted_reservation_copies_member() {
        let service = service_with(MemoryStore::new());
        let outcome = service
            .submit(&proposal("03C", time(12, 0), time(13, 0)), &member(), early())
            .unwrap();
        let reservation = outcome.accepted().unwrap();
        assert_eq!(reservation.member_name(), "Ana Torres");
        assert_eq!(
            reservation.slot(),
            &Slot {
                lot: Lot::try_from(1).unwrap(),
                space: "03C".parse().unwrap(),
                date: monday(),
                start: time(12, 0),
                end: time(13, 0),
            }
        );
    }

    #[test]
    fn test_list_all_passes_through() {
        let mut store = MockReservationStore::new();
        store.expect_load_all().times(1).returning(|| Ok(Vec::new()));
        assert!(service_with(store).list_all().unwrap().is_empty());
    }

    #[test]
    fn test_from_config_and_spaces() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            lots: 2,
            rows: 2,
            columns: 3,
            ..Config::default()
        }
        .with_data_dir(dir.path());
        let service = ReservationService::from_config(&config).unwrap();
        assert_eq!(service.inventory().lot_count(), 2);
        assert_eq!(service.spaces_for(Lot::try_from(1).unwrap()).len(), 6);
        assert!(service.spaces_for(Lot::try_from(3).unwrap()).is_empty());
    }

    #[test]
    fn test_suggest_window_delegates_to_rules() {
        let service = service_with(MemoryStore::new());
        let (date, start, end) = service.suggest_window(monday().and_time(time(10, 0)));
        assert_eq!(date, monday());
        assert_eq!((start, end), (time(10, 30), time(11, 30)));
    }
}
