//! Business rules for reservation proposals.
//!
//! The validator is pure: it never reads the clock or touches storage. The
//! caller injects `now`, and the store does the conflict check afterwards.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::Serialize;
use thiserror::Error;

use crate::inventory::Inventory;
use crate::member::Member;
use crate::reservation::{Reservation, ReservationProposal};

/// Why a proposal was refused.
///
/// These are terminal outcomes: resubmitting the same proposal gives the
/// same answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rejection {
    /// The lot or space code does not exist in the inventory.
    #[error("no such space in this lot")]
    UnknownSpace,
    /// Reservations are not taken on Sundays.
    #[error("reservations are not allowed on Sundays")]
    SundayNotAllowed,
    /// The interval leaves the daily service window.
    #[error("reservations must fall within the service hours")]
    OutsideServiceWindow,
    /// The end time is not after the start time.
    #[error("end time must be after start time")]
    EndNotAfterStart,
    /// The start is before the reference time.
    #[error("cannot reserve a time in the past")]
    StartInPast,
    /// The start is too close to the reference time.
    #[error("reservations need more advance notice")]
    InsufficientAdvanceNotice,
    /// Another reservation already holds an overlapping interval.
    #[error("the space is already reserved for that time")]
    SpaceTaken,
}

impl Rejection {
    /// Stable machine-readable code.
    ///
    /// # Examples
    ///
    /// ```
    /// use parking::Rejection;
    ///
    /// assert_eq!(Rejection::SpaceTaken.code(), "SPACE_TAKEN");
    /// ```
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::UnknownSpace => "UNKNOWN_SPACE",
            Self::SundayNotAllowed => "SUNDAY_NOT_ALLOWED",
            Self::OutsideServiceWindow => "OUTSIDE_SERVICE_WINDOW",
            Self::EndNotAfterStart => "END_NOT_AFTER_START",
            Self::StartInPast => "START_IN_PAST",
            Self::InsufficientAdvanceNotice => "INSUFFICIENT_ADVANCE_NOTICE",
            Self::SpaceTaken => "SPACE_TAKEN",
        }
    }
}

/// Time rules applied to every proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceRules {
    /// Earliest allowed start.
    pub opening: NaiveTime,
    /// Latest allowed end.
    pub closing: NaiveTime,
    /// Minimum gap between `now` and the start.
    pub minimum_notice: Duration,
    /// Day of the week with no service.
    pub closed_on: Weekday,
}

impl ServiceRules {
    /// Default opening time, 08:00.
    pub const DEFAULT_OPENING: (u32, u32) = (8, 0);
    /// Default closing time, 23:00.
    pub const DEFAULT_CLOSING: (u32, u32) = (23, 0);
    /// Default advance notice in minutes.
    pub const DEFAULT_NOTICE_MINUTES: i64 = 30;

    /// Default booking length offered by [`ServiceRules::suggest_window`].
    const SUGGESTED_LENGTH_MINUTES: i64 = 60;
    /// Shortest booking [`ServiceRules::suggest_window`] leaves before closing.
    const LATEST_START_MARGIN_MINUTES: i64 = 30;

    /// Proposes a default window for a booking made at `now`.
    ///
    /// The start is `now` plus the advance notice, truncated to the minute
    /// and clamped to the service hours so that at least half an hour
    /// remains. The end is one hour later, capped at closing.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{NaiveDate, NaiveTime};
    /// use parking::ServiceRules;
    ///
    /// let now = NaiveDate::from_ymd_opt(2024, 6, 10)
    ///     .unwrap()
    ///     .and_hms_opt(9, 12, 45)
    ///     .unwrap();
    /// let (date, start, end) = ServiceRules::default().suggest_window(now);
    /// assert_eq!(date, now.date());
    /// assert_eq!(start, NaiveTime::from_hms_opt(9, 42, 0).unwrap());
    /// assert_eq!(end, NaiveTime::from_hms_opt(10, 42, 0).unwrap());
    /// ```
    #[must_use]
    pub fn suggest_window(&self, now: NaiveDateTime) -> (NaiveDate, NaiveTime, NaiveTime) {
        let candidate = now + self.minimum_notice;
        let date = candidate.date();
        let time = candidate.time();
        let time = time.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(time);

        let (latest, wrapped) = self
            .closing
            .overflowing_sub_signed(Duration::minutes(Self::LATEST_START_MARGIN_MINUTES));
        let latest = if wrapped != 0 || latest < self.opening {
            self.opening
        } else {
            latest
        };
        let start = time.clamp(self.opening, latest);

        let (end, wrapped) =
            start.overflowing_add_signed(Duration::minutes(Self::SUGGESTED_LENGTH_MINUTES));
        let end = if wrapped != 0 || end > self.closing {
            self.closing
        } else {
            end
        };

        (date, start, end)
    }
}

impl Default for ServiceRules {
    fn default() -> Self {
        let (open_h, open_m) = Self::DEFAULT_OPENING;
        let (close_h, close_m) = Self::DEFAULT_CLOSING;
        Self {
            opening: NaiveTime::from_hms_opt(open_h, open_m, 0).unwrap_or(NaiveTime::MIN),
            closing: NaiveTime::from_hms_opt(close_h, close_m, 0).unwrap_or(NaiveTime::MIN),
            minimum_notice: Duration::minutes(Self::DEFAULT_NOTICE_MINUTES),
            closed_on: Weekday::Sun,
        }
    }
}

/// Applies [`ServiceRules`] and the inventory to proposals.
#[derive(Debug, Clone)]
pub struct ReservationValidator {
    rules: ServiceRules,
    inventory: Inventory,
}

impl ReservationValidator {
    /// Creates a validator.
    #[must_use]
    pub const fn new(rules: ServiceRules, inventory: Inventory) -> Self {
        Self { rules, inventory }
    }

    /// The rules in force.
    #[must_use]
    pub const fn rules(&self) -> &ServiceRules {
        &self.rules
    }

    /// The inventory proposals are checked against.
    #[must_use]
    pub const fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Checks a proposal at reference time `now`.
    ///
    /// Rules are applied in order and the first failure wins: unknown
    /// space, closed weekday, service window, end after start, start in the
    /// past, advance notice. On success the returned reservation carries the
    /// member's name and role.
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] of the first rule the proposal breaks.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{NaiveDate, NaiveTime};
    /// use parking::{Inventory, Lot, Member, Rejection, ReservationProposal,
    ///     ReservationValidator, Role, ServiceRules};
    ///
    /// let validator = ReservationValidator::new(ServiceRules::default(), Inventory::default());
    /// let member = Member::new("ana@utp.edu.pe", "Ana", Role::Student);
    /// let sunday = NaiveDate::from_ymd_opt(2024, 6, 9).unwrap();
    /// let proposal = ReservationProposal::new(
    ///     "ana@utp.edu.pe",
    ///     Lot::try_from(1).unwrap(),
    ///     "01A".parse().unwrap(),
    ///     sunday,
    ///     NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
    ///     NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
    /// );
    /// let now = sunday.and_hms_opt(10, 0, 0).unwrap();
    /// assert_eq!(validator.validate(&proposal, &member, now), Err(Rejection::SundayNotAllowed));
    /// ```
    pub fn validate(
        &self,
        proposal: &ReservationProposal,
        member: &Member,
        now: NaiveDateTime,
    ) -> Result<Reservation, Rejection> {
        let slot = proposal.slot();

        if !self.inventory.contains_space(slot.lot, &slot.space) {
            return Err(Rejection::UnknownSpace);
        }
        if slot.date.weekday() == self.rules.closed_on {
            return Err(Rejection::SundayNotAllowed);
        }
        if slot.start < self.rules.opening || slot.end > self.rules.closing {
            return Err(Rejection::OutsideServiceWindow);
        }
        if slot.end <= slot.start {
            return Err(Rejection::EndNotAfterStart);
        }

        let starts_at = proposal.starts_at();
        if starts_at < now {
            return Err(Rejection::StartInPast);
        }
        if starts_at - now < self.rules.minimum_notice {
            return Err(Rejection::InsufficientAdvanceNotice);
        }

        Reservation::for_member(member, slot.clone()).map_err(|_| Rejection::EndNotAfterStart)
    }
}
