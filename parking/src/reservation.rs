//! Reservation types.
//!
//! A [`ReservationProposal`] is what a caller asks for; a [`Reservation`] is
//! what the service accepted and persisted. Both occupy a [`Slot`]: a space
//! on a date over the half-open interval `[start, end)`.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::inventory::{Lot, SpaceCode};
use crate::member::{Member, Role};

#[cfg(test)]
mod proptests;

/// Date format used on the wire and in the reservation log (`yyyy-MM-dd`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time-of-day format used on the wire and in the reservation log (`HH:mm`).
pub const TIME_FORMAT: &str = "%H:%M";

/// Parses a `yyyy-MM-dd` date.
///
/// # Errors
///
/// Returns [`Error::InvalidTime`] if the string is not a valid date.
///
/// # Examples
///
/// ```
/// use parking::reservation::parse_date;
///
/// assert!(parse_date("2024-06-10").is_ok());
/// assert!(parse_date("10/06/2024").is_err());
/// ```
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| Error::InvalidTime {
        field: "date",
        value: value.to_string(),
        expected: "YYYY-MM-DD",
    })
}

/// Parses an `HH:mm` time of day.
///
/// # Errors
///
/// Returns [`Error::InvalidTime`] naming `field` if the string is not a
/// valid 24-hour time.
pub fn parse_time(field: &'static str, value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT).map_err(|_| Error::InvalidTime {
        field,
        value: value.to_string(),
        expected: "HH:MM",
    })
}

/// A space on a date over `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Slot {
    /// Lot holding the space.
    pub lot: Lot,
    /// Space code within the lot.
    pub space: SpaceCode,
    /// Calendar date.
    pub date: NaiveDate,
    /// Inclusive start time.
    pub start: NaiveTime,
    /// Exclusive end time.
    pub end: NaiveTime,
}

impl Slot {
    /// Returns `true` if both slots name the same space on the same date.
    #[must_use]
    pub fn same_space(&self, other: &Self) -> bool {
        self.lot == other.lot && self.space == other.space && self.date == other.date
    }

    /// Returns `true` if the slots compete for the same space at the same
    /// time.
    ///
    /// Intervals are half-open, so a slot ending exactly when another
    /// begins does not conflict with it. The relation is symmetric.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{NaiveDate, NaiveTime};
    /// use parking::{Lot, Slot};
    ///
    /// let slot = |start: u32, end: u32| Slot {
    ///     lot: Lot::try_from(1).unwrap(),
    ///     space: "01A".parse().unwrap(),
    ///     date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
    ///     start: NaiveTime::from_hms_opt(start, 0, 0).unwrap(),
    ///     end: NaiveTime::from_hms_opt(end, 0, 0).unwrap(),
    /// };
    ///
    /// assert!(!slot(9, 10).conflicts_with(&slot(10, 11)));
    /// assert!(slot(9, 11).conflicts_with(&slot(10, 12)));
    /// ```
    #[must_use]
    pub fn conflicts_with(&self, other: &Self) -> bool {
        self.same_space(other) && self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lot {} space {} on {} {}-{}",
            self.lot,
            self.space,
            self.date.format(DATE_FORMAT),
            self.start.format(TIME_FORMAT),
            self.end.format(TIME_FORMAT)
        )
    }
}

/// A booking request, built by the caller and never persisted as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationProposal {
    /// Email of the member asking for the space.
    pub member_email: String,
    /// The requested slot.
    pub slot: Slot,
}

impl ReservationProposal {
    /// Creates a proposal.
    #[must_use]
    pub fn new(
        member_email: impl Into<String>,
        lot: Lot,
        space: SpaceCode,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Self {
        Self {
            member_email: member_email.into(),
            slot: Slot {
                lot,
                space,
                date,
                start,
                end,
            },
        }
    }

    /// The requested slot.
    #[must_use]
    pub const fn slot(&self) -> &Slot {
        &self.slot
    }

    /// The moment the requested slot begins.
    #[must_use]
    pub fn starts_at(&self) -> NaiveDateTime {
        self.slot.date.and_time(self.slot.start)
    }
}

/// An accepted, immutable reservation.
///
/// The full field tuple is the identity; there is no surrogate id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Reservation {
    member_email: String,
    member_name: String,
    member_role: Role,
    #[serde(flatten)]
    slot: Slot,
}

impl Reservation {
    /// Creates a reservation from its stored fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is empty, a name or email spans more
    /// than one line, or `start` is not before `end`.
    pub fn new(
        member_email: impl Into<String>,
        member_name: impl Into<String>,
        member_role: Role,
        slot: Slot,
    ) -> Result<Self> {
        let member_email = member_email.into().trim().to_string();
        if member_email.is_empty() {
            return Err(Error::Validation {
                field: "member_email".into(),
                message: "must be non-empty".into(),
            });
        }
        let member_name = member_name.into().trim().to_string();
        for (field, value) in [("member_email", &member_email), ("member_name", &member_name)] {
            if value.contains(['\n', '\r']) {
                return Err(Error::Validation {
                    field: field.into(),
                    message: "must not contain line breaks".into(),
                });
            }
        }
        if slot.start >= slot.end {
            return Err(Error::Validation {
                field: "end".into(),
                message: format!(
                    "{} is not after {}",
                    slot.end.format(TIME_FORMAT),
                    slot.start.format(TIME_FORMAT)
                ),
            });
        }
        Ok(Self {
            member_email,
            member_name,
            member_role,
            slot,
        })
    }

    /// Creates a reservation for `member`, copying its name and role.
    ///
    /// # Errors
    ///
    /// Returns an error if `start` is not before `end`.
    pub fn for_member(member: &Member, slot: Slot) -> Result<Self> {
        Self::new(member.email(), member.display_name(), member.role(), slot)
    }

    /// Email of the member who holds the reservation.
    #[must_use]
    pub fn member_email(&self) -> &str {
        &self.member_email
    }

    /// Display name copied from the member at booking time.
    #[must_use]
    pub fn member_name(&self) -> &str {
        &self.member_name
    }

    /// Role copied from the member at booking time.
    #[must_use]
    pub const fn member_role(&self) -> Role {
        self.member_role
    }

    /// The reserved slot.
    #[must_use]
    pub const fn slot(&self) -> &Slot {
        &self.slot
    }

    /// Lot of the reserved space.
    #[must_use]
    pub const fn lot(&self) -> Lot {
        self.slot.lot
    }

    /// Code of the reserved space.
    #[must_use]
    pub const fn space(&self) -> &SpaceCode {
        &self.slot.space
    }

    /// Reservation date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.slot.date
    }

    /// Inclusive start time.
    #[must_use]
    pub const fn start(&self) -> NaiveTime {
        self.slot.start
    }

    /// Exclusive end time.
    #[must_use]
    pub const fn end(&self) -> NaiveTime {
        self.slot.end
    }
}
