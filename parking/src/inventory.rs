//! Lot and space inventory.
//!
//! Each lot (basement level) is a fixed grid of spaces. Codes are derived
//! from the grid: the cell number (row-major, starting at 1) zero-padded to
//! two digits, followed by the column letter, e.g. `01A`, `02B`, `07A`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A lot number (1-based).
///
/// # Examples
///
/// ```
/// use parking::Lot;
///
/// let lot = Lot::try_from(2).unwrap();
/// assert_eq!(lot.number(), 2);
/// assert!(Lot::try_from(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Lot(u8);

impl Lot {
    /// Returns the lot number.
    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Lot {
    type Error = InvalidLotError;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        if value == 0 {
            Err(InvalidLotError {
                value,
                reason: "lots are numbered from 1".into(),
            })
        } else {
            Ok(Self(value))
        }
    }
}

impl From<Lot> for u8 {
    fn from(lot: Lot) -> Self {
        lot.0
    }
}

impl fmt::Display for Lot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for invalid lot numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidLotError {
    /// The invalid lot value.
    pub value: u8,
    /// The reason the lot is invalid.
    pub reason: String,
}

impl fmt::Display for InvalidLotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid lot {}: {}", self.value, self.reason)
    }
}

impl std::error::Error for InvalidLotError {}

/// A well-formed space code: two digits followed by an uppercase letter.
///
/// Parsing trims whitespace and uppercases the letter. Whether the code
/// exists in a given lot is decided by [`Inventory::is_valid_space`].
///
/// # Examples
///
/// ```
/// use parking::SpaceCode;
///
/// let code: SpaceCode = " 07a ".parse().unwrap();
/// assert_eq!(code.as_str(), "07A");
/// assert!("7A".parse::<SpaceCode>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SpaceCode(String);

impl SpaceCode {
    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The grid cell number encoded by the two leading digits.
    #[must_use]
    pub fn cell(&self) -> u8 {
        let bytes = self.0.as_bytes();
        (bytes[0] - b'0') * 10 + (bytes[1] - b'0')
    }

    /// The column letter.
    #[must_use]
    pub fn letter(&self) -> char {
        char::from(self.0.as_bytes()[2])
    }

    fn from_cell(cell: u8, column: u8) -> Self {
        Self(format!("{cell:02}{}", char::from(b'A' + column)))
    }
}

impl FromStr for SpaceCode {
    type Err = InvalidSpaceError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        let bytes = normalized.as_bytes();
        let well_formed = bytes.len() == 3
            && bytes[0].is_ascii_digit()
            && bytes[1].is_ascii_digit()
            && bytes[2].is_ascii_uppercase();

        if well_formed {
            Ok(Self(normalized))
        } else {
            Err(InvalidSpaceError {
                value: s.to_string(),
                reason: "expected two digits followed by a letter, e.g. 01A".into(),
            })
        }
    }
}

impl TryFrom<String> for SpaceCode {
    type Error = InvalidSpaceError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SpaceCode> for String {
    fn from(code: SpaceCode) -> Self {
        code.0
    }
}

impl fmt::Display for SpaceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error type for malformed space codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSpaceError {
    /// The rejected input.
    pub value: String,
    /// The reason the code is invalid.
    pub reason: String,
}

impl fmt::Display for InvalidSpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid space code '{}': {}", self.value, self.reason)
    }
}

impl std::error::Error for InvalidSpaceError {}

/// The static set of lots and their space grids.
///
/// Every lot shares the same `rows x columns` layout.
///
/// # Examples
///
/// ```
/// use parking::{Inventory, Lot};
///
/// let inventory = Inventory::default();
/// let lot = Lot::try_from(1).unwrap();
/// let spaces = inventory.spaces_for(lot);
/// assert_eq!(spaces.len(), 24);
/// assert_eq!(spaces[0].as_str(), "01A");
/// assert_eq!(spaces[6].as_str(), "07A");
/// assert!(inventory.is_valid_space(lot, "24F"));
/// assert!(!inventory.is_valid_space(lot, "24A"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inventory {
    lots: u8,
    rows: u8,
    columns: u8,
}

impl Inventory {
    /// Default number of lots.
    pub const DEFAULT_LOTS: u8 = 3;
    /// Default grid rows per lot.
    pub const DEFAULT_ROWS: u8 = 4;
    /// Default grid columns per lot.
    pub const DEFAULT_COLUMNS: u8 = 6;

    /// Creates an inventory of `lots` lots, each a `rows x columns` grid.
    ///
    /// # Errors
    ///
    /// Returns an error if any dimension is zero, if there are more than 26
    /// columns (one letter each), or if a lot holds more than 99 spaces
    /// (two-digit cell numbers).
    pub fn new(lots: u8, rows: u8, columns: u8) -> Result<Self> {
        if lots == 0 || rows == 0 || columns == 0 {
            return Err(Error::Validation {
                field: "inventory".into(),
                message: format!("dimensions must be non-zero (lots={lots}, rows={rows}, columns={columns})"),
            });
        }
        if columns > 26 {
            return Err(Error::Validation {
                field: "columns".into(),
                message: "at most 26 columns are supported".into(),
            });
        }
        if u16::from(rows) * u16::from(columns) > 99 {
            return Err(Error::Validation {
                field: "rows".into(),
                message: "a lot may hold at most 99 spaces".into(),
            });
        }
        Ok(Self {
            lots,
            rows,
            columns,
        })
    }

    /// Number of lots.
    #[must_use]
    pub const fn lot_count(&self) -> u8 {
        self.lots
    }

    /// Spaces per lot.
    #[must_use]
    pub const fn spaces_per_lot(&self) -> u8 {
        self.rows * self.columns
    }

    /// Grid rows per lot.
    #[must_use]
    pub const fn rows(&self) -> u8 {
        self.rows
    }

    /// Grid columns per lot.
    #[must_use]
    pub const fn columns(&self) -> u8 {
        self.columns
    }

    /// Iterates over every configured lot in order.
    pub fn lots(&self) -> impl Iterator<Item = Lot> {
        (1..=self.lots).map(Lot)
    }

    /// Returns `true` if the lot exists in this inventory.
    #[must_use]
    pub const fn contains_lot(&self, lot: Lot) -> bool {
        lot.0 <= self.lots
    }

    /// Validates a raw lot number against this inventory.
    ///
    /// # Errors
    ///
    /// Returns an error if the number is zero or beyond the last lot.
    pub fn lot(&self, number: u8) -> Result<Lot> {
        let lot = Lot::try_from(number)?;
        if self.contains_lot(lot) {
            Ok(lot)
        } else {
            Err(Error::InvalidLot {
                value: number,
                reason: format!("only lots 1..={} exist", self.lots),
            })
        }
    }

    /// The ordered space codes of a lot, row by row.
    ///
    /// Returns an empty list for a lot outside the inventory.
    #[must_use]
    pub fn spaces_for(&self, lot: Lot) -> Vec<SpaceCode> {
        if !self.contains_lot(lot) {
            return Vec::new();
        }
        (0..self.rows)
            .flat_map(|row| {
                (0..self.columns)
                    .map(move |column| SpaceCode::from_cell(row * self.columns + column + 1, column))
            })
            .collect()
    }

    /// Returns `true` if `code` names a space of `lot`.
    #[must_use]
    pub fn is_valid_space(&self, lot: Lot, code: &str) -> bool {
        code.parse::<SpaceCode>()
            .is_ok_and(|code| self.contains_space(lot, &code))
    }

    /// Typed variant of [`Inventory::is_valid_space`].
    #[must_use]
    pub fn contains_space(&self, lot: Lot, code: &SpaceCode) -> bool {
        if !self.contains_lot(lot) {
            return false;
        }
        let cell = code.cell();
        if cell == 0 || cell > self.spaces_per_lot() {
            return false;
        }
        let column = (cell - 1) % self.columns;
        code.letter() == char::from(b'A' + column)
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            lots: Self::DEFAULT_LOTS,
            rows: Self::DEFAULT_ROWS,
            columns: Self::DEFAULT_COLUMNS,
        }
    }
}
