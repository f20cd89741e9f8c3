#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # parking
//!
//! A library for booking time-bounded parking spaces without double-booking.
//!
//! Members pick a space in a lot for an interval on a given day. The
//! [`ReservationService`] checks the booking against the service rules and
//! then asks a [`store::ReservationStore`] to insert it, which refuses any
//! interval overlapping an existing reservation for the same space.
//!
//! ## Core Types
//!
//! - [`Inventory`], [`Lot`] and [`SpaceCode`]: the static grid of spaces
//! - [`Member`], [`Role`] and [`Roster`]: who may book
//! - [`ReservationProposal`], [`Reservation`] and [`Slot`]: what is booked
//! - [`ReservationValidator`], [`ServiceRules`] and [`Rejection`]: the rules
//! - [`ReservationService`] and [`SubmitOutcome`]: the entry point
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use parking::{Inventory, Lot};
//!
//! let inventory = Inventory::default();
//! let lot = Lot::try_from(1).unwrap();
//! assert_eq!(inventory.spaces_for(lot).len(), 24);
//! assert!(inventory.is_valid_space(lot, "07A"));
//! ```

pub mod config;
pub mod error;
pub mod inventory;
pub mod logging;
pub mod member;
pub mod reservation;
pub mod service;
pub mod store;
pub mod validator;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use inventory::{Inventory, Lot, SpaceCode};
pub use logging::{init_logger, LogLevel, Logger};
pub use member::{Member, Role, Roster};
pub use reservation::{Reservation, ReservationProposal, Slot};
pub use service::{ReservationService, SubmitOutcome};
pub use store::{InsertOutcome, ReservationStore};
pub use validator::{Rejection, ReservationValidator, ServiceRules};
