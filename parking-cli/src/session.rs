//! Navigation state of the interactive shell.
//!
//! The shell moves through a fixed set of screens. This module holds only
//! the transitions between them; reading input, talking to the service and
//! printing are done by [`crate::commands::shell`].

use parking::{Lot, Member, ReservationProposal, SpaceCode};

/// The screen the shell is currently on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for an email address.
    LoggedOut,
    /// Logged in, choosing what to do next.
    MainMenu {
        /// The logged-in member.
        member: Member,
    },
    /// Choosing a lot.
    SelectingLot {
        /// The logged-in member.
        member: Member,
    },
    /// Choosing a space within `lot`.
    SelectingSpace {
        /// The logged-in member.
        member: Member,
        /// The chosen lot.
        lot: Lot,
    },
    /// Entering the date and interval.
    ConfirmingTime {
        /// The logged-in member.
        member: Member,
        /// The chosen lot.
        lot: Lot,
        /// The chosen space.
        space: SpaceCode,
    },
    /// Reviewing the booking before it is submitted.
    ReviewingBooking {
        /// The logged-in member.
        member: Member,
        /// What will be submitted on confirmation.
        proposal: ReservationProposal,
    },
}

/// Something the user did on the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Logged in as `Member`.
    Login(Member),
    /// Started a new reservation.
    StartReservation,
    /// Opened the listing of every reservation.
    ViewAll,
    /// Logged out.
    Logout,
    /// Picked a lot.
    PickLot(Lot),
    /// Picked a space.
    PickSpace(SpaceCode),
    /// Entered an interval, to be reviewed before submitting.
    Propose(ReservationProposal),
    /// Confirmed and submitted the booking; `accepted` tells whether it
    /// was stored.
    Submitted {
        /// Whether the reservation was accepted.
        accepted: bool,
    },
    /// Went back one screen.
    Back,
}

impl SessionState {
    /// The logged-in member, if any.
    pub fn member(&self) -> Option<&Member> {
        match self {
            Self::LoggedOut => None,
            Self::MainMenu { member }
            | Self::SelectingLot { member }
            | Self::SelectingSpace { member, .. }
            | Self::ConfirmingTime { member, .. }
            | Self::ReviewingBooking { member, .. } => Some(member),
        }
    }

    /// The state after `action`, or `None` if `action` is not available on
    /// this screen.
    ///
    /// A rejected submission returns to the time screen so the member can
    /// try another interval. Listing everything is only offered to roles that
    /// may see all reservations.
    pub fn next(&self, action: Action) -> Option<SessionState> {
        match (self, action) {
            (Self::LoggedOut, Action::Login(member)) => Some(Self::MainMenu { member }),

            (Self::MainMenu { member }, Action::StartReservation) => Some(Self::SelectingLot {
                member: member.clone(),
            }),
            (Self::MainMenu { member }, Action::ViewAll) if member.role().can_view_all() => {
                Some(self.clone())
            }
            (Self::MainMenu { .. }, Action::Logout) => Some(Self::LoggedOut),

            (Self::SelectingLot { member }, Action::PickLot(lot)) => Some(Self::SelectingSpace {
                member: member.clone(),
                lot,
            }),
            (Self::SelectingLot { member }, Action::Back) => Some(Self::MainMenu {
                member: member.clone(),
            }),

            (Self::SelectingSpace { member, lot }, Action::PickSpace(space)) => {
                Some(Self::ConfirmingTime {
                    member: member.clone(),
                    lot: *lot,
                    space,
                })
            }
            (Self::SelectingSpace { member, .. }, Action::Back) => Some(Self::SelectingLot {
                member: member.clone(),
            }),

            (Self::ConfirmingTime { member, .. }, Action::Propose(proposal)) => {
                Some(Self::ReviewingBooking {
                    member: member.clone(),
                    proposal,
                })
            }
            (Self::ConfirmingTime { member, lot, .. }, Action::Back) => {
                Some(Self::SelectingSpace {
                    member: member.clone(),
                    lot: *lot,
                })
            }

            (Self::ReviewingBooking { member, .. }, Action::Submitted { accepted: true }) => {
                Some(Self::MainMenu {
                    member: member.clone(),
                })
            }
            (
                Self::ReviewingBooking { member, proposal },
                Action::Submitted { accepted: false } | Action::Back,
            ) => Some(Self::ConfirmingTime {
                member: member.clone(),
                lot: proposal.slot().lot,
                space: proposal.slot().space.clone(),
            }),

            _ => None,
        }
    }
}
