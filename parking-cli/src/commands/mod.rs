//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `login`: Check a member's credentials
//! - `spaces`: Show the space grid of a lot
//! - `reserve`: Book a space for an interval
//! - `list`: List every reservation (admins and faculty)
//! - `shell`: Interactive booking session
//! - `completions`: Generate shell completion scripts

pub mod completions;
pub mod list;
pub mod login;
pub mod reserve;
pub mod shell;
pub mod spaces;

pub use completions::CompletionsCommand;
pub use list::ListCommand;
pub use login::LoginCommand;
pub use reserve::ReserveCommand;
pub use shell::ShellCommand;
pub use spaces::SpacesCommand;
