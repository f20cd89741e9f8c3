//! Members and the read-only roster used to resolve them.
//!
//! The roster is loaded once at startup from a `correo,nombre,categoria`
//! CSV file and never changes afterwards. It is passed explicitly to
//! whoever needs it; there is no process-wide member table.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The category a member belongs to.
///
/// Parses both the English names and the labels used by the roster file
/// (`alumno`, `admin`, `docente`), case-insensitively.
///
/// # Examples
///
/// ```
/// use parking::Role;
///
/// assert_eq!("Docente".parse::<Role>().unwrap(), Role::Faculty);
/// assert_eq!("student".parse::<Role>().unwrap(), Role::Student);
/// assert!(Role::Admin.can_view_all());
/// assert!(!Role::Student.can_view_all());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A student.
    Student,
    /// An administrator.
    Admin,
    /// A faculty member.
    Faculty,
}

impl Role {
    /// Whether this role may see every reservation (the admin view).
    #[must_use]
    pub const fn can_view_all(self) -> bool {
        matches!(self, Self::Admin | Self::Faculty)
    }

    /// The label written to the reservation log's `categoria` column.
    #[must_use]
    pub const fn roster_label(self) -> &'static str {
        match self {
            Self::Student => "alumno",
            Self::Admin => "admin",
            Self::Faculty => "docente",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "student" | "alumno" => Ok(Self::Student),
            "admin" => Ok(Self::Admin),
            "faculty" | "docente" => Ok(Self::Faculty),
            other => Err(format!("unknown member category: {other}")),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Student => write!(f, "student"),
            Self::Admin => write!(f, "admin"),
            Self::Faculty => write!(f, "faculty"),
        }
    }
}

/// A person allowed to book spaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    email: String,
    display_name: String,
    role: Role,
}

impl Member {
    /// Creates a member. The email is trimmed; its case is preserved for
    /// display but ignored for lookups.
    #[must_use]
    pub fn new(email: impl Into<String>, display_name: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into().trim().to_string(),
            display_name: display_name.into().trim().to_string(),
            role,
        }
    }

    /// The member's email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// The member's display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// The member's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Case-insensitive email comparison.
    #[must_use]
    pub fn has_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }
}

/// Read-only email → member lookup.
///
/// # Examples
///
/// ```
/// use parking::{Member, Role, Roster};
///
/// let roster = Roster::from_members([
///     Member::new("Ana@utp.edu.pe", "Ana", Role::Student),
/// ]);
/// assert_eq!(roster.resolve(" ana@UTP.edu.pe ").unwrap().display_name(), "Ana");
/// assert!(roster.resolve("nobody@utp.edu.pe").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Roster {
    members: HashMap<String, Member>,
}

impl Roster {
    /// Builds a roster from members. Later duplicates replace earlier ones.
    pub fn from_members(members: impl IntoIterator<Item = Member>) -> Self {
        let members = members
            .into_iter()
            .map(|member| (member.email.to_lowercase(), member))
            .collect();
        Self { members }
    }

    /// Loads the roster from a `correo,nombre,categoria` CSV file.
    ///
    /// The first line is a header. Blank lines, rows with fewer than three
    /// fields, and rows with an unknown category are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRoster`] if the file is missing or unreadable.
    pub fn load(path: &Path) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidRoster {
            path: path.to_path_buf(),
            reason,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| invalid(e.to_string()))?;

        let mut members = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(|e| invalid(e.to_string()))?;
            if record.len() < 3 {
                if record.iter().any(|field| !field.is_empty()) {
                    log::warn!("roster row {} has fewer than 3 fields, skipping", index + 2);
                }
                continue;
            }
            match record[2].parse::<Role>() {
                Ok(role) => members.push(Member::new(&record[0], &record[1], role)),
                Err(e) => log::warn!("roster row {}: {e}, skipping", index + 2),
            }
        }

        log::debug!("loaded {} members from {}", members.len(), path.display());
        Ok(Self::from_members(members))
    }

    /// Loads the roster, falling back to an empty roster on failure.
    ///
    /// The failure is logged once; with an empty roster nobody can log in.
    #[must_use]
    pub fn load_or_empty(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("{e}; continuing with an empty roster");
            Self::default()
        })
    }

    /// Looks up a member by email (trimmed, case-insensitive).
    #[must_use]
    pub fn resolve(&self, email: &str) -> Option<&Member> {
        self.members.get(&email.trim().to_lowercase())
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if no member can log in.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
