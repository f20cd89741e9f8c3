//! SQL statements for the `SQLite` backend.
//!
//! Times are stored as zero-padded `HH:MM` text, so lexicographic
//! comparison orders them correctly.

/// Current schema version stored in the metadata table.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Key-value metadata, holding the schema version.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// The append-only reservation table.
pub const CREATE_RESERVATIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS reservations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        member_email TEXT NOT NULL,
        member_name TEXT NOT NULL,
        member_role TEXT NOT NULL,
        lot INTEGER NOT NULL,
        space TEXT NOT NULL,
        date TEXT NOT NULL,
        start_time TEXT NOT NULL,
        end_time TEXT NOT NULL,
        CHECK (start_time < end_time)
    )";

/// Index for the conflict lookup.
pub const CREATE_SLOT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_reservations_slot ON reservations(lot, space, date)";

/// Reads the schema version.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// Writes the schema version.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";

/// Appends a reservation.
pub const INSERT_RESERVATION: &str = r"
    INSERT INTO reservations
    (member_email, member_name, member_role, lot, space, date, start_time, end_time)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
";

/// Every reservation in insertion order.
pub const SELECT_ALL_RESERVATIONS: &str = r"
    SELECT member_email, member_name, member_role, lot, space, date, start_time, end_time
    FROM reservations
    ORDER BY id
";

/// The first reservation overlapping `[?4, ?5)` on the same space and date.
pub const SELECT_CONFLICT: &str = r"
    SELECT member_email, member_name, member_role, lot, space, date, start_time, end_time
    FROM reservations
    WHERE lot = ?1 AND space = ?2 AND date = ?3 AND start_time < ?5 AND ?4 < end_time
    ORDER BY id
    LIMIT 1
";
