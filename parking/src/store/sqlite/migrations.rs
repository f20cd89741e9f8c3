//! Schema initialization and version checks.

use rusqlite::Connection;

use crate::error::{Error, Result};

use super::schema::{
    CREATE_METADATA_TABLE, CREATE_RESERVATIONS_TABLE, CREATE_SLOT_INDEX, CURRENT_SCHEMA_VERSION,
    INSERT_SCHEMA_VERSION, SELECT_SCHEMA_VERSION,
};

/// Creates every table and index and records the schema version.
///
/// # Errors
///
/// Returns an error if any statement fails.
///
/// # Examples
///
/// ```
/// use rusqlite::Connection;
/// use parking::store::sqlite::migrations::{get_schema_version, initialize_schema};
///
/// let conn = Connection::open_in_memory().unwrap();
/// initialize_schema(&conn).unwrap();
/// assert_eq!(get_schema_version(&conn).unwrap(), 1);
/// ```
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_METADATA_TABLE, [])?;
    conn.execute(CREATE_RESERVATIONS_TABLE, [])?;
    conn.execute(CREATE_SLOT_INDEX, [])?;
    conn.execute(INSERT_SCHEMA_VERSION, [CURRENT_SCHEMA_VERSION])?;
    Ok(())
}

/// Reads the stored schema version, or 0 for an uninitialized database.
///
/// # Errors
///
/// Returns an error if the metadata query fails for any reason other than
/// a missing table or row.
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    let has_metadata: bool = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'metadata')",
        [],
        |row| row.get(0),
    )?;
    if !has_metadata {
        return Ok(0);
    }

    match conn.query_row(SELECT_SCHEMA_VERSION, [], |row| {
        let value: String = row.get(0)?;
        value
            .parse::<i32>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e)))
    }) {
        Ok(version) => Ok(version),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(e.into()),
    }
}

/// Initializes a fresh database or verifies an existing one.
///
/// # Errors
///
/// Returns [`Error::UnsupportedSchemaVersion`] if the database was written
/// by a different schema version.
pub fn check_schema_compatibility(conn: &Connection) -> Result<()> {
    match get_schema_version(conn)? {
        0 => initialize_schema(conn),
        CURRENT_SCHEMA_VERSION => Ok(()),
        found => Err(Error::UnsupportedSchemaVersion {
            expected: CURRENT_SCHEMA_VERSION,
            found,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_connection() -> Connection {
        Connection::open_in_memory().unwrap()
    }

    #[test]
    fn test_initialize_schema() {
        let conn = create_test_connection();
        initialize_schema(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);

        let count: i32 = conn
            .query_row("SELECT COUNT(*) FROM reservations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_get_schema_version_uninitialized() {
        let conn = create_test_connection();
        assert_eq!(get_schema_version(&conn).unwrap(), 0);
    }

    #[test]
    fn test_check_schema_compatibility_fresh_then_current() {
        let conn = create_test_connection();
        check_schema_compatibility(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
        check_schema_compatibility(&conn).unwrap();
    }

    #[test]
    fn test_check_schema_compatibility_other_version() {
        let conn = create_test_connection();
        initialize_schema(&conn).unwrap();
        conn.execute(
            "UPDATE metadata SET value = '999' WHERE key = 'schema_version'",
            [],
        )
        .unwrap();

        let err = check_schema_compatibility(&conn).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedSchemaVersion { expected: 1, found: 999 }
        ));
    }

    #[test]
    fn test_schema_rejects_inverted_interval() {
        let conn = create_test_connection();
        initialize_schema(&conn).unwrap();
        let result = conn.execute(
            super::super::schema::INSERT_RESERVATION,
            rusqlite::params!["a@utp.edu.pe", "A", "alumno", 1, "01A", "2024-06-10", "10:00", "09:00"],
        );
        assert!(result.is_err());
    }
}
