//! Database schema definitions and initialization.
//!
//! This module defines the SQLite schema for settings, the user profile,
//! avatar configurations, the security credential, journal entries and tags.
//! All tables are created with their unique indexes and foreign key constraints.

use crate::errors::{AppResult, DatabaseError};
use rusqlite::Connection;
use tracing::{debug, info};

/// Current schema version.
///
/// Increment this whenever schema changes are made to support future migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// Creates all database tables and indexes.
///
/// This function is idempotent - it uses `CREATE TABLE IF NOT EXISTS`
/// so it's safe to call multiple times.
///
/// # Tables
///
/// - `app_settings`: Key/value application settings
/// - `user_profile`: The singleton user profile
/// - `avatar_configuration`: Avatar feature selections
/// - `security_credential`: Hashed PIN or password
/// - `journal_entries`: One row per calendar date
/// - `tags`: Tag names with usage counters
/// - `entry_tags`: Entry/tag join rows
///
/// # Errors
///
/// Returns an error if any DDL statement fails.
pub fn create_tables(conn: &Connection) -> AppResult<()> {
    debug!("Creating database tables");

    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(DatabaseError::Sqlite)?;

    // Settings table: type-erased values, parsed by callers
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS app_settings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            key TEXT NOT NULL UNIQUE,
            value TEXT NOT NULL,
            updated_at DATETIME NOT NULL
        );
        "#,
    )
    .map_err(DatabaseError::Sqlite)?;

    // Profile table: avatar_config_id is a weak reference, no FK
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS user_profile (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            avatar_config_id INTEGER,
            created_at DATETIME NOT NULL,
            updated_at DATETIME NOT NULL
        );
        "#,
    )
    .map_err(DatabaseError::Sqlite)?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS avatar_configuration (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            gender TEXT NOT NULL,
            base_index INTEGER NOT NULL DEFAULT 1,
            eyes_index INTEGER NOT NULL DEFAULT 1,
            nose_index INTEGER NOT NULL DEFAULT 1,
            mouth_index INTEGER NOT NULL DEFAULT 1,
            hair_style TEXT,
            hair_color TEXT,
            clothes_style TEXT,
            clothes_color TEXT,
            facial_hair_style TEXT,
            glasses_style TEXT,
            headwear_style TEXT,
            headwear_color TEXT,
            neckwear_style TEXT,
            neckwear_color TEXT,
            extras_style TEXT,
            extras_color TEXT,
            created_at DATETIME NOT NULL,
            updated_at DATETIME NOT NULL
        );
        "#,
    )
    .map_err(DatabaseError::Sqlite)?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS security_credential (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            credential_type TEXT NOT NULL CHECK(credential_type IN ('pin', 'password')),
            hashed_value TEXT NOT NULL,
            salt TEXT NOT NULL,
            is_enabled INTEGER NOT NULL DEFAULT 1,
            created_at DATETIME NOT NULL,
            updated_at DATETIME NOT NULL
        );
        "#,
    )
    .map_err(DatabaseError::Sqlite)?;

    // Journal entries: entry_date is the one-per-day authority
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS journal_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT,
            content TEXT NOT NULL,
            entry_date TEXT NOT NULL UNIQUE,
            primary_mood TEXT NOT NULL,
            secondary_moods TEXT NOT NULL DEFAULT '',
            word_count INTEGER NOT NULL DEFAULT 0,
            character_count INTEGER NOT NULL DEFAULT 0,
            created_at DATETIME NOT NULL,
            updated_at DATETIME NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_journal_entries_primary_mood ON journal_entries(primary_mood);
        "#,
    )
    .map_err(DatabaseError::Sqlite)?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS tags (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            usage_count INTEGER NOT NULL DEFAULT 0 CHECK(usage_count >= 0),
            created_at DATETIME NOT NULL,
            last_used_at DATETIME NOT NULL
        );
        "#,
    )
    .map_err(DatabaseError::Sqlite)?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS entry_tags (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            entry_id INTEGER NOT NULL,
            tag_id INTEGER NOT NULL,
            created_at DATETIME NOT NULL,
            FOREIGN KEY (entry_id) REFERENCES journal_entries(id) ON DELETE CASCADE,
            FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE,
            UNIQUE(entry_id, tag_id)
        );

        CREATE INDEX IF NOT EXISTS idx_entry_tags_entry_id ON entry_tags(entry_id);
        CREATE INDEX IF NOT EXISTS idx_entry_tags_tag_id ON entry_tags(tag_id);
        "#,
    )
    .map_err(DatabaseError::Sqlite)?;

    // Schema version tracking table
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER NOT NULL,
            applied_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        );
        "#,
    )
    .map_err(DatabaseError::Sqlite)?;

    let current_version = get_schema_version(conn)?;
    if current_version.is_none() {
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?)",
            [SCHEMA_VERSION],
        )
        .map_err(DatabaseError::Sqlite)?;
        info!("Initialized database schema version {}", SCHEMA_VERSION);
    } else {
        debug!("Schema version already recorded: {:?}", current_version);
    }

    debug!("Database tables created successfully");
    Ok(())
}

/// Gets the current schema version from the database.
///
/// Returns `None` if the schema_version table doesn't exist or is empty.
///
/// # Errors
///
/// Returns an error if the query fails for reasons other than missing table.
pub fn get_schema_version(conn: &Connection) -> AppResult<Option<i32>> {
    let result = conn.query_row(
        "SELECT version FROM schema_version ORDER BY applied_at DESC LIMIT 1",
        [],
        |row| row.get(0),
    );

    match result {
        Ok(version) => Ok(Some(version)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) if e.to_string().contains("no such table") => Ok(None),
        Err(e) => Err(DatabaseError::Sqlite(e).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn table_exists(conn: &Connection, name: &str) -> bool {
        let count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?",
                [name],
                |row| row.get(0),
            )
            .unwrap();
        count == 1
    }

    #[test]
    fn test_create_tables() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();

        for table in [
            "app_settings",
            "user_profile",
            "avatar_configuration",
            "security_credential",
            "journal_entries",
            "tags",
            "entry_tags",
            "schema_version",
        ] {
            assert!(table_exists(&conn, table), "missing table {}", table);
        }
    }

    #[test]
    fn test_entry_date_unique() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();

        let insert = "INSERT INTO journal_entries (content, entry_date, primary_mood, created_at, updated_at) \
                      VALUES ('x', '2024-01-15', 'happy', '2024-01-15', '2024-01-15')";
        conn.execute(insert, []).unwrap();
        assert!(conn.execute(insert, []).is_err());
    }

    #[test]
    fn test_entry_tags_cascade_on_entry_delete() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();

        conn.execute(
            "INSERT INTO journal_entries (content, entry_date, primary_mood, created_at, updated_at) \
             VALUES ('x', '2024-01-15', 'happy', 'now', 'now')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO tags (name, created_at, last_used_at) VALUES ('work', 'now', 'now')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO entry_tags (entry_id, tag_id, created_at) VALUES (1, 1, 'now')",
            [],
        )
        .unwrap();

        // Join row for a missing entry is rejected
        let result = conn.execute(
            "INSERT INTO entry_tags (entry_id, tag_id, created_at) VALUES (999, 1, 'now')",
            [],
        );
        assert!(result.is_err());

        conn.execute("DELETE FROM journal_entries WHERE id = 1", [])
            .unwrap();
        let remaining: i32 = conn
            .query_row("SELECT COUNT(*) FROM entry_tags", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[test]
    fn test_usage_count_never_negative() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO tags (name, usage_count, created_at, last_used_at) VALUES ('x', -1, 'now', 'now')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_credential_type_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO security_credential (credential_type, hashed_value, salt, created_at, updated_at) \
             VALUES ('fingerprint', 'h', 's', 'now', 'now')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_create_tables_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        create_tables(&conn).unwrap();
        create_tables(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), Some(SCHEMA_VERSION));
        let rows: i32 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_schema_version_missing_table() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), None);
    }
}
