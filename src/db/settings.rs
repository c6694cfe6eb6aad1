//! Key/value application settings.
//!
//! Values are stored as text; typed accessors parse them at the call site.

use crate::errors::{AppResult, DatabaseError};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::fmt;
use tracing::{debug, info};

/// Every setting key the application reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    Theme,
    IsFirstLaunch,
    OnboardingCompleted,
    AvatarCompleted,
    SecurityCompleted,
    SecurityEnabled,
    FontSize,
    AccentColor,
}

impl SettingKey {
    /// Stored key string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::Theme => "Theme",
            SettingKey::IsFirstLaunch => "IsFirstLaunch",
            SettingKey::OnboardingCompleted => "OnboardingCompleted",
            SettingKey::AvatarCompleted => "AvatarCompleted",
            SettingKey::SecurityCompleted => "SecurityCompleted",
            SettingKey::SecurityEnabled => "SecurityEnabled",
            SettingKey::FontSize => "FontSize",
            SettingKey::AccentColor => "AccentColor",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings written on the very first initialization.
pub const DEFAULT_SETTINGS: [(SettingKey, &str); 8] = [
    (SettingKey::Theme, "light"),
    (SettingKey::IsFirstLaunch, "true"),
    (SettingKey::OnboardingCompleted, "false"),
    (SettingKey::AvatarCompleted, "false"),
    (SettingKey::SecurityCompleted, "false"),
    (SettingKey::SecurityEnabled, "false"),
    (SettingKey::FontSize, "medium"),
    (SettingKey::AccentColor, "#F490AF"),
];

/// Seeds [`DEFAULT_SETTINGS`] if the settings table is empty.
///
/// Returns `true` if seeding happened. Any existing row, even one the user
/// changed, means the defaults were already written once and are skipped.
///
/// # Errors
///
/// Returns an error if the count, any insert or the commit fails. Nothing is
/// written in that case.
pub fn seed_defaults(conn: &Connection) -> AppResult<bool> {
    let existing: i64 = conn
        .query_row("SELECT COUNT(*) FROM app_settings", [], |row| row.get(0))
        .map_err(DatabaseError::Sqlite)?;

    if existing > 0 {
        debug!("Settings already seeded ({} rows), skipping", existing);
        return Ok(false);
    }

    // All or nothing: a partial seed would be skipped on every later start.
    let tx = conn.unchecked_transaction().map_err(DatabaseError::Sqlite)?;
    let now = Utc::now();
    for (key, value) in DEFAULT_SETTINGS {
        tx.execute(
            "INSERT INTO app_settings (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key.as_str(), value, now],
        )
        .map_err(DatabaseError::Sqlite)?;
    }
    tx.commit().map_err(DatabaseError::Sqlite)?;

    info!("Seeded {} default settings", DEFAULT_SETTINGS.len());
    Ok(true)
}

/// Reads a setting value, `None` if the key was never written.
pub fn get_setting(conn: &Connection, key: SettingKey) -> AppResult<Option<String>> {
    debug!("Reading setting {}", key);

    conn.query_row(
        "SELECT value FROM app_settings WHERE key = ?1",
        params![key.as_str()],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| DatabaseError::Sqlite(e).into())
}

/// Inserts or overwrites a setting and stamps `updated_at`.
pub fn set_setting(conn: &Connection, key: SettingKey, value: &str) -> AppResult<()> {
    debug!("Writing setting {} = {}", key, value);

    conn.execute(
        r#"
        INSERT INTO app_settings (key, value, updated_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at
        "#,
        params![key.as_str(), value, Utc::now()],
    )
    .map_err(DatabaseError::Sqlite)?;

    Ok(())
}

/// Reads a boolean setting.
///
/// A missing or empty value yields `default`; anything else is true only if
/// it equals `"true"` ignoring case.
pub fn get_bool_setting(conn: &Connection, key: SettingKey, default: bool) -> AppResult<bool> {
    Ok(match get_setting(conn, key)? {
        Some(value) if !value.trim().is_empty() => value.trim().eq_ignore_ascii_case("true"),
        _ => default,
    })
}

pub fn set_bool_setting(conn: &Connection, key: SettingKey, value: bool) -> AppResult<()> {
    set_setting(conn, key, if value { "true" } else { "false" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::create_tables;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn
    }

    #[test]
    fn test_seed_defaults_once() {
        let conn = setup();

        assert!(seed_defaults(&conn).unwrap());
        assert_eq!(
            get_setting(&conn, SettingKey::AccentColor).unwrap().as_deref(),
            Some("#F490AF")
        );

        set_setting(&conn, SettingKey::Theme, "dark").unwrap();
        assert!(!seed_defaults(&conn).unwrap());
        assert_eq!(
            get_setting(&conn, SettingKey::Theme).unwrap().as_deref(),
            Some("dark")
        );
    }

    #[test]
    fn test_failed_seed_writes_nothing() {
        let conn = setup();
        conn.execute_batch(
            "CREATE TRIGGER reject_font_size BEFORE INSERT ON app_settings
             WHEN NEW.key = 'FontSize'
             BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
        .unwrap();

        assert!(seed_defaults(&conn).is_err());
        assert_eq!(get_setting(&conn, SettingKey::Theme).unwrap(), None);

        conn.execute_batch("DROP TRIGGER reject_font_size").unwrap();
        assert!(seed_defaults(&conn).unwrap());
        assert_eq!(
            get_setting(&conn, SettingKey::FontSize).unwrap().as_deref(),
            Some("medium")
        );
    }

    #[test]
    fn test_seed_skipped_when_any_row_exists() {
        let conn = setup();
        set_setting(&conn, SettingKey::FontSize, "large").unwrap();

        assert!(!seed_defaults(&conn).unwrap());
        assert_eq!(get_setting(&conn, SettingKey::Theme).unwrap(), None);
    }

    #[test]
    fn test_set_setting_upserts() {
        let conn = setup();

        set_setting(&conn, SettingKey::Theme, "light").unwrap();
        set_setting(&conn, SettingKey::Theme, "dark").unwrap();

        let rows: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM app_settings WHERE key = 'Theme'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(rows, 1);
        assert_eq!(
            get_setting(&conn, SettingKey::Theme).unwrap().as_deref(),
            Some("dark")
        );
    }

    #[test]
    fn test_bool_setting_parsing() {
        let conn = setup();

        assert!(get_bool_setting(&conn, SettingKey::SecurityEnabled, true).unwrap());
        assert!(!get_bool_setting(&conn, SettingKey::SecurityEnabled, false).unwrap());

        set_setting(&conn, SettingKey::SecurityEnabled, "").unwrap();
        assert!(get_bool_setting(&conn, SettingKey::SecurityEnabled, true).unwrap());

        set_setting(&conn, SettingKey::SecurityEnabled, "TRUE").unwrap();
        assert!(get_bool_setting(&conn, SettingKey::SecurityEnabled, false).unwrap());

        set_setting(&conn, SettingKey::SecurityEnabled, "yes").unwrap();
        assert!(!get_bool_setting(&conn, SettingKey::SecurityEnabled, true).unwrap());

        set_bool_setting(&conn, SettingKey::SecurityEnabled, true).unwrap();
        assert_eq!(
            get_setting(&conn, SettingKey::SecurityEnabled)
                .unwrap()
                .as_deref(),
            Some("true")
        );
    }
}
