//! The singleton user profile.

use crate::errors::{AppResult, DatabaseError};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

/// The user's profile. At most one row exists in practice.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    /// Zero until the profile is first saved.
    pub id: i64,
    pub name: String,
    /// Weak reference to an avatar configuration row.
    pub avatar_config_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// A new, unsaved profile.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        UserProfile {
            id: 0,
            name: name.into(),
            avatar_config_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(UserProfile {
            id: row.get(0)?,
            name: row.get(1)?,
            avatar_config_id: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }
}

/// Returns the first profile row, if any.
pub fn get_user_profile(conn: &Connection) -> AppResult<Option<UserProfile>> {
    debug!("Loading user profile");

    conn.query_row(
        "SELECT id, name, avatar_config_id, created_at, updated_at
         FROM user_profile ORDER BY id LIMIT 1",
        [],
        UserProfile::from_row,
    )
    .optional()
    .map_err(|e| DatabaseError::Sqlite(e).into())
}

/// Inserts the profile when `id == 0`, otherwise updates it in place.
///
/// Returns the stored profile with its id and timestamps filled in.
///
/// # Errors
///
/// Returns an error if the insert or update fails.
pub fn save_user_profile(conn: &Connection, profile: &UserProfile) -> AppResult<UserProfile> {
    let mut saved = profile.clone();
    saved.updated_at = Utc::now();

    if saved.id == 0 {
        saved.created_at = saved.updated_at;
        conn.execute(
            "INSERT INTO user_profile (name, avatar_config_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                saved.name,
                saved.avatar_config_id,
                saved.created_at,
                saved.updated_at
            ],
        )
        .map_err(DatabaseError::Sqlite)?;
        saved.id = conn.last_insert_rowid();
        debug!("Created user profile {}", saved.id);
    } else {
        let updated = conn
            .execute(
                "UPDATE user_profile SET name = ?1, avatar_config_id = ?2, updated_at = ?3
                 WHERE id = ?4",
                params![saved.name, saved.avatar_config_id, saved.updated_at, saved.id],
            )
            .map_err(DatabaseError::Sqlite)?;
        debug!("Updated user profile {} ({} rows)", saved.id, updated);
    }

    Ok(saved)
}
