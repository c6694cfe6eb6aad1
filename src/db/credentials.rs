//! Security credential storage.
//!
//! At most one credential row exists: [`replace_security_credential`] deletes
//! every row and inserts the new one. Callers run it on a transaction.

use crate::errors::{AppResult, DatabaseError, ValidationError};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// The kind of secret protecting the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    /// Exactly six characters.
    Pin,
    /// Six characters or more.
    Password,
}

impl CredentialKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialKind::Pin => "pin",
            CredentialKind::Password => "password",
        }
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CredentialKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pin" => Ok(CredentialKind::Pin),
            "password" => Ok(CredentialKind::Password),
            other => Err(ValidationError::InvalidCredentialType(other.to_string())),
        }
    }
}

/// A stored, hashed credential. The plaintext is never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct SecurityCredential {
    pub id: i64,
    pub credential_type: CredentialKind,
    /// Base64 SHA-256 digest.
    pub hashed_value: String,
    /// Base64 random salt.
    pub salt: String,
    pub is_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SecurityCredential {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let kind: String = row.get(1)?;
        let credential_type = kind.parse::<CredentialKind>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(SecurityCredential {
            id: row.get(0)?,
            credential_type,
            hashed_value: row.get(2)?,
            salt: row.get(3)?,
            is_enabled: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

/// Returns the first enabled credential, if any.
pub fn get_security_credential(conn: &Connection) -> AppResult<Option<SecurityCredential>> {
    debug!("Loading enabled security credential");

    conn.query_row(
        "SELECT id, credential_type, hashed_value, salt, is_enabled, created_at, updated_at
         FROM security_credential WHERE is_enabled = 1 ORDER BY id LIMIT 1",
        [],
        SecurityCredential::from_row,
    )
    .optional()
    .map_err(|e| DatabaseError::Sqlite(e).into())
}

/// Replaces every stored credential with a single new enabled one.
///
/// Run it on a transaction so the delete and insert commit together with
/// whatever settings change accompanies them.
///
/// # Errors
///
/// Returns an error if either statement fails.
pub fn replace_security_credential(
    conn: &Connection,
    credential_type: CredentialKind,
    hashed_value: &str,
    salt: &str,
) -> AppResult<SecurityCredential> {
    let removed = conn
        .execute("DELETE FROM security_credential", [])
        .map_err(DatabaseError::Sqlite)?;

    let now = Utc::now();
    conn.execute(
        "INSERT INTO security_credential
            (credential_type, hashed_value, salt, is_enabled, created_at, updated_at)
         VALUES (?1, ?2, ?3, 1, ?4, ?5)",
        params![credential_type.as_str(), hashed_value, salt, now, now],
    )
    .map_err(DatabaseError::Sqlite)?;
    let id = conn.last_insert_rowid();

    debug!(
        "Stored {} credential {} (replaced {} rows)",
        credential_type, id, removed
    );

    Ok(SecurityCredential {
        id,
        credential_type,
        hashed_value: hashed_value.to_string(),
        salt: salt.to_string(),
        is_enabled: true,
        created_at: now,
        updated_at: now,
    })
}

/// Deletes every credential. Returns whether any row was removed.
pub fn delete_security_credentials(conn: &Connection) -> AppResult<bool> {
    let removed = conn
        .execute("DELETE FROM security_credential", [])
        .map_err(DatabaseError::Sqlite)?;
    debug!("Deleted {} security credentials", removed);
    Ok(removed > 0)
}
