//! PIN/password gate in front of the journal.
//!
//! The gate fails closed: verification returns `false` whenever no usable
//! credential is stored, including when the stored row is corrupt.

use crate::constants::{MIN_PASSWORD_LENGTH, PIN_LENGTH};
use crate::crypto::{hash_credential, verify_credential};
use crate::db::credentials::{self, CredentialKind};
use crate::db::settings::{self, SettingKey};
use crate::db::Database;
use crate::errors::{AppResult, ValidationError};
use rusqlite::Connection;
use tracing::{debug, error, info, warn};

fn check_credential(kind: CredentialKind, credential: &str) -> Result<(), ValidationError> {
    if credential.trim().is_empty() {
        return Err(ValidationError::InvalidCredential(
            "credential cannot be blank".to_string(),
        ));
    }
    let len = credential.chars().count();
    match kind {
        CredentialKind::Pin if len != PIN_LENGTH => Err(ValidationError::InvalidCredential(
            format!("PIN must be exactly {} characters", PIN_LENGTH),
        )),
        CredentialKind::Password if len < MIN_PASSWORD_LENGTH => {
            Err(ValidationError::InvalidCredential(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )))
        }
        _ => Ok(()),
    }
}

/// Stores a new credential, replacing any previous one, and enables the gate.
///
/// `kind` is `"pin"` (exactly 6 characters) or `"password"` (at least 6).
///
/// # Errors
///
/// Returns [`ValidationError::InvalidCredentialType`] or
/// [`ValidationError::InvalidCredential`] for rejected input, or a crypto or
/// database error.
///
/// # Examples
///
/// ```no_run
/// use moodjournal::db::Database;
/// use moodjournal::ops::security;
/// use std::path::Path;
///
/// let db = Database::open(Path::new("/tmp/moodjournal.db3"))?;
/// assert!(security::setup(&db, "pin", "12345").is_err());
/// security::setup(&db, "pin", "123456")?;
/// assert!(security::is_security_enabled(&db)?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn setup(db: &Database, kind: &str, credential: &str) -> AppResult<()> {
    let kind = kind.parse::<CredentialKind>().map_err(|e| {
        warn!("Security setup rejected: {}", e);
        e
    })?;
    check_credential(kind, credential).map_err(|e| {
        warn!("Security setup rejected: {}", e);
        e
    })?;

    let hashed = hash_credential(credential)?;

    let mut conn = db.get_conn()?;
    store_credential(&mut conn, kind, &hashed.hash, &hashed.salt).map_err(|e| {
        error!("Storing {} credential failed: {}", kind, e);
        e
    })?;

    info!("Security enabled with a {}", kind);
    Ok(())
}

/// Swaps in the new credential and switches the gate on in one transaction.
fn store_credential(
    conn: &mut Connection,
    kind: CredentialKind,
    hash: &str,
    salt: &str,
) -> AppResult<()> {
    let tx = conn.transaction()?;
    credentials::replace_security_credential(&tx, kind, hash, salt)?;
    settings::set_bool_setting(&tx, SettingKey::SecurityEnabled, true)?;
    settings::set_bool_setting(&tx, SettingKey::SecurityCompleted, true)?;
    tx.commit()?;
    Ok(())
}

/// Checks `credential` against the stored one.
///
/// Returns `Ok(false)` when nothing is configured or the stored values
/// cannot be decoded.
pub fn verify(db: &Database, credential: &str) -> AppResult<bool> {
    let conn = db.get_conn()?;
    let Some(stored) = credentials::get_security_credential(&conn)? else {
        debug!("No enabled credential, verification fails");
        return Ok(false);
    };

    match verify_credential(credential, &stored.hashed_value, &stored.salt) {
        Ok(matched) => {
            if !matched {
                warn!("Credential verification failed");
            }
            Ok(matched)
        }
        Err(e) => {
            error!("Stored credential {} is unreadable: {}", stored.id, e);
            Ok(false)
        }
    }
}

/// True when the gate is switched on and an enabled credential exists.
pub fn is_security_enabled(db: &Database) -> AppResult<bool> {
    let conn = db.get_conn()?;
    if !settings::get_bool_setting(&conn, SettingKey::SecurityEnabled, false)? {
        return Ok(false);
    }
    Ok(credentials::get_security_credential(&conn)?.is_some())
}

/// The kind of the stored credential, if one is enabled.
pub fn credential_type(db: &Database) -> AppResult<Option<CredentialKind>> {
    let conn = db.get_conn()?;
    Ok(credentials::get_security_credential(&conn)?.map(|c| c.credential_type))
}

/// Deletes the stored credential and switches the gate off.
///
/// Returns whether a credential was removed. The gate is switched off
/// either way.
pub fn disable(db: &Database) -> AppResult<bool> {
    let mut conn = db.get_conn()?;
    let tx = conn.transaction()?;
    let removed = credentials::delete_security_credentials(&tx)?;
    settings::set_bool_setting(&tx, SettingKey::SecurityEnabled, false)?;
    settings::set_bool_setting(&tx, SettingKey::SecurityCompleted, true)?;
    tx.commit()?;

    info!("Security disabled");
    Ok(removed)
}
