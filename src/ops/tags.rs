//! Tag registry: normalized names, get-or-create, and usage counting.

use crate::constants::MAX_TAG_NAME_LENGTH;
use crate::db::tags::{self, Tag};
use crate::db::Database;
use crate::errors::{AppResult, ValidationError};
use crate::journal_core::normalize_tag_name;
use rusqlite::Connection;
use tracing::{debug, info, warn};

/// Normalizes and checks a tag name.
pub(crate) fn validate_tag_name(name: &str) -> Result<String, ValidationError> {
    let normalized = normalize_tag_name(name);
    if normalized.is_empty() {
        return Err(ValidationError::EmptyTagName);
    }
    if normalized.chars().count() > MAX_TAG_NAME_LENGTH {
        return Err(ValidationError::TagNameTooLong);
    }
    Ok(normalized)
}

/// Get-or-create on an existing connection, so it can join a transaction.
pub(crate) fn create_or_get_in(conn: &Connection, name: &str) -> AppResult<Tag> {
    let normalized = validate_tag_name(name).map_err(|e| {
        warn!("Rejected tag name '{}': {}", name, e);
        e
    })?;

    if let Some(existing) = tags::get_tag_by_name(conn, &normalized)? {
        debug!("Tag '{}' already exists as {}", normalized, existing.id);
        return Ok(existing);
    }

    let tag = tags::insert_tag(conn, &normalized)?;
    info!("Created tag '{}' ({})", tag.name, tag.id);
    Ok(tag)
}

/// Returns the tag with this name after trimming and lower-casing, creating
/// it with a zero usage count if needed.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyTagName`] or
/// [`ValidationError::TagNameTooLong`] for unusable names, or a database error.
///
/// # Examples
///
/// ```no_run
/// use moodjournal::db::Database;
/// use moodjournal::ops::tags::create_or_get;
/// use std::path::Path;
///
/// let db = Database::open(Path::new("/tmp/moodjournal.db3"))?;
/// let first = create_or_get(&db, "Work")?;
/// let second = create_or_get(&db, "work ")?;
/// assert_eq!(first.id, second.id);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn create_or_get(db: &Database, name: &str) -> AppResult<Tag> {
    let conn = db.get_conn()?;
    create_or_get_in(&conn, name)
}

/// Adds one use. Returns `false` if the tag does not exist.
pub fn increment_usage(db: &Database, tag_id: i64) -> AppResult<bool> {
    let conn = db.get_conn()?;
    let found = tags::increment_usage(&conn, tag_id)?;
    if !found {
        debug!("Tag {} not found, usage unchanged", tag_id);
    }
    Ok(found)
}

/// Removes one use, flooring at zero. Returns `false` if the tag does not exist.
pub fn decrement_usage(db: &Database, tag_id: i64) -> AppResult<bool> {
    let conn = db.get_conn()?;
    let found = tags::decrement_usage(&conn, tag_id)?;
    if !found {
        debug!("Tag {} not found, usage unchanged", tag_id);
    }
    Ok(found)
}

pub fn get_tag(db: &Database, tag_id: i64) -> AppResult<Option<Tag>> {
    let conn = db.get_conn()?;
    tags::get_tag_by_id(&conn, tag_id)
}

/// Looks up a tag by its normalized name.
pub fn get_tag_by_name(db: &Database, name: &str) -> AppResult<Option<Tag>> {
    let conn = db.get_conn()?;
    tags::get_tag_by_name(&conn, &normalize_tag_name(name))
}

/// All tags, most used first.
pub fn all_tags(db: &Database) -> AppResult<Vec<Tag>> {
    let conn = db.get_conn()?;
    tags::all_tags(&conn)
}

/// Deletes a tag and detaches it from every entry.
pub fn delete_tag(db: &Database, tag_id: i64) -> AppResult<bool> {
    let mut conn = db.get_conn()?;
    let tx = conn.transaction()?;
    let deleted = tags::delete_tag(&tx, tag_id)?;
    tx.commit()?;

    if deleted {
        info!("Deleted tag {}", tag_id);
    }
    Ok(deleted)
}

/// Case-insensitive substring search, most used first.
pub fn search(db: &Database, term: &str) -> AppResult<Vec<Tag>> {
    let conn = db.get_conn()?;
    tags::search_tags(&conn, term.trim())
}

/// Top `limit` tags by usage count.
pub fn most_used(db: &Database, limit: usize) -> AppResult<Vec<Tag>> {
    let conn = db.get_conn()?;
    tags::most_used_tags(&conn, limit)
}

/// Suggestions for the tag picker: the most used tags.
pub fn suggested_tags(db: &Database, limit: usize) -> AppResult<Vec<Tag>> {
    most_used(db, limit)
}

/// Name of the single most used tag, if any tag is in use.
pub fn most_used_tag_name(db: &Database) -> AppResult<Option<String>> {
    Ok(most_used(db, 1)?
        .into_iter()
        .find(|t| t.usage_count > 0)
        .map(|t| t.name))
}
