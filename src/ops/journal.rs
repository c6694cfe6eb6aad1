//! Journal registry: validated entry CRUD and tag attachment.
//!
//! One entry exists per calendar date. Creation validates the input, then
//! checks for an existing entry as a fast path; the UNIQUE index on
//! `entry_date` is what actually enforces the rule, and a violation surfaces
//! as the same [`ValidationError::DuplicateDate`].
//!
//! Tag attachment keeps each tag's usage count equal to the number of entries
//! linked to it: every link insert or delete and its counter change run in
//! the same transaction.

use crate::constants::{MAX_SECONDARY_MOODS, MAX_TITLE_LENGTH};
use crate::db::entries::{self, JournalEntry};
use crate::db::tags::{self, Tag};
use crate::db::Database;
use crate::errors::{AppError, AppResult, ValidationError};
use crate::journal_core::{character_count, normalize_tag_name, parse_entry_date, word_count};
use crate::moods::Mood;
use crate::ops::tags::create_or_get_in;
use chrono::Utc;
use rusqlite::Connection;
use tracing::{debug, error, info, warn};

/// Caller-supplied fields for creating or updating an entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryInput {
    pub title: Option<String>,
    /// Rich-text HTML.
    pub content: String,
    pub primary_mood: String,
    pub secondary_moods: Vec<String>,
}

#[derive(Debug)]
struct ValidatedInput {
    title: Option<String>,
    content: String,
    primary_mood: Mood,
    secondary_moods: Vec<Mood>,
}

fn validate_input(input: &EntryInput) -> Result<ValidatedInput, ValidationError> {
    let mood_key = input.primary_mood.as_str();
    if mood_key.trim().is_empty() {
        return Err(ValidationError::MissingMood);
    }
    // Keys are exact: padding or case changes make a mood invalid.
    let primary_mood =
        Mood::from_key(mood_key).ok_or_else(|| ValidationError::InvalidMood(mood_key.to_string()))?;

    if input.content.trim().is_empty() {
        return Err(ValidationError::EmptyContent);
    }

    let title = input
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);
    if title
        .as_deref()
        .is_some_and(|t| t.chars().count() > MAX_TITLE_LENGTH)
    {
        return Err(ValidationError::TitleTooLong);
    }

    let secondary_keys: Vec<&str> = input
        .secondary_moods
        .iter()
        .map(String::as_str)
        .filter(|m| !m.trim().is_empty())
        .collect();
    if secondary_keys.len() > MAX_SECONDARY_MOODS {
        return Err(ValidationError::TooManySecondaryMoods);
    }
    let secondary_moods = secondary_keys
        .into_iter()
        .map(|key| Mood::from_key(key).ok_or_else(|| ValidationError::InvalidMood(key.to_string())))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ValidatedInput {
        title,
        content: input.content.clone(),
        primary_mood,
        secondary_moods,
    })
}

fn log_failure(action: &str, err: &AppError) {
    match err {
        AppError::Validation(v) => warn!("{} rejected: {}", action, v),
        other => error!("{} failed: {}", action, other),
    }
}

/// Creates the entry for `entry_date` (`YYYY-MM-DD`).
///
/// Validation runs in this order: primary mood present, primary mood
/// canonical, content non-blank, title length, secondary moods, date format,
/// no existing entry for the date. Nothing is written on failure.
///
/// # Errors
///
/// Returns [`AppError::Validation`] for rejected input, including
/// [`ValidationError::DuplicateDate`], or a database error.
pub fn create_entry(db: &Database, entry_date: &str, input: &EntryInput) -> AppResult<JournalEntry> {
    create_entry_inner(db, entry_date, input).map_err(|e| {
        log_failure(&format!("Create entry for {}", entry_date), &e);
        e
    })
}

fn create_entry_inner(db: &Database, entry_date: &str, input: &EntryInput) -> AppResult<JournalEntry> {
    let valid = validate_input(input)?;
    let entry_date = entry_date.trim();
    parse_entry_date(entry_date)?;

    let mut conn = db.get_conn()?;
    let tx = conn.transaction()?;

    if entries::entry_exists_for_date(&tx, entry_date)? {
        return Err(ValidationError::DuplicateDate(entry_date.to_string()).into());
    }

    let now = Utc::now();
    let mut entry = JournalEntry {
        id: 0,
        title: valid.title,
        word_count: word_count(&valid.content),
        character_count: character_count(&valid.content),
        content: valid.content,
        entry_date: entry_date.to_string(),
        primary_mood: valid.primary_mood,
        secondary_moods: valid.secondary_moods,
        created_at: now,
        updated_at: now,
    };
    entry.id = entries::insert_entry(&tx, &entry)?;
    tx.commit()?;

    info!(
        "Created entry {} for {} ({} words)",
        entry.id, entry.entry_date, entry.word_count
    );
    Ok(entry)
}

/// Replaces the editable fields of an existing entry.
///
/// The date is kept and not re-checked for uniqueness. Returns `Ok(false)`
/// if no entry has this id.
///
/// # Errors
///
/// Returns [`AppError::Validation`] for rejected input or a database error.
pub fn update_entry(db: &Database, id: i64, input: &EntryInput) -> AppResult<bool> {
    update_entry_inner(db, id, input).map_err(|e| {
        log_failure(&format!("Update entry {}", id), &e);
        e
    })
}

fn update_entry_inner(db: &Database, id: i64, input: &EntryInput) -> AppResult<bool> {
    let valid = validate_input(input)?;
    let conn = db.get_conn()?;

    let Some(mut entry) = entries::get_entry_by_id(&conn, id)? else {
        debug!("Entry {} not found, nothing to update", id);
        return Ok(false);
    };

    entry.word_count = word_count(&valid.content);
    entry.character_count = character_count(&valid.content);
    entry.title = valid.title;
    entry.content = valid.content;
    entry.primary_mood = valid.primary_mood;
    entry.secondary_moods = valid.secondary_moods;
    entry.updated_at = Utc::now();

    let updated = entries::update_entry(&conn, &entry)?;
    if updated {
        info!("Updated entry {} ({} words)", id, entry.word_count);
    }
    Ok(updated)
}

/// Deletes an entry and every tag link it has, releasing one use of each tag.
///
/// Returns `Ok(false)` if no entry has this id.
pub fn delete_entry(db: &Database, id: i64) -> AppResult<bool> {
    let mut conn = db.get_conn()?;
    let tx = conn.transaction()?;

    let links = tags::entry_tags_for_entry(&tx, id)?;
    tags::delete_all_entry_tags(&tx, id)?;
    for link in &links {
        tags::decrement_usage(&tx, link.tag_id)?;
    }
    let deleted = entries::delete_entry(&tx, id)?;
    tx.commit().map_err(|e| {
        error!("Delete entry {} failed: {}", id, e);
        AppError::from(e)
    })?;

    if deleted {
        info!("Deleted entry {} and {} tag links", id, links.len());
    }
    Ok(deleted)
}

pub fn get_entry(db: &Database, id: i64) -> AppResult<Option<JournalEntry>> {
    let conn = db.get_conn()?;
    entries::get_entry_by_id(&conn, id)
}

pub fn get_entry_by_date(db: &Database, entry_date: &str) -> AppResult<Option<JournalEntry>> {
    let conn = db.get_conn()?;
    entries::get_entry_by_date(&conn, entry_date.trim())
}

/// All entries, newest date first.
pub fn list_entries(db: &Database) -> AppResult<Vec<JournalEntry>> {
    let conn = db.get_conn()?;
    entries::list_entries(&conn)
}

/// Entries dated within `start..=end`, newest first.
pub fn entries_in_range(db: &Database, start: &str, end: &str) -> AppResult<Vec<JournalEntry>> {
    let conn = db.get_conn()?;
    entries::entries_in_range(&conn, start, end)
}

pub fn entries_by_mood(db: &Database, mood: Mood) -> AppResult<Vec<JournalEntry>> {
    let conn = db.get_conn()?;
    entries::entries_by_primary_mood(&conn, mood)
}

/// Case-insensitive substring search over titles and content.
pub fn search_entries(db: &Database, term: &str) -> AppResult<Vec<JournalEntry>> {
    let conn = db.get_conn()?;
    entries::search_entries(&conn, term.trim())
}

pub fn entry_exists_for_date(db: &Database, entry_date: &str) -> AppResult<bool> {
    let conn = db.get_conn()?;
    entries::entry_exists_for_date(&conn, entry_date.trim())
}

/// Tags on an entry, in attachment order.
pub fn tags_for_entry(db: &Database, entry_id: i64) -> AppResult<Vec<Tag>> {
    let conn = db.get_conn()?;
    tags::tags_for_entry(&conn, entry_id)
}

/// Attaches each named tag, creating tags as needed.
///
/// Names are normalized and blanks skipped. A tag already on the entry is
/// left alone, so its count is not bumped twice.
fn attach_tags<S: AsRef<str>>(conn: &Connection, entry_id: i64, names: &[S]) -> AppResult<usize> {
    let mut attached = 0;
    for raw in names {
        let name = normalize_tag_name(raw.as_ref());
        if name.is_empty() {
            continue;
        }
        let tag = create_or_get_in(conn, &name)?;
        if tags::insert_entry_tag(conn, entry_id, tag.id)? {
            tags::increment_usage(conn, tag.id)?;
            attached += 1;
        } else {
            debug!("Tag '{}' already on entry {}", name, entry_id);
        }
    }
    Ok(attached)
}

/// Adds tags to an entry. Returns `Ok(false)` if the entry does not exist.
pub fn add_tags<S: AsRef<str>>(db: &Database, entry_id: i64, names: &[S]) -> AppResult<bool> {
    let mut conn = db.get_conn()?;
    let tx = conn.transaction()?;

    if entries::get_entry_by_id(&tx, entry_id)?.is_none() {
        debug!("Entry {} not found, no tags added", entry_id);
        return Ok(false);
    }
    let attached = attach_tags(&tx, entry_id, names)?;
    tx.commit()?;

    info!("Attached {} tags to entry {}", attached, entry_id);
    Ok(true)
}

/// Replaces an entry's tags with `names`.
///
/// Every current link is removed (releasing one use of its tag) before the
/// new list is attached. Returns `Ok(false)` if the entry does not exist.
pub fn set_tags<S: AsRef<str>>(db: &Database, entry_id: i64, names: &[S]) -> AppResult<bool> {
    let mut conn = db.get_conn()?;
    let tx = conn.transaction()?;

    if entries::get_entry_by_id(&tx, entry_id)?.is_none() {
        debug!("Entry {} not found, tags unchanged", entry_id);
        return Ok(false);
    }

    for current in tags::tags_for_entry(&tx, entry_id)? {
        if tags::delete_entry_tag(&tx, entry_id, current.id)? {
            tags::decrement_usage(&tx, current.id)?;
        }
    }
    let attached = attach_tags(&tx, entry_id, names)?;
    tx.commit()?;

    info!("Set {} tags on entry {}", attached, entry_id);
    Ok(true)
}

/// Detaches one tag. Usage drops only if a link was actually removed.
pub fn remove_tag(db: &Database, entry_id: i64, tag_id: i64) -> AppResult<bool> {
    let mut conn = db.get_conn()?;
    let tx = conn.transaction()?;

    let removed = tags::delete_entry_tag(&tx, entry_id, tag_id)?;
    if removed {
        tags::decrement_usage(&tx, tag_id)?;
    }
    tx.commit()?;

    Ok(removed)
}
