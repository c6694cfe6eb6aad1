//! Journal entry CRUD operations.
//!
//! This module provides functions for creating, reading, updating, and querying
//! journal entries in the database. Secondary moods are encoded to and decoded
//! from their comma-joined column form here and nowhere else.

use crate::db::like_pattern;
use crate::errors::{AppError, AppResult, DatabaseError, ValidationError};
use crate::journal_core::{decode_moods, encode_moods};
use crate::moods::Mood;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use tracing::debug;

/// A journal entry. One exists per calendar date at most.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JournalEntry {
    /// Zero until the entry is inserted.
    pub id: i64,
    pub title: Option<String>,
    /// Rich-text HTML.
    pub content: String,
    /// `YYYY-MM-DD`.
    pub entry_date: String,
    pub primary_mood: Mood,
    pub secondary_moods: Vec<Mood>,
    pub word_count: usize,
    pub character_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const SELECT_COLUMNS: &str = "SELECT id, title, content, entry_date, primary_mood, secondary_moods,
        word_count, character_count, created_at, updated_at
     FROM journal_entries";

impl JournalEntry {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let mood_key: String = row.get(4)?;
        let primary_mood = Mood::from_key(&mood_key).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                4,
                rusqlite::types::Type::Text,
                Box::new(ValidationError::InvalidMood(mood_key.clone())),
            )
        })?;
        let secondary: String = row.get(5)?;

        Ok(JournalEntry {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            entry_date: row.get(3)?,
            primary_mood,
            secondary_moods: decode_moods(&secondary),
            word_count: row.get(6)?,
            character_count: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }
}

fn query_entries<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> AppResult<Vec<JournalEntry>> {
    let mut stmt = conn.prepare(sql).map_err(DatabaseError::Sqlite)?;
    let entries = stmt
        .query_map(params, JournalEntry::from_row)
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;
    Ok(entries)
}

/// Inserts a new entry and returns its id.
///
/// # Errors
///
/// Returns [`ValidationError::DuplicateDate`] if an entry already exists for
/// the date (the UNIQUE index is the authority), or a database error.
pub fn insert_entry(conn: &Connection, entry: &JournalEntry) -> AppResult<i64> {
    debug!("Inserting entry for {}", entry.entry_date);

    let result = conn.execute(
        r#"
        INSERT INTO journal_entries (
            title, content, entry_date, primary_mood, secondary_moods,
            word_count, character_count, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
        params![
            entry.title,
            entry.content,
            entry.entry_date,
            entry.primary_mood.key(),
            encode_moods(&entry.secondary_moods),
            entry.word_count,
            entry.character_count,
            entry.created_at,
            entry.updated_at,
        ],
    );

    match result {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            Err(ValidationError::DuplicateDate(entry.entry_date.clone()).into())
        }
        Err(e) => Err(AppError::from(DatabaseError::Sqlite(e))),
    }
}

/// Overwrites every mutable column of an existing entry.
///
/// `entry_date` and `created_at` are left untouched. Returns `false` if no
/// entry has this id.
pub fn update_entry(conn: &Connection, entry: &JournalEntry) -> AppResult<bool> {
    debug!("Updating entry {}", entry.id);

    let updated = conn
        .execute(
            r#"
            UPDATE journal_entries SET
                title = ?1, content = ?2, primary_mood = ?3, secondary_moods = ?4,
                word_count = ?5, character_count = ?6, updated_at = ?7
            WHERE id = ?8
            "#,
            params![
                entry.title,
                entry.content,
                entry.primary_mood.key(),
                encode_moods(&entry.secondary_moods),
                entry.word_count,
                entry.character_count,
                entry.updated_at,
                entry.id,
            ],
        )
        .map_err(DatabaseError::Sqlite)?;

    Ok(updated > 0)
}

/// Deletes an entry row. Returns `false` if no entry has this id.
pub fn delete_entry(conn: &Connection, id: i64) -> AppResult<bool> {
    debug!("Deleting entry {}", id);

    let deleted = conn
        .execute("DELETE FROM journal_entries WHERE id = ?1", params![id])
        .map_err(DatabaseError::Sqlite)?;
    Ok(deleted > 0)
}

pub fn get_entry_by_id(conn: &Connection, id: i64) -> AppResult<Option<JournalEntry>> {
    debug!("Getting entry by id {}", id);

    conn.query_row(
        &format!("{} WHERE id = ?1", SELECT_COLUMNS),
        params![id],
        JournalEntry::from_row,
    )
    .optional()
    .map_err(|e| DatabaseError::Sqlite(e).into())
}

pub fn get_entry_by_date(conn: &Connection, entry_date: &str) -> AppResult<Option<JournalEntry>> {
    debug!("Getting entry for date {}", entry_date);

    conn.query_row(
        &format!("{} WHERE entry_date = ?1", SELECT_COLUMNS),
        params![entry_date],
        JournalEntry::from_row,
    )
    .optional()
    .map_err(|e| DatabaseError::Sqlite(e).into())
}

pub fn entry_exists_for_date(conn: &Connection, entry_date: &str) -> AppResult<bool> {
    let exists: bool = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM journal_entries WHERE entry_date = ?1)",
            params![entry_date],
            |row| row.get(0),
        )
        .map_err(DatabaseError::Sqlite)?;
    Ok(exists)
}

/// All entries, newest date first.
pub fn list_entries(conn: &Connection) -> AppResult<Vec<JournalEntry>> {
    debug!("Listing all entries");
    query_entries(
        conn,
        &format!("{} ORDER BY entry_date DESC", SELECT_COLUMNS),
        [],
    )
}

/// Entries with `start <= entry_date <= end`, newest first.
///
/// Bounds compare as text, which orders zero-padded ISO dates correctly.
pub fn entries_in_range(conn: &Connection, start: &str, end: &str) -> AppResult<Vec<JournalEntry>> {
    debug!("Listing entries from {} to {}", start, end);
    query_entries(
        conn,
        &format!(
            "{} WHERE entry_date >= ?1 AND entry_date <= ?2 ORDER BY entry_date DESC",
            SELECT_COLUMNS
        ),
        params![start, end],
    )
}

/// Entries whose primary mood is `mood`, newest first.
pub fn entries_by_primary_mood(conn: &Connection, mood: Mood) -> AppResult<Vec<JournalEntry>> {
    debug!("Listing entries with primary mood {}", mood);
    query_entries(
        conn,
        &format!(
            "{} WHERE primary_mood = ?1 ORDER BY entry_date DESC",
            SELECT_COLUMNS
        ),
        params![mood.key()],
    )
}

/// Case-insensitive substring search over title and content, newest first.
pub fn search_entries(conn: &Connection, term: &str) -> AppResult<Vec<JournalEntry>> {
    debug!("Searching entries for '{}'", term);
    let pattern = like_pattern(term);
    query_entries(
        conn,
        &format!(
            "{} WHERE fold_case(COALESCE(title, '')) LIKE ?1 ESCAPE '\\'
                OR fold_case(content) LIKE ?1 ESCAPE '\\'
             ORDER BY entry_date DESC",
            SELECT_COLUMNS
        ),
        params![pattern],
    )
}

/// The `limit` most recently created entries.
pub fn recent_entries(conn: &Connection, limit: usize) -> AppResult<Vec<JournalEntry>> {
    query_entries(
        conn,
        &format!(
            "{} ORDER BY created_at DESC, id DESC LIMIT ?1",
            SELECT_COLUMNS
        ),
        params![limit as i64],
    )
}

pub fn count_entries(conn: &Connection) -> AppResult<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM journal_entries", [], |row| row.get(0))
        .map_err(DatabaseError::Sqlite)?;
    Ok(count as usize)
}

pub fn total_word_count(conn: &Connection) -> AppResult<usize> {
    let total: i64 = conn
        .query_row(
            "SELECT COALESCE(SUM(word_count), 0) FROM journal_entries",
            [],
            |row| row.get(0),
        )
        .map_err(DatabaseError::Sqlite)?;
    Ok(total as usize)
}

/// Primary mood keys in storage order, one per entry.
pub fn primary_moods(conn: &Connection) -> AppResult<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT primary_mood FROM journal_entries ORDER BY id")
        .map_err(DatabaseError::Sqlite)?;
    let moods = stmt
        .query_map([], |row| row.get(0))
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<String>, _>>()
        .map_err(DatabaseError::Sqlite)?;
    Ok(moods)
}

/// Entry dates, newest first.
pub fn entry_dates(conn: &Connection) -> AppResult<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT entry_date FROM journal_entries ORDER BY entry_date DESC")
        .map_err(DatabaseError::Sqlite)?;
    let dates = stmt
        .query_map([], |row| row.get(0))
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<String>, _>>()
        .map_err(DatabaseError::Sqlite)?;
    Ok(dates)
}
