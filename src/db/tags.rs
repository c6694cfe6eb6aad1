//! Tag and entry-tag link storage.
//!
//! Usage counters are adjusted with single `UPDATE` statements so each
//! change is atomic per tag; callers keep them in lock-step with the join
//! rows by running both inside one transaction.

use crate::db::like_pattern;
use crate::errors::{AppResult, DatabaseError};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use tracing::debug;

/// A tag. Names are stored trimmed and lower-cased.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    /// Number of entries currently carrying this tag.
    pub usage_count: u32,
    pub created_at: DateTime<Utc>,
    pub last_used_at: DateTime<Utc>,
}

/// A link between an entry and a tag.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryTag {
    pub id: i64,
    pub entry_id: i64,
    pub tag_id: i64,
    pub created_at: DateTime<Utc>,
}

const SELECT_TAG_COLUMNS: &str =
    "SELECT id, name, usage_count, created_at, last_used_at FROM tags";

impl Tag {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Tag {
            id: row.get(0)?,
            name: row.get(1)?,
            usage_count: row.get(2)?,
            created_at: row.get(3)?,
            last_used_at: row.get(4)?,
        })
    }
}

fn query_tags<P: rusqlite::Params>(conn: &Connection, sql: &str, params: P) -> AppResult<Vec<Tag>> {
    let mut stmt = conn.prepare(sql).map_err(DatabaseError::Sqlite)?;
    let tags = stmt
        .query_map(params, Tag::from_row)
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;
    Ok(tags)
}

/// All tags, most used first.
pub fn all_tags(conn: &Connection) -> AppResult<Vec<Tag>> {
    debug!("Listing all tags");
    query_tags(
        conn,
        &format!("{} ORDER BY usage_count DESC, id ASC", SELECT_TAG_COLUMNS),
        [],
    )
}

pub fn get_tag_by_id(conn: &Connection, id: i64) -> AppResult<Option<Tag>> {
    conn.query_row(
        &format!("{} WHERE id = ?1", SELECT_TAG_COLUMNS),
        params![id],
        Tag::from_row,
    )
    .optional()
    .map_err(|e| DatabaseError::Sqlite(e).into())
}

/// Exact lookup; callers normalize `name` first.
pub fn get_tag_by_name(conn: &Connection, name: &str) -> AppResult<Option<Tag>> {
    conn.query_row(
        &format!("{} WHERE name = ?1", SELECT_TAG_COLUMNS),
        params![name],
        Tag::from_row,
    )
    .optional()
    .map_err(|e| DatabaseError::Sqlite(e).into())
}

/// Inserts a new tag with a zero usage count.
pub fn insert_tag(conn: &Connection, name: &str) -> AppResult<Tag> {
    debug!("Inserting tag '{}'", name);

    let now = Utc::now();
    conn.execute(
        "INSERT INTO tags (name, usage_count, created_at, last_used_at) VALUES (?1, 0, ?2, ?3)",
        params![name, now, now],
    )
    .map_err(DatabaseError::Sqlite)?;

    Ok(Tag {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        usage_count: 0,
        created_at: now,
        last_used_at: now,
    })
}

/// Renames a tag and overwrites its counters.
pub fn update_tag(conn: &Connection, tag: &Tag) -> AppResult<bool> {
    let updated = conn
        .execute(
            "UPDATE tags SET name = ?1, usage_count = ?2, last_used_at = ?3 WHERE id = ?4",
            params![tag.name, tag.usage_count, tag.last_used_at, tag.id],
        )
        .map_err(DatabaseError::Sqlite)?;
    Ok(updated > 0)
}

/// Adds one to the usage count and stamps `last_used_at`.
///
/// Returns `false` if the tag does not exist.
pub fn increment_usage(conn: &Connection, id: i64) -> AppResult<bool> {
    let updated = conn
        .execute(
            "UPDATE tags SET usage_count = usage_count + 1, last_used_at = ?1 WHERE id = ?2",
            params![Utc::now(), id],
        )
        .map_err(DatabaseError::Sqlite)?;
    debug!("Incremented usage of tag {} ({} rows)", id, updated);
    Ok(updated > 0)
}

/// Subtracts one from the usage count, never going below zero.
///
/// `last_used_at` only advances if the new count is still positive.
/// Returns `false` if the tag does not exist.
pub fn decrement_usage(conn: &Connection, id: i64) -> AppResult<bool> {
    let updated = conn
        .execute(
            r#"
            UPDATE tags SET
                usage_count = MAX(usage_count - 1, 0),
                last_used_at = CASE WHEN usage_count - 1 > 0 THEN ?1 ELSE last_used_at END
            WHERE id = ?2
            "#,
            params![Utc::now(), id],
        )
        .map_err(DatabaseError::Sqlite)?;
    debug!("Decremented usage of tag {} ({} rows)", id, updated);
    Ok(updated > 0)
}

/// Deletes a tag together with every link to it.
pub fn delete_tag(conn: &Connection, id: i64) -> AppResult<bool> {
    conn.execute("DELETE FROM entry_tags WHERE tag_id = ?1", params![id])
        .map_err(DatabaseError::Sqlite)?;
    let deleted = conn
        .execute("DELETE FROM tags WHERE id = ?1", params![id])
        .map_err(DatabaseError::Sqlite)?;
    debug!("Deleted tag {} ({} rows)", id, deleted);
    Ok(deleted > 0)
}

/// Top `limit` tags by usage count; ties keep insertion order.
pub fn most_used_tags(conn: &Connection, limit: usize) -> AppResult<Vec<Tag>> {
    query_tags(
        conn,
        &format!(
            "{} ORDER BY usage_count DESC, id ASC LIMIT ?1",
            SELECT_TAG_COLUMNS
        ),
        params![limit as i64],
    )
}

/// Case-insensitive substring match on the name, most used first.
pub fn search_tags(conn: &Connection, term: &str) -> AppResult<Vec<Tag>> {
    debug!("Searching tags for '{}'", term);
    query_tags(
        conn,
        &format!(
            "{} WHERE fold_case(name) LIKE ?1 ESCAPE '\\' ORDER BY usage_count DESC, id ASC",
            SELECT_TAG_COLUMNS
        ),
        params![like_pattern(term)],
    )
}

/// Tags linked to an entry, in the order they were attached.
pub fn tags_for_entry(conn: &Connection, entry_id: i64) -> AppResult<Vec<Tag>> {
    query_tags(
        conn,
        "SELECT t.id, t.name, t.usage_count, t.created_at, t.last_used_at
         FROM tags t
         JOIN entry_tags et ON et.tag_id = t.id
         WHERE et.entry_id = ?1
         ORDER BY et.id",
        params![entry_id],
    )
}

pub fn entry_tags_for_entry(conn: &Connection, entry_id: i64) -> AppResult<Vec<EntryTag>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, entry_id, tag_id, created_at FROM entry_tags
             WHERE entry_id = ?1 ORDER BY id",
        )
        .map_err(DatabaseError::Sqlite)?;
    let links = stmt
        .query_map(params![entry_id], |row| {
            Ok(EntryTag {
                id: row.get(0)?,
                entry_id: row.get(1)?,
                tag_id: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;
    Ok(links)
}

/// Links a tag to an entry.
///
/// Returns `false` if the link already existed, in which case nothing changes.
pub fn insert_entry_tag(conn: &Connection, entry_id: i64, tag_id: i64) -> AppResult<bool> {
    let inserted = conn
        .execute(
            "INSERT OR IGNORE INTO entry_tags (entry_id, tag_id, created_at) VALUES (?1, ?2, ?3)",
            params![entry_id, tag_id, Utc::now()],
        )
        .map_err(DatabaseError::Sqlite)?;
    Ok(inserted > 0)
}

/// Removes one link. Returns whether a row was removed.
pub fn delete_entry_tag(conn: &Connection, entry_id: i64, tag_id: i64) -> AppResult<bool> {
    let deleted = conn
        .execute(
            "DELETE FROM entry_tags WHERE entry_id = ?1 AND tag_id = ?2",
            params![entry_id, tag_id],
        )
        .map_err(DatabaseError::Sqlite)?;
    Ok(deleted > 0)
}

/// Removes every link for an entry and returns how many were removed.
pub fn delete_all_entry_tags(conn: &Connection, entry_id: i64) -> AppResult<usize> {
    let deleted = conn
        .execute(
            "DELETE FROM entry_tags WHERE entry_id = ?1",
            params![entry_id],
        )
        .map_err(DatabaseError::Sqlite)?;
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::register_functions;
    use crate::db::schema::create_tables;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        register_functions(&conn).unwrap();
        create_tables(&conn).unwrap();
        conn
    }

    fn insert_entry_row(conn: &Connection, date: &str) -> i64 {
        conn.execute(
            "INSERT INTO journal_entries (content, entry_date, primary_mood, created_at, updated_at)
             VALUES ('x', ?1, 'happy', 'now', 'now')",
            params![date],
        )
        .unwrap();
        conn.last_insert_rowid()
    }

    #[test]
    fn test_insert_and_lookup() {
        let conn = setup();

        let tag = insert_tag(&conn, "work").unwrap();
        assert_eq!(tag.usage_count, 0);
        assert_eq!(get_tag_by_id(&conn, tag.id).unwrap().unwrap().name, "work");
        assert_eq!(get_tag_by_name(&conn, "work").unwrap().unwrap().id, tag.id);
        assert!(get_tag_by_name(&conn, "Work").unwrap().is_none());
        assert!(insert_tag(&conn, "work").is_err());
    }

    #[test]
    fn test_increment_and_decrement_floor() {
        let conn = setup();
        let tag = insert_tag(&conn, "gym").unwrap();

        assert!(increment_usage(&conn, tag.id).unwrap());
        assert!(increment_usage(&conn, tag.id).unwrap());
        assert!(decrement_usage(&conn, tag.id).unwrap());
        assert_eq!(get_tag_by_id(&conn, tag.id).unwrap().unwrap().usage_count, 1);

        assert!(decrement_usage(&conn, tag.id).unwrap());
        assert!(decrement_usage(&conn, tag.id).unwrap());
        assert_eq!(get_tag_by_id(&conn, tag.id).unwrap().unwrap().usage_count, 0);

        assert!(!increment_usage(&conn, 999).unwrap());
        assert!(!decrement_usage(&conn, 999).unwrap());
    }

    #[test]
    fn test_decrement_to_zero_keeps_last_used() {
        let conn = setup();
        let tag = insert_tag(&conn, "gym").unwrap();
        increment_usage(&conn, tag.id).unwrap();
        let before = get_tag_by_id(&conn, tag.id).unwrap().unwrap().last_used_at;

        decrement_usage(&conn, tag.id).unwrap();
        let after = get_tag_by_id(&conn, tag.id).unwrap().unwrap();
        assert_eq!(after.usage_count, 0);
        assert_eq!(after.last_used_at, before);
    }

    #[test]
    fn test_ordering_and_search() {
        let conn = setup();
        let work = insert_tag(&conn, "work").unwrap();
        let walk = insert_tag(&conn, "walk").unwrap();
        let home = insert_tag(&conn, "home").unwrap();
        increment_usage(&conn, walk.id).unwrap();
        increment_usage(&conn, walk.id).unwrap();
        increment_usage(&conn, home.id).unwrap();

        let names: Vec<String> = all_tags(&conn).unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["walk", "home", "work"]);

        let top: Vec<i64> = most_used_tags(&conn, 2)
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(top, vec![walk.id, home.id]);

        let found: Vec<i64> = search_tags(&conn, "W").unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(found, vec![walk.id, work.id]);
        assert!(search_tags(&conn, "%").unwrap().is_empty());
    }

    #[test]
    fn test_entry_links() {
        let conn = setup();
        let entry_id = insert_entry_row(&conn, "2024-01-15");
        let a = insert_tag(&conn, "a").unwrap();
        let b = insert_tag(&conn, "b").unwrap();

        assert!(insert_entry_tag(&conn, entry_id, b.id).unwrap());
        assert!(insert_entry_tag(&conn, entry_id, a.id).unwrap());
        assert!(!insert_entry_tag(&conn, entry_id, a.id).unwrap());

        let names: Vec<String> = tags_for_entry(&conn, entry_id)
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(entry_tags_for_entry(&conn, entry_id).unwrap().len(), 2);

        assert!(delete_entry_tag(&conn, entry_id, a.id).unwrap());
        assert!(!delete_entry_tag(&conn, entry_id, a.id).unwrap());
        assert_eq!(delete_all_entry_tags(&conn, entry_id).unwrap(), 1);
        assert!(tags_for_entry(&conn, entry_id).unwrap().is_empty());
    }

    #[test]
    fn test_delete_tag_removes_links() {
        let conn = setup();
        let entry_id = insert_entry_row(&conn, "2024-01-15");
        let tag = insert_tag(&conn, "x").unwrap();
        insert_entry_tag(&conn, entry_id, tag.id).unwrap();

        assert!(delete_tag(&conn, tag.id).unwrap());
        assert!(entry_tags_for_entry(&conn, entry_id).unwrap().is_empty());
        assert!(!delete_tag(&conn, tag.id).unwrap());
    }

    #[test]
    fn test_update_tag() {
        let conn = setup();
        let mut tag = insert_tag(&conn, "old").unwrap();
        tag.name = "new".to_string();
        tag.usage_count = 3;

        assert!(update_tag(&conn, &tag).unwrap());
        let loaded = get_tag_by_id(&conn, tag.id).unwrap().unwrap();
        assert_eq!(loaded.name, "new");
        assert_eq!(loaded.usage_count, 3);
    }
}
