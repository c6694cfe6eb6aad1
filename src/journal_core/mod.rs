//! Core journal functionality without I/O operations.
//!
//! This module contains pure logic shared by the journal and tag services:
//! counting words and characters in rich-text HTML, normalizing tag names,
//! converting secondary moods to and from their stored text form, and
//! deriving month keys from entry dates.

use crate::constants::{DATE_FORMAT_ISO, MONTH_KEY_LENGTH};
use crate::errors::ValidationError;
use crate::moods::Mood;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;

/// Separator used when secondary moods are stored as a single text column.
pub const MOOD_SEPARATOR: char = ',';

fn html_tag_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("<.*?>").ok()).as_ref()
}

fn whitespace_run_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").ok()).as_ref()
}

/// Removes every `<...>` tag (non-greedy) from rich-text HTML.
///
/// Returns `None` only if the tag pattern could not be compiled; callers
/// treat that as a counting failure and report zero.
pub fn strip_html_tags(html: &str) -> Option<String> {
    html_tag_pattern().map(|re| re.replace_all(html, "").into_owned())
}

/// Counts the words in rich-text HTML.
///
/// Tags are stripped, whitespace runs collapse to single spaces, and the
/// remaining text is split on whitespace.
///
/// # Examples
///
/// ```
/// use moodjournal::journal_core::word_count;
///
/// assert_eq!(word_count("<p>Great day!</p>"), 2);
/// assert_eq!(word_count("<p>   </p>"), 0);
/// ```
pub fn word_count(html: &str) -> usize {
    let Some(text) = strip_html_tags(html) else {
        return 0;
    };
    let Some(ws) = whitespace_run_pattern() else {
        return 0;
    };
    let collapsed = ws.replace_all(&text, " ");
    let trimmed = collapsed.trim();
    if trimmed.is_empty() {
        return 0;
    }
    trimmed.split_whitespace().count()
}

/// Counts the non-whitespace characters in rich-text HTML, excluding markup.
///
/// # Examples
///
/// ```
/// use moodjournal::journal_core::character_count;
///
/// assert_eq!(character_count("<p>Great day!</p>"), 9);
/// ```
pub fn character_count(html: &str) -> usize {
    match strip_html_tags(html) {
        Some(text) => text.chars().filter(|c| !c.is_whitespace()).count(),
        None => 0,
    }
}

/// Trims and lower-cases a tag name.
pub fn normalize_tag_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Serializes secondary moods to their stored comma-joined form.
pub fn encode_moods(moods: &[Mood]) -> String {
    moods
        .iter()
        .map(Mood::key)
        .collect::<Vec<_>>()
        .join(&MOOD_SEPARATOR.to_string())
}

/// Parses the stored comma-joined form back into moods.
///
/// Empty segments are skipped. Unknown keys are dropped with a warning so a
/// single bad row cannot make an entry unreadable.
pub fn decode_moods(stored: &str) -> Vec<Mood> {
    stored
        .split(MOOD_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|key| {
            let mood = Mood::from_key(key);
            if mood.is_none() {
                warn!("Dropping unknown stored mood key '{}'", key);
            }
            mood
        })
        .collect()
}

/// Parses an entry date in `YYYY-MM-DD` form.
pub fn parse_entry_date(date: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(date, DATE_FORMAT_ISO)
        .map_err(|_| ValidationError::InvalidDate(date.to_string()))
}

/// Returns the `YYYY-MM` prefix of an entry date.
pub fn month_key(entry_date: &str) -> &str {
    entry_date.get(..MONTH_KEY_LENGTH).unwrap_or(entry_date)
}

/// Primary mood followed by the secondary moods, in order.
pub fn all_moods(primary: Mood, secondary: &[Mood]) -> Vec<Mood> {
    let mut moods = Vec::with_capacity(secondary.len() + 1);
    moods.push(primary);
    moods.extend_from_slice(secondary);
    moods
}
