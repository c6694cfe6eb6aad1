//! Journal statistics for the dashboard.
//!
//! Every aggregate here degrades instead of failing: a storage error is
//! logged with `warn!` and the neutral value (zero, empty, `None`) is
//! returned, so one bad query cannot take the whole dashboard down.

use crate::db::entries::{self, JournalEntry};
use crate::db::Database;
use crate::errors::AppResult;
use crate::journal_core::month_key;
use crate::moods::Mood;
use crate::ops::tags::most_used_tag_name;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

/// Summary numbers shown on the home screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_entries: usize,
    pub total_words: usize,
    pub average_words: usize,
    pub entries_this_month: usize,
    pub most_frequent_mood: Option<Mood>,
    pub most_used_tag: Option<String>,
    pub entries_by_month: BTreeMap<String, usize>,
}

fn degrade<T>(what: &str, result: AppResult<T>, neutral: T) -> T {
    result.unwrap_or_else(|e| {
        warn!("Could not compute {}: {}", what, e);
        neutral
    })
}

pub fn entry_count(db: &Database) -> usize {
    let result = db.get_conn().and_then(|conn| entries::count_entries(&conn));
    degrade("entry count", result, 0)
}

pub fn total_word_count(db: &Database) -> usize {
    let result = db
        .get_conn()
        .and_then(|conn| entries::total_word_count(&conn));
    degrade("total word count", result, 0)
}

/// Entry counts keyed by `YYYY-MM`.
pub fn entries_by_month(db: &Database) -> BTreeMap<String, usize> {
    let result = db.get_conn().and_then(|conn| entries::entry_dates(&conn));
    let dates = degrade("entries by month", result, Vec::new());

    let mut months = BTreeMap::new();
    for date in &dates {
        *months.entry(month_key(date).to_string()).or_insert(0) += 1;
    }
    months
}

/// Total words divided by entry count, truncated. Zero when there are no entries.
pub fn average_word_count(db: &Database) -> usize {
    let count = entry_count(db);
    if count == 0 {
        return 0;
    }
    total_word_count(db) / count
}

/// The most common primary mood. Ties go to the mood seen first.
pub fn most_frequent_mood(db: &Database) -> Option<Mood> {
    let result = db.get_conn().and_then(|conn| entries::primary_moods(&conn));
    let keys = degrade("most frequent mood", result, Vec::new());
    most_frequent(keys.iter().filter_map(|k| Mood::from_key(k)))
}

fn most_frequent(moods: impl Iterator<Item = Mood>) -> Option<Mood> {
    let mut counts: Vec<(Mood, usize)> = Vec::new();
    for mood in moods {
        match counts.iter_mut().find(|(m, _)| *m == mood) {
            Some((_, n)) => *n += 1,
            None => counts.push((mood, 1)),
        }
    }

    let mut best: Option<(Mood, usize)> = None;
    for (mood, n) in counts {
        if best.map_or(true, |(_, top)| n > top) {
            best = Some((mood, n));
        }
    }
    best.map(|(mood, _)| mood)
}

fn month_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = today.with_day(1).unwrap_or(today);
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    let last = next_month.and_then(|d| d.pred_opt()).unwrap_or(today);
    (first, last)
}

/// Number of entries dated in the calendar month containing `today`.
pub fn entries_this_month(db: &Database, today: NaiveDate) -> usize {
    let (first, last) = month_bounds(today);
    let start = first.format(crate::constants::DATE_FORMAT_ISO).to_string();
    let end = last.format(crate::constants::DATE_FORMAT_ISO).to_string();

    let result = db
        .get_conn()
        .and_then(|conn| entries::entries_in_range(&conn, &start, &end));
    degrade("entries this month", result, Vec::new()).len()
}

/// The `limit` most recently written entries.
pub fn recent_entries(db: &Database, limit: usize) -> Vec<JournalEntry> {
    let result = db
        .get_conn()
        .and_then(|conn| entries::recent_entries(&conn, limit));
    degrade("recent entries", result, Vec::new())
}

/// Bundles every dashboard statistic.
pub fn dashboard(db: &Database, today: NaiveDate) -> DashboardStats {
    DashboardStats {
        total_entries: entry_count(db),
        total_words: total_word_count(db),
        average_words: average_word_count(db),
        entries_this_month: entries_this_month(db, today),
        most_frequent_mood: most_frequent_mood(db),
        most_used_tag: degrade("most used tag", most_used_tag_name(db), None),
        entries_by_month: entries_by_month(db),
    }
}
