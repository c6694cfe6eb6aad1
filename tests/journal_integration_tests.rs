//! End-to-end journal behavior through the public service API.


use chrono::NaiveDate;
use moodjournal::db::Database;
use moodjournal::errors::ValidationError;
use moodjournal::ops::{journal, stats, tags};
use moodjournal::Mood;
use test_helpers::{entry, open_db};

fn usage(db: &Database, name: &str) -> u32 {
    tags::get_tag_by_name(db, name)
        .unwrap()
        .map_or(0, |t| t.usage_count)
}

#[test]
fn test_great_day_scenario() {
    let (db, _dir) = open_db();

    let created = journal::create_entry(&db, "2024-01-15", &entry("happy", "<p>Great day!</p>")).unwrap();
    assert_eq!(created.word_count, 2);
    assert_eq!(created.character_count, 9);

    let stored = journal::get_entry_by_date(&db, "2024-01-15").unwrap().unwrap();
    assert_eq!(stored, created);
}

#[test]
fn test_second_entry_for_same_day_is_rejected() {
    let (db, _dir) = open_db();
    journal::create_entry(&db, "2024-01-15", &entry("happy", "morning")).unwrap();

    for mood in ["sad", "calm", "angry"] {
        let err = journal::create_entry(&db, "2024-01-15", &entry(mood, "again")).unwrap_err();
        assert_eq!(
            err.as_validation(),
            Some(&ValidationError::DuplicateDate("2024-01-15".to_string()))
        );
    }

    let all = journal::list_entries(&db).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].content, "morning");
}

#[test]
fn test_failed_write_is_distinguishable_from_empty_read() {
    let (db, _dir) = open_db();

    assert!(journal::list_entries(&db).unwrap().is_empty());
    assert!(journal::create_entry(&db, "2024-01-15", &entry("happy", "   ")).is_err());
    assert!(journal::get_entry_by_date(&db, "2024-01-15").unwrap().is_none());
}

#[test]
fn test_tags_follow_attachment_across_operations() {
    let (db, _dir) = open_db();
    let monday = journal::create_entry(&db, "2024-01-15", &entry("tired", "x")).unwrap();
    let tuesday = journal::create_entry(&db, "2024-01-16", &entry("calm", "y")).unwrap();

    journal::set_tags(&db, monday.id, &["Work", "coffee"]).unwrap();
    journal::set_tags(&db, tuesday.id, &["work"]).unwrap();
    assert_eq!(usage(&db, "work"), 2);

    journal::set_tags(&db, monday.id, &["coffee"]).unwrap();
    assert_eq!(usage(&db, "work"), 1);
    assert_eq!(usage(&db, "coffee"), 1);

    journal::delete_entry(&db, tuesday.id).unwrap();
    assert_eq!(usage(&db, "work"), 0);

    let top = tags::most_used(&db, 1).unwrap();
    assert_eq!(top[0].name, "coffee");
}

#[test]
fn test_data_survives_reopen() {
    let (db, dir) = open_db();
    let created = journal::create_entry(&db, "2024-02-29", &entry("grateful", "leap day")).unwrap();
    journal::add_tags(&db, created.id, &["rare"]).unwrap();
    drop(db);

    let reopened = Database::open(&dir.path().join("moodjournal.db3")).unwrap();
    let stored = journal::get_entry(&reopened, created.id).unwrap().unwrap();
    assert_eq!(stored.primary_mood, Mood::Grateful);
    assert_eq!(journal::tags_for_entry(&reopened, created.id).unwrap().len(), 1);

    let conn = reopened.get_conn().unwrap();
    let settings: i64 = conn
        .query_row("SELECT COUNT(*) FROM app_settings", [], |r| r.get(0))
        .unwrap();
    assert_eq!(settings, 8);
}

#[test]
fn test_dashboard_over_a_month() {
    let (db, _dir) = open_db();
    let days = [
        ("2024-05-01", "happy", "<p>sunny walk</p>"),
        ("2024-05-02", "happy", "<p>good lunch with friends</p>"),
        ("2024-05-03", "anxious", "<p>deadline</p>"),
        ("2024-06-01", "calm", "<p>quiet</p>"),
    ];
    for (date, mood, content) in days {
        journal::create_entry(&db, date, &entry(mood, content)).unwrap();
    }

    let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
    let dashboard = stats::dashboard(&db, today);
    assert_eq!(dashboard.total_entries, 4);
    assert_eq!(dashboard.total_words, 8);
    assert_eq!(dashboard.average_words, 2);
    assert_eq!(dashboard.entries_this_month, 3);
    assert_eq!(dashboard.most_frequent_mood, Some(Mood::Happy));
    assert_eq!(dashboard.entries_by_month.get("2024-05"), Some(&3));
    assert_eq!(dashboard.most_used_tag, None);
}
