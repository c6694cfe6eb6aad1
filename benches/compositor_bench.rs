//! Performance benchmarks for avatar rendering and journal writes.
//!
//! Run with: cargo bench
//!
//! These benchmarks establish baseline performance metrics for:
//! - Full avatar and mood sticker SVG rendering
//! - Word counting over rich-text content of various sizes
//! - Entry creation with tags against an on-disk database

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use moodjournal::avatar::{render_avatar_svg, render_mood_sticker_svg, to_data_url};
use moodjournal::db::avatars::AvatarConfiguration;
use moodjournal::db::Database;
use moodjournal::journal_core::word_count;
use moodjournal::ops::journal::{create_entry, set_tags, EntryInput};
use moodjournal::Mood;
use chrono::{Duration, NaiveDate};
use tempfile::TempDir;

fn dressed_avatar() -> AvatarConfiguration {
    AvatarConfiguration {
        gender: "male".to_string(),
        hair_style: Some("ceo-hair".to_string()),
        hair_color: Some("brown".to_string()),
        clothes_style: Some("hoodie".to_string()),
        clothes_color: Some("grey".to_string()),
        facial_hair_style: Some("style3".to_string()),
        glasses_style: Some("round".to_string()),
        headwear_style: Some("cap".to_string()),
        neckwear_style: Some("tie".to_string()),
        neckwear_color: Some("red".to_string()),
        extras_style: Some("earring".to_string()),
        extras_color: Some("gold".to_string()),
        ..Default::default()
    }
}

/// Benchmark SVG rendering for both canvases.
fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let config = dressed_avatar();

    group.bench_function("avatar", |b| {
        b.iter(|| black_box(render_avatar_svg(black_box(&config), 200, 200)));
    });
    group.bench_function("sticker", |b| {
        b.iter(|| black_box(render_mood_sticker_svg(black_box(&config), Mood::Happy, 80, 80)));
    });
    group.bench_function("all_stickers_data_url", |b| {
        b.iter(|| {
            for mood in Mood::ALL {
                black_box(to_data_url(&render_mood_sticker_svg(&config, mood, 80, 80)));
            }
        });
    });

    group.finish();
}

/// Benchmark word counting with various content sizes.
fn bench_word_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("word_count");
    let sizes = vec![("10 paragraphs", 10), ("100 paragraphs", 100), ("1000 paragraphs", 1000)];

    for (name, paragraphs) in sizes {
        let html = "<p>Today I went for a <strong>long</strong> walk by the river.</p>\n"
            .repeat(paragraphs);

        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &html, |b, html| {
            b.iter(|| black_box(word_count(black_box(html))));
        });
    }

    group.finish();
}

/// Benchmark creating an entry and attaching tags.
fn bench_create_entry(c: &mut Criterion) {
    let temp_dir = TempDir::new().expect("create temp dir");
    let db = Database::open(&temp_dir.path().join("bench.db3")).expect("open database");
    let start = NaiveDate::from_ymd_opt(2000, 1, 1).expect("valid date");
    let mut day = 0i64;

    c.bench_function("create_entry_with_tags", |b| {
        b.iter(|| {
            let date = (start + Duration::days(day)).format("%Y-%m-%d").to_string();
            day += 1;
            let input = EntryInput {
                content: "<p>Benchmark entry content</p>".to_string(),
                primary_mood: "calm".to_string(),
                ..Default::default()
            };
            let entry = create_entry(&db, &date, &input).expect("create entry");
            set_tags(&db, entry.id, &["bench", "daily"]).expect("set tags");
        });
    });

    drop(db);
    temp_dir.close().expect("cleanup temp dir");
}

criterion_group!(benches, bench_render, bench_word_count, bench_create_entry);
criterion_main!(benches);
