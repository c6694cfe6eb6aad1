/*!
# Moodjournal

Moodjournal is the core of a personal mood journal. Each calendar day gets at
most one rich-text entry carrying a primary mood, up to two secondary moods
and any number of free-form tags. An optional PIN or password gates access,
and a layered avatar can be rendered as SVG, either in full or as a head-only
sticker showing a mood's expression.

## Architecture

- `db`: SQLite persistence behind an r2d2 pool, with lazy schema setup
- `ops`: Services that validate input and run multi-step writes atomically
- `journal_core`: Pure helpers (word counts, tag names, mood encoding)
- `moods`: The eight canonical moods
- `avatar`: Position tables, asset paths and SVG composition
- `crypto`: Salted credential hashing
- `editor`: Rich-text editor contract and an external-editor implementation
- `config`: Environment-driven configuration
- `cli`: Command-line interface handling using clap
- `errors`: Error types and utilities for error handling

## Usage Example

```rust,no_run
use moodjournal::db::Database;
use moodjournal::ops::journal::{create_entry, set_tags, EntryInput};
use moodjournal::Config;

fn main() -> moodjournal::AppResult<()> {
    let config = Config::load()?;
    moodjournal::config::ensure_data_dir(&config.data_dir)?;
    let db = Database::open(&config.database_path())?;

    let entry = create_entry(
        &db,
        "2024-01-15",
        &EntryInput {
            content: "<p>Great day!</p>".to_string(),
            primary_mood: "happy".to_string(),
            ..Default::default()
        },
    )?;
    set_tags(&db, entry.id, &["work", "sunshine"])?;
    Ok(())
}
```
*/

/// Avatar and mood-sticker compositor
pub mod avatar;
/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Constants used throughout the application
pub mod constants;
/// Credential hashing
pub mod crypto;
/// SQLite persistence
pub mod db;
/// Rich-text editor contract
pub mod editor;
/// Error types and utilities for error handling
pub mod errors;
/// Pure journal helpers
pub mod journal_core;
/// The canonical mood set
pub mod moods;
/// Service layer
pub mod ops;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use db::Database;
pub use errors::{AppError, AppResult};
pub use moods::Mood;
