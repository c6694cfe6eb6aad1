//! High-level operations for the mood journal.
//!
//! This module is the service layer between the CLI (or any other front end)
//! and the persistence store. Each function takes a [`Database`](crate::db::Database),
//! validates its input, runs multi-step writes in a single transaction, and
//! logs the outcome. See [`crate::errors`] for how failures are reported.
//!
//! # Module Structure
//!
//! - `journal`: Entry CRUD, queries and tag attachment
//! - `stats`: Dashboard aggregates
//! - `tags`: Tag registry and usage counts
//! - `security`: PIN/password gate
//! - `profile`: Profile name and avatar onboarding
//! - `stickers`: Avatar and mood-sticker rendering from the stored avatar

pub mod journal;
pub mod profile;
pub mod security;
pub mod stats;
pub mod stickers;
pub mod tags;

// Re-export commonly used functions
pub use journal::{create_entry, delete_entry, set_tags, update_entry, EntryInput};
pub use stats::{dashboard, DashboardStats};
pub use stickers::{avatar_svg, mood_sticker_svg};
