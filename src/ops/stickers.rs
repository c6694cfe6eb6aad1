//! Avatar and mood-sticker rendering from the stored avatar.
//!
//! Every function returns `Ok(None)` when no avatar has been configured,
//! so callers can show a placeholder instead of an error.

use crate::avatar::{render_avatar_svg, render_mood_sticker_svg, to_data_url};
use crate::db::avatars::{get_user_avatar, AvatarConfiguration};
use crate::db::Database;
use crate::errors::{AppResult, ValidationError};
use crate::moods::Mood;
use std::collections::BTreeMap;
use tracing::{debug, warn};

fn load_avatar(db: &Database) -> AppResult<Option<AvatarConfiguration>> {
    let conn = db.get_conn()?;
    let avatar = get_user_avatar(&conn)?;
    if avatar.is_none() {
        debug!("No avatar configured");
    }
    Ok(avatar)
}

/// Whether the profile has an avatar to render.
pub fn has_configured_avatar(db: &Database) -> AppResult<bool> {
    Ok(load_avatar(db)?.is_some())
}

/// Head-only sticker for `mood`, as SVG markup.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidMood`] if an avatar exists but `mood`
/// is not a canonical mood key.
pub fn mood_sticker_svg(
    db: &Database,
    mood: &str,
    width: u32,
    height: u32,
) -> AppResult<Option<String>> {
    let Some(avatar) = load_avatar(db)? else {
        return Ok(None);
    };
    let mood = Mood::from_key(mood).ok_or_else(|| {
        warn!("Sticker requested for unknown mood '{}'", mood);
        ValidationError::InvalidMood(mood.to_string())
    })?;
    Ok(Some(render_mood_sticker_svg(&avatar, mood, width, height)))
}

/// [`mood_sticker_svg`] wrapped as a base64 data URI.
pub fn mood_sticker_data_url(
    db: &Database,
    mood: &str,
    width: u32,
    height: u32,
) -> AppResult<Option<String>> {
    Ok(mood_sticker_svg(db, mood, width, height)?.map(|svg| to_data_url(&svg)))
}

/// One sticker per canonical mood. Empty when no avatar is configured.
pub fn all_mood_stickers(db: &Database, width: u32, height: u32) -> AppResult<BTreeMap<Mood, String>> {
    let Some(avatar) = load_avatar(db)? else {
        return Ok(BTreeMap::new());
    };
    Ok(Mood::ALL
        .iter()
        .map(|&mood| (mood, render_mood_sticker_svg(&avatar, mood, width, height)))
        .collect())
}

/// The full avatar as SVG markup.
pub fn avatar_svg(db: &Database, width: u32, height: u32) -> AppResult<Option<String>> {
    Ok(load_avatar(db)?.map(|avatar| render_avatar_svg(&avatar, width, height)))
}

pub fn avatar_data_url(db: &Database, width: u32, height: u32) -> AppResult<Option<String>> {
    Ok(avatar_svg(db, width, height)?.map(|svg| to_data_url(&svg)))
}
