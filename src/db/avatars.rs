//! Avatar configuration storage.

use crate::db::profile::get_user_profile;
use crate::errors::{AppResult, DatabaseError};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

/// Feature selections for one avatar.
///
/// Every optional style/color is independent; a missing style omits that
/// layer when rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct AvatarConfiguration {
    /// Zero until the configuration is first saved.
    pub id: i64,
    /// `"male"` or `"female"`.
    pub gender: String,
    /// 1-based asset indices.
    pub base_index: u32,
    pub eyes_index: u32,
    pub nose_index: u32,
    pub mouth_index: u32,
    pub hair_style: Option<String>,
    pub hair_color: Option<String>,
    pub clothes_style: Option<String>,
    pub clothes_color: Option<String>,
    pub facial_hair_style: Option<String>,
    pub glasses_style: Option<String>,
    pub headwear_style: Option<String>,
    pub headwear_color: Option<String>,
    pub neckwear_style: Option<String>,
    pub neckwear_color: Option<String>,
    pub extras_style: Option<String>,
    pub extras_color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for AvatarConfiguration {
    fn default() -> Self {
        let now = Utc::now();
        AvatarConfiguration {
            id: 0,
            gender: "female".to_string(),
            base_index: 1,
            eyes_index: 1,
            nose_index: 1,
            mouth_index: 1,
            hair_style: None,
            hair_color: None,
            clothes_style: None,
            clothes_color: None,
            facial_hair_style: None,
            glasses_style: None,
            headwear_style: None,
            headwear_color: None,
            neckwear_style: None,
            neckwear_color: None,
            extras_style: None,
            extras_color: None,
            created_at: now,
            updated_at: now,
        }
    }
}

const SELECT_COLUMNS: &str = "SELECT id, gender, base_index, eyes_index, nose_index, mouth_index,
        hair_style, hair_color, clothes_style, clothes_color, facial_hair_style,
        glasses_style, headwear_style, headwear_color, neckwear_style, neckwear_color,
        extras_style, extras_color, created_at, updated_at
     FROM avatar_configuration";

impl AvatarConfiguration {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(AvatarConfiguration {
            id: row.get(0)?,
            gender: row.get(1)?,
            base_index: row.get(2)?,
            eyes_index: row.get(3)?,
            nose_index: row.get(4)?,
            mouth_index: row.get(5)?,
            hair_style: row.get(6)?,
            hair_color: row.get(7)?,
            clothes_style: row.get(8)?,
            clothes_color: row.get(9)?,
            facial_hair_style: row.get(10)?,
            glasses_style: row.get(11)?,
            headwear_style: row.get(12)?,
            headwear_color: row.get(13)?,
            neckwear_style: row.get(14)?,
            neckwear_color: row.get(15)?,
            extras_style: row.get(16)?,
            extras_color: row.get(17)?,
            created_at: row.get(18)?,
            updated_at: row.get(19)?,
        })
    }
}

/// Fetches a configuration by id.
pub fn get_avatar_configuration(conn: &Connection, id: i64) -> AppResult<Option<AvatarConfiguration>> {
    debug!("Loading avatar configuration {}", id);

    conn.query_row(
        &format!("{} WHERE id = ?1", SELECT_COLUMNS),
        params![id],
        AvatarConfiguration::from_row,
    )
    .optional()
    .map_err(|e| DatabaseError::Sqlite(e).into())
}

/// Inserts the configuration when `id == 0`, otherwise updates it in place.
///
/// # Errors
///
/// Returns an error if the insert or update fails.
pub fn save_avatar_configuration(
    conn: &Connection,
    config: &AvatarConfiguration,
) -> AppResult<AvatarConfiguration> {
    let mut saved = config.clone();
    saved.updated_at = Utc::now();

    if saved.id == 0 {
        saved.created_at = saved.updated_at;
        conn.execute(
            r#"
            INSERT INTO avatar_configuration (
                gender, base_index, eyes_index, nose_index, mouth_index,
                hair_style, hair_color, clothes_style, clothes_color, facial_hair_style,
                glasses_style, headwear_style, headwear_color, neckwear_style, neckwear_color,
                extras_style, extras_color, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)
            "#,
            params![
                saved.gender,
                saved.base_index,
                saved.eyes_index,
                saved.nose_index,
                saved.mouth_index,
                saved.hair_style,
                saved.hair_color,
                saved.clothes_style,
                saved.clothes_color,
                saved.facial_hair_style,
                saved.glasses_style,
                saved.headwear_style,
                saved.headwear_color,
                saved.neckwear_style,
                saved.neckwear_color,
                saved.extras_style,
                saved.extras_color,
                saved.created_at,
                saved.updated_at,
            ],
        )
        .map_err(DatabaseError::Sqlite)?;
        saved.id = conn.last_insert_rowid();
        debug!("Created avatar configuration {} ({})", saved.id, saved.gender);
    } else {
        conn.execute(
            r#"
            UPDATE avatar_configuration SET
                gender = ?1, base_index = ?2, eyes_index = ?3, nose_index = ?4, mouth_index = ?5,
                hair_style = ?6, hair_color = ?7, clothes_style = ?8, clothes_color = ?9,
                facial_hair_style = ?10, glasses_style = ?11, headwear_style = ?12,
                headwear_color = ?13, neckwear_style = ?14, neckwear_color = ?15,
                extras_style = ?16, extras_color = ?17, updated_at = ?18
            WHERE id = ?19
            "#,
            params![
                saved.gender,
                saved.base_index,
                saved.eyes_index,
                saved.nose_index,
                saved.mouth_index,
                saved.hair_style,
                saved.hair_color,
                saved.clothes_style,
                saved.clothes_color,
                saved.facial_hair_style,
                saved.glasses_style,
                saved.headwear_style,
                saved.headwear_color,
                saved.neckwear_style,
                saved.neckwear_color,
                saved.extras_style,
                saved.extras_color,
                saved.updated_at,
                saved.id,
            ],
        )
        .map_err(DatabaseError::Sqlite)?;
        debug!("Updated avatar configuration {}", saved.id);
    }

    Ok(saved)
}

/// Resolves the profile's avatar: profile, then its avatar id, then the row.
///
/// `None` if there is no profile, it has no avatar, or the id is dangling.
pub fn get_user_avatar(conn: &Connection) -> AppResult<Option<AvatarConfiguration>> {
    let Some(profile) = get_user_profile(conn)? else {
        debug!("No profile, so no avatar");
        return Ok(None);
    };
    let Some(avatar_id) = profile.avatar_config_id else {
        debug!("Profile {} has no avatar yet", profile.id);
        return Ok(None);
    };
    get_avatar_configuration(conn, avatar_id)
}
