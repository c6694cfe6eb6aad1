//! Profile and avatar onboarding.

use crate::db::avatars::{self, AvatarConfiguration};
use crate::db::profile::{self, UserProfile};
use crate::db::settings::{self, SettingKey};
use crate::db::Database;
use crate::errors::{AppResult, ValidationError};
use tracing::{info, warn};

const GENDERS: [&str; 2] = ["male", "female"];

/// Creates or renames the singleton profile and marks onboarding complete.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyProfileName`] for a blank name, or a
/// database error.
pub fn save_profile_name(db: &Database, name: &str) -> AppResult<UserProfile> {
    let name = name.trim();
    if name.is_empty() {
        warn!("Profile name rejected: blank");
        return Err(ValidationError::EmptyProfileName.into());
    }

    let mut conn = db.get_conn()?;
    let tx = conn.transaction()?;

    let mut current = profile::get_user_profile(&tx)?.unwrap_or_else(|| UserProfile::new(""));
    current.name = name.to_string();
    let saved = profile::save_user_profile(&tx, &current)?;
    settings::set_bool_setting(&tx, SettingKey::OnboardingCompleted, true)?;
    tx.commit()?;

    info!("Saved profile {}", saved.id);
    Ok(saved)
}

/// Stores an avatar configuration and links it to the profile.
///
/// A configuration with `id == 0` replaces the profile's existing avatar
/// rather than adding a second row. The profile is created if it does not
/// exist yet. Marks the avatar step of onboarding complete.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidGender`] unless the gender is `male` or
/// `female`, or a database error.
pub fn save_avatar(db: &Database, config: &AvatarConfiguration) -> AppResult<AvatarConfiguration> {
    if !GENDERS.contains(&config.gender.as_str()) {
        warn!("Avatar rejected: gender '{}'", config.gender);
        return Err(ValidationError::InvalidGender(config.gender.clone()).into());
    }

    let mut conn = db.get_conn()?;
    let tx = conn.transaction()?;

    let mut user = profile::get_user_profile(&tx)?.unwrap_or_else(|| UserProfile::new(""));

    let mut to_save = config.clone();
    if to_save.id == 0 {
        if let Some(existing) = user.avatar_config_id {
            if let Some(stored) = avatars::get_avatar_configuration(&tx, existing)? {
                to_save.id = stored.id;
                to_save.created_at = stored.created_at;
            }
        }
    }

    let saved = avatars::save_avatar_configuration(&tx, &to_save)?;
    if user.avatar_config_id != Some(saved.id) || user.id == 0 {
        user.avatar_config_id = Some(saved.id);
        profile::save_user_profile(&tx, &user)?;
    }
    settings::set_bool_setting(&tx, SettingKey::AvatarCompleted, true)?;
    tx.commit()?;

    info!("Saved avatar configuration {}", saved.id);
    Ok(saved)
}

pub fn user_profile(db: &Database) -> AppResult<Option<UserProfile>> {
    let conn = db.get_conn()?;
    profile::get_user_profile(&conn)
}

/// The avatar linked to the profile, if both exist.
pub fn user_avatar(db: &Database) -> AppResult<Option<AvatarConfiguration>> {
    let conn = db.get_conn()?;
    avatars::get_user_avatar(&conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::open_temp_db;

    fn flag(db: &Database, key: SettingKey) -> bool {
        let conn = db.get_conn().unwrap();
        settings::get_bool_setting(&conn, key, false).unwrap()
    }

    #[test]
    fn test_save_profile_name() {
        let (db, _dir) = open_temp_db();
        assert!(user_profile(&db).unwrap().is_none());

        let err = save_profile_name(&db, "  ").unwrap_err();
        assert_eq!(err.as_validation(), Some(&ValidationError::EmptyProfileName));
        assert!(!flag(&db, SettingKey::OnboardingCompleted));

        let first = save_profile_name(&db, " Sam ").unwrap();
        let second = save_profile_name(&db, "Alex").unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(user_profile(&db).unwrap().unwrap().name, "Alex");
        assert!(flag(&db, SettingKey::OnboardingCompleted));
    }

    #[test]
    fn test_save_avatar_links_profile() {
        let (db, _dir) = open_temp_db();
        assert!(user_avatar(&db).unwrap().is_none());

        let config = AvatarConfiguration {
            gender: "male".to_string(),
            hair_style: Some("short".to_string()),
            hair_color: Some("brown".to_string()),
            ..Default::default()
        };
        let saved = save_avatar(&db, &config).unwrap();
        assert!(saved.id > 0);

        let loaded = user_avatar(&db).unwrap().unwrap();
        assert_eq!(loaded.id, saved.id);
        assert_eq!(loaded.hair_style.as_deref(), Some("short"));
        assert_eq!(
            user_profile(&db).unwrap().unwrap().avatar_config_id,
            Some(saved.id)
        );
        assert!(flag(&db, SettingKey::AvatarCompleted));
    }

    #[test]
    fn test_save_avatar_replaces_existing() {
        let (db, _dir) = open_temp_db();
        save_profile_name(&db, "Sam").unwrap();

        let first = save_avatar(&db, &AvatarConfiguration::default()).unwrap();
        let second = save_avatar(
            &db,
            &AvatarConfiguration {
                eyes_index: 3,
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(user_avatar(&db).unwrap().unwrap().eyes_index, 3);
        assert_eq!(user_profile(&db).unwrap().unwrap().name, "Sam");
    }

    #[test]
    fn test_save_avatar_rejects_gender() {
        let (db, _dir) = open_temp_db();
        let config = AvatarConfiguration {
            gender: "Male".to_string(),
            ..Default::default()
        };
        assert_eq!(
            save_avatar(&db, &config).unwrap_err().as_validation(),
            Some(&ValidationError::InvalidGender("Male".to_string()))
        );
        assert!(!flag(&db, SettingKey::AvatarCompleted));
    }
}
