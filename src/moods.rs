//! The canonical mood set.
//!
//! Every entry carries one primary mood and up to two secondary moods, all
//! drawn from these eight keys. The keys double as directory names for the
//! mood-specific expression assets used by the sticker compositor.

use crate::errors::ValidationError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Glyph shown for a mood key that is not in the canonical set.
pub const UNKNOWN_MOOD_EMOJI: &str = "❓";
/// Label shown for a mood key that is not in the canonical set.
pub const UNKNOWN_MOOD_LABEL: &str = "Unknown";

/// One of the eight canonical moods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Excited,
    Anxious,
    Calm,
    Angry,
    Tired,
    Grateful,
}

impl Mood {
    /// All moods in their canonical display order.
    pub const ALL: [Mood; 8] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Excited,
        Mood::Anxious,
        Mood::Calm,
        Mood::Angry,
        Mood::Tired,
        Mood::Grateful,
    ];

    /// Storage and asset key.
    pub fn key(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Excited => "excited",
            Mood::Anxious => "anxious",
            Mood::Calm => "calm",
            Mood::Angry => "angry",
            Mood::Tired => "tired",
            Mood::Grateful => "grateful",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Mood::Happy => "😊",
            Mood::Sad => "😢",
            Mood::Excited => "🤩",
            Mood::Anxious => "😰",
            Mood::Calm => "😌",
            Mood::Angry => "😠",
            Mood::Tired => "😴",
            Mood::Grateful => "🙏",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Sad => "Sad",
            Mood::Excited => "Excited",
            Mood::Anxious => "Anxious",
            Mood::Calm => "Calm",
            Mood::Angry => "Angry",
            Mood::Tired => "Tired",
            Mood::Grateful => "Grateful",
        }
    }

    /// Looks up a mood by its exact (case-sensitive) key.
    pub fn from_key(key: &str) -> Option<Mood> {
        Mood::ALL.into_iter().find(|m| m.key() == key)
    }

    /// True if `key` is one of the canonical mood keys.
    pub fn is_valid(key: &str) -> bool {
        Mood::from_key(key).is_some()
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Mood {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::from_key(s).ok_or_else(|| ValidationError::InvalidMood(s.to_string()))
    }
}

/// Glyph for any mood key, falling back to [`UNKNOWN_MOOD_EMOJI`].
pub fn emoji_for(key: &str) -> &'static str {
    Mood::from_key(key).map_or(UNKNOWN_MOOD_EMOJI, |m| m.emoji())
}

/// Label for any mood key, falling back to [`UNKNOWN_MOOD_LABEL`].
pub fn label_for(key: &str) -> &'static str {
    Mood::from_key(key).map_or(UNKNOWN_MOOD_LABEL, |m| m.label())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_keys_round_trip() {
        for mood in Mood::ALL {
            assert_eq!(Mood::from_key(mood.key()), Some(mood));
        }
        assert_eq!(Mood::ALL.len(), 8);
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        assert!(Mood::is_valid("happy"));
        assert!(!Mood::is_valid("Happy"));
        assert!(!Mood::is_valid(""));
        assert!(!Mood::is_valid("meh"));
    }

    #[test]
    fn test_unknown_fallbacks() {
        assert_eq!(emoji_for("grateful"), "🙏");
        assert_eq!(label_for("calm"), "Calm");
        assert_eq!(emoji_for("bored"), UNKNOWN_MOOD_EMOJI);
        assert_eq!(label_for("bored"), UNKNOWN_MOOD_LABEL);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("tired".parse::<Mood>().unwrap(), Mood::Tired);
        assert!("TIRED".parse::<Mood>().is_err());
    }
}
