//! Avatar and mood-sticker compositor.
//!
//! Builds layered SVG markup from an [`AvatarConfiguration`](crate::db::avatars::AvatarConfiguration)
//! and, for stickers, a [`Mood`](crate::moods::Mood). Nothing here touches the
//! database; callers in [`crate::ops::stickers`] load the configuration first.
//!
//! # Module Structure
//!
//! - `positions`: Calibrated per-style layer positions with fallbacks
//! - `assets`: Asset path templates
//! - `compose`: Layer selection, SVG rendering and data URIs

pub mod assets;
pub mod compose;
pub mod positions;

pub use self::compose::{
    avatar_layers, mood_sticker_layers, render_avatar_svg, render_mood_sticker_svg, to_data_url,
    Layer,
};
pub use self::positions::LayerPosition;
