//! Asset path templates for avatar and sticker layers.

/// Feature parts addressed by a 1-based index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexedPart {
    Base,
    Eyes,
    Nose,
    Mouth,
}

impl IndexedPart {
    fn dir(&self) -> &'static str {
        match self {
            IndexedPart::Base => "base",
            IndexedPart::Eyes => "eyes",
            IndexedPart::Nose => "nose",
            IndexedPart::Mouth => "mouth",
        }
    }
}

/// Mood-specific expression parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionPart {
    Eyes,
    Nose,
    Mouth,
}

impl ExpressionPart {
    fn file(&self) -> &'static str {
        match self {
            ExpressionPart::Eyes => "eyes",
            ExpressionPart::Nose => "nose",
            ExpressionPart::Mouth => "mouth",
        }
    }
}

/// `/assets/avatar/{gender}/{part}/{part}{NN}.png`
pub fn indexed_part_path(gender: &str, part: IndexedPart, index: u32) -> String {
    let dir = part.dir();
    format!("/assets/avatar/{gender}/{dir}/{dir}{index:02}.png")
}

pub fn hair_path(gender: &str, style: &str, color: &str) -> String {
    format!("/assets/avatar/{gender}/hair/{style}-{color}.png")
}

pub fn clothes_path(gender: &str, style: &str, color: &str) -> String {
    format!("/assets/avatar/{gender}/clothes/{style}-{color}.png")
}

pub fn facial_hair_path(gender: &str, style: &str) -> String {
    format!("/assets/avatar/{gender}/facialhair/{style}.png")
}

pub fn glasses_path(style: &str) -> String {
    format!("/assets/avatar/accessories/glasses/{style}.png")
}

/// Headwear color is optional; `"default"` stands in when absent.
pub fn headwear_path(style: &str, color: Option<&str>) -> String {
    let color = color.unwrap_or("default");
    format!("/assets/avatar/accessories/headwear/{style}-{color}.png")
}

pub fn neckwear_path(style: &str, color: &str) -> String {
    format!("/assets/avatar/accessories/neckwear/{style}-{color}.png")
}

pub fn extras_path(style: &str, color: &str) -> String {
    format!("/assets/avatar/accessories/extras/{style}-{color}.png")
}

/// Head-only base used by mood stickers.
pub fn just_head_base_path(gender: &str, index: u32) -> String {
    format!("/assets/avatar/{gender}/justheadbase/justheadbase{index:02}.png")
}

pub fn expression_path(mood: &str, part: ExpressionPart) -> String {
    format!("/assets/avatar/expressions/{}/{}.png", mood, part.file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexed_paths_are_zero_padded() {
        assert_eq!(
            indexed_part_path("female", IndexedPart::Eyes, 3),
            "/assets/avatar/female/eyes/eyes03.png"
        );
        assert_eq!(
            indexed_part_path("male", IndexedPart::Base, 12),
            "/assets/avatar/male/base/base12.png"
        );
        assert_eq!(
            just_head_base_path("male", 1),
            "/assets/avatar/male/justheadbase/justheadbase01.png"
        );
    }

    #[test]
    fn test_style_paths() {
        assert_eq!(
            hair_path("female", "bun", "black"),
            "/assets/avatar/female/hair/bun-black.png"
        );
        assert_eq!(
            headwear_path("hat", None),
            "/assets/avatar/accessories/headwear/hat-default.png"
        );
        assert_eq!(
            headwear_path("hat", Some("red")),
            "/assets/avatar/accessories/headwear/hat-red.png"
        );
        assert_eq!(
            expression_path("happy", ExpressionPart::Mouth),
            "/assets/avatar/expressions/happy/mouth.png"
        );
    }
}
