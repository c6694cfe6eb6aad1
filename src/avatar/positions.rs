//! Calibrated layer positions.
//!
//! Each table maps a style name to the `(x, y, scale)` triple that places a
//! 400×400 layer image correctly on the canvas. Unknown styles fall back to
//! one default per layer kind. Hair and clothes both fall back to the
//! clothes default; existing avatars were calibrated against that, so it
//! stays.

/// Offset and uniform scale for one layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerPosition {
    pub x: i32,
    pub y: i32,
    pub scale: f64,
}

const fn pos(x: i32, y: i32, scale: f64) -> LayerPosition {
    LayerPosition { x, y, scale }
}

/// Layer kinds that own a default position in full-avatar mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Base,
    Eyes,
    Nose,
    Mouth,
    Clothes,
    FacialHair,
    Glasses,
    Headwear,
    Neckwear,
    Extras,
}

pub fn default_position(kind: LayerKind) -> LayerPosition {
    match kind {
        LayerKind::Base => pos(0, 0, 0.30),
        LayerKind::Eyes => pos(0, -31, 0.30),
        LayerKind::Nose => pos(0, -15, 0.30),
        LayerKind::Mouth => pos(-2, 68, 0.30),
        LayerKind::Clothes => pos(0, 210, 0.30),
        LayerKind::FacialHair => pos(0, 34, 0.30),
        LayerKind::Glasses => pos(1, -25, 0.30),
        LayerKind::Headwear => pos(0, -100, 0.30),
        LayerKind::Neckwear => pos(0, 120, 0.30),
        LayerKind::Extras => pos(0, 50, 0.30),
    }
}

type Table = &'static [(&'static str, LayerPosition)];

fn lookup(table: Table, style: &str) -> Option<LayerPosition> {
    table
        .iter()
        .find(|(name, _)| *name == style)
        .map(|(_, p)| *p)
}

fn is_male(gender: &str) -> bool {
    gender == "male"
}

const HAIR_FEMALE: Table = &[
    ("bangs-short", pos(-3, -76, 0.30)),
    ("bangs", pos(-2, -22, 0.30)),
    ("medium-curl", pos(-8, -35, 0.30)),
    ("to-the-side", pos(-9, -19, 0.30)),
    ("granny-hair", pos(-1, -137, 0.30)),
    ("anime-hair", pos(-17, -30, 0.30)),
    ("side-pony", pos(-3, -40, 0.30)),
    ("pigtails", pos(-9, -119, 0.30)),
    ("bun", pos(-20, -148, 0.30)),
    ("boys-cut", pos(-4, -140, 0.30)),
];

const HAIR_MALE: Table = &[
    ("curly-short", pos(2, -167, 0.30)),
    ("straight-short", pos(4, -138, 0.30)),
    ("ceo-hair", pos(7, -143, 0.30)),
    ("flat-hair", pos(-3, -143, 0.30)),
    ("90s-hair", pos(-1, -137, 0.30)),
    ("bangs", pos(-2, -159, 0.30)),
    ("pointed-pony", pos(-1, -200, 0.30)),
    ("spiky-hair", pos(9, -170, 0.30)),
    ("dad-hair", pos(1, -145, 0.30)),
    ("edgy-hair", pos(-2, -145, 0.30)),
];

const CLOTHES_FEMALE: Table = &[
    ("off-shoulder", pos(-7, 214, 0.29)),
    ("night-dress", pos(-4, 214, 0.32)),
    ("sweater", pos(-4, 214, 0.32)),
    ("c-neck", pos(-4, 214, 0.32)),
    ("tank-top", pos(6, 214, 0.30)),
    ("v-neck-sweater", pos(-4, 214, 0.32)),
];

const CLOTHES_MALE: Table = &[
    ("uniform", pos(1, 230, 0.39)),
    ("button-up-shirt", pos(1, 230, 0.39)),
    ("sweater", pos(-3, 239, 0.40)),
    ("c-neck", pos(-3, 239, 0.40)),
    ("v-neck", pos(-3, 239, 0.40)),
    ("tank-top", pos(7, 212, 0.32)),
];

const FACIAL_HAIR: Table = &[
    ("style1", pos(-3, 31, 0.30)),
    ("style2", pos(-7, 122, 0.30)),
    ("style3", pos(4, 70, 0.30)),
    ("style4", pos(3, 105, 0.30)),
    ("style5", pos(1, 120, 0.30)),
    ("style6", pos(-3, 100, 0.30)),
    ("style7", pos(-2, 118, 0.30)),
    ("style8", pos(-2, -13, 0.30)),
    ("style9", pos(0, 40, 0.30)),
    ("style10", pos(0, 18, 0.30)),
    ("style11", pos(-2, 35, 0.30)),
    ("style12", pos(-4, 109, 0.30)),
    ("style13", pos(-1, 33, 0.30)),
    ("style14", pos(-1, 111, 0.30)),
    ("style15", pos(-1, 6, 0.29)),
    ("style16", pos(-2, 86, 0.64)),
    ("style17", pos(-2, 86, 0.34)),
    ("style18", pos(-2, 97, 0.30)),
    ("style19", pos(-2, 29, 0.30)),
    ("style20", pos(-2, 44, 0.30)),
];

const GLASSES: Table = &[("default", pos(1, -25, 0.30))];

const HEADWEAR: Table = &[
    ("hairband1", pos(-8, -150, 0.30)),
    ("hairband2", pos(-8, -150, 0.30)),
    ("basketball-cap", pos(0, -215, 0.30)),
    ("french-cap", pos(-24, -228, 0.30)),
    ("hat", pos(33, -225, 0.30)),
    ("winter-cap", pos(-3, -254, 0.30)),
    ("magician-hat", pos(-3, -254, 0.30)),
    ("sideways-baseball-cap", pos(77, -204, 0.29)),
];

const NECKWEAR: Table = &[
    ("boy-tie", pos(0, 160, 0.11)),
    ("straight-tie", pos(0, 241, 0.11)),
];

const EXTRAS: Table = &[
    ("side-bow", pos(-141, -200, 0.30)),
    ("lady-hat", pos(0, -193, 0.30)),
    ("flower", pos(-170, -66, 0.30)),
];

/// Falls back to the clothes default, not a hair-specific one.
pub fn hair_position(gender: &str, style: &str) -> LayerPosition {
    let table = if is_male(gender) { HAIR_MALE } else { HAIR_FEMALE };
    lookup(table, style).unwrap_or_else(|| default_position(LayerKind::Clothes))
}

pub fn clothes_position(gender: &str, style: &str) -> LayerPosition {
    let table = if is_male(gender) {
        CLOTHES_MALE
    } else {
        CLOTHES_FEMALE
    };
    lookup(table, style).unwrap_or_else(|| default_position(LayerKind::Clothes))
}

pub fn facial_hair_position(style: &str) -> LayerPosition {
    lookup(FACIAL_HAIR, style).unwrap_or_else(|| default_position(LayerKind::FacialHair))
}

pub fn glasses_position(style: &str) -> LayerPosition {
    lookup(GLASSES, style).unwrap_or_else(|| default_position(LayerKind::Glasses))
}

pub fn headwear_position(style: &str) -> LayerPosition {
    lookup(HEADWEAR, style).unwrap_or_else(|| default_position(LayerKind::Headwear))
}

pub fn neckwear_position(style: &str) -> LayerPosition {
    lookup(NECKWEAR, style).unwrap_or_else(|| default_position(LayerKind::Neckwear))
}

pub fn extras_position(style: &str) -> LayerPosition {
    lookup(EXTRAS, style).unwrap_or_else(|| default_position(LayerKind::Extras))
}

/// Positions for head-only mood stickers.
pub mod sticker {
    use super::{is_male, lookup, pos, LayerPosition, Table};

    /// The head base layer.
    pub const JUST_HEAD_BASE: LayerPosition = pos(0, 0, 0.75);

    /// Used when a hair style has no calibrated sticker position.
    pub const HAIR_FALLBACK: LayerPosition = pos(0, -60, 0.60);

    /// Placement of the three mood-specific expression layers.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct ExpressionPositions {
        pub eyes: LayerPosition,
        pub nose: LayerPosition,
        pub mouth: LayerPosition,
    }

    const FEMALE_EXPRESSIONS: ExpressionPositions = ExpressionPositions {
        eyes: pos(0, -20, 0.30),
        nose: pos(0, -6, 0.10),
        mouth: pos(1, 38, 0.12),
    };

    const MALE_EXPRESSIONS: ExpressionPositions = ExpressionPositions {
        eyes: pos(0, -26, 0.30),
        nose: pos(0, -12, 0.10),
        mouth: pos(1, 38, 0.12),
    };

    const HAIR_FEMALE: Table = &[
        ("medium-curl", pos(-8, -15, 0.66)),
        ("bangs", pos(1, -11, 0.61)),
        ("to-the-side", pos(-5, -11, 0.60)),
        ("boys-cut", pos(-3, -80, 0.71)),
        ("granny-hair", pos(-1, -75, 0.67)),
        ("anime-hair", pos(-9, -18, 0.66)),
        ("bangs-short", pos(-1, -42, 0.61)),
        ("side-pony", pos(-1, -24, 0.59)),
        ("pigtails", pos(-6, -74, 0.80)),
        ("bun", pos(-12, -81, 0.62)),
    ];

    const HAIR_MALE: Table = &[
        ("curly-short", pos(1, -90, 0.65)),
        ("straight-short", pos(4, -86, 0.63)),
        ("ceo-hair", pos(7, -88, 0.63)),
        ("flat-hair", pos(0, -78, 0.55)),
        ("90s-hair", pos(0, -78, 0.55)),
        ("bangs", pos(0, -91, 0.54)),
        ("pointed-pony", pos(1, -117, 0.54)),
        ("spiky-hair", pos(5, -94, 0.54)),
        ("dad-hair", pos(-2, -80, 0.53)),
        ("edgy-hair", pos(-2, -84, 0.38)),
    ];

    const FACIAL_HAIR: Table = &[
        ("style1", pos(0, 15, 0.20)),
        ("style2", pos(-5, 73, 0.20)),
        ("style3", pos(1, 40, 0.28)),
        ("style4", pos(1, 58, 0.40)),
        ("style5", pos(1, 68, 0.40)),
        ("style6", pos(0, 61, 0.43)),
        ("style7", pos(0, 66, 0.20)),
        ("style8", pos(0, -4, 0.51)),
        ("style9", pos(0, 27, 0.23)),
        ("style10", pos(0, 11, 0.23)),
        ("style11", pos(0, 19, 0.52)),
        ("style12", pos(-3, 62, 0.48)),
        ("style13", pos(-1, 20, 0.20)),
        ("style14", pos(1, 65, 0.20)),
        ("style15", pos(-2, 5, 0.49)),
        ("style16", pos(5, 45, 0.52)),
        ("style17", pos(-2, 43, 0.36)),
        ("style18", pos(-2, 57, 0.20)),
        ("style19", pos(-2, 13, 0.20)),
        ("style20", pos(-1, 18, 0.24)),
    ];

    /// Male set only for exactly `"male"`; everything else gets the female set.
    pub fn expression_positions(gender: &str) -> ExpressionPositions {
        if is_male(gender) {
            MALE_EXPRESSIONS
        } else {
            FEMALE_EXPRESSIONS
        }
    }

    pub fn hair_position(gender: &str, style: &str) -> LayerPosition {
        let table = if is_male(gender) { HAIR_MALE } else { HAIR_FEMALE };
        lookup(table, style).unwrap_or(HAIR_FALLBACK)
    }

    /// `None` for a blank or uncalibrated style; the caller skips the layer.
    pub fn facial_hair_position(style: &str) -> Option<LayerPosition> {
        if style.is_empty() {
            return None;
        }
        lookup(FACIAL_HAIR, style)
    }
}
