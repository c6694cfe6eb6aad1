//! Layered SVG composition.
//!
//! Every layer image is a 400×400 square drawn at `(-200, -200)` so its
//! centre sits on the group origin, then moved with
//! `translate(x, y) scale(s)`. The requested width and height only change
//! the outer `<svg>` size; the internal coordinate space is fixed per canvas.
//! Output is a pure function of the configuration and mood.

use super::assets::{self, ExpressionPart, IndexedPart};
use super::positions::{self, sticker, LayerKind, LayerPosition};
use crate::db::avatars::AvatarConfiguration;
use crate::moods::Mood;
use base64::{engine::general_purpose, Engine as _};
use std::fmt::Write as _;

/// Side length of every layer image.
const LAYER_SIZE: u32 = 400;

/// One positioned image.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub href: String,
    pub position: LayerPosition,
}

impl Layer {
    fn new(href: String, position: LayerPosition) -> Self {
        Layer { href, position }
    }
}

/// Logical drawing surface: a square `viewBox` with the origin at its centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub view_box: u32,
}

impl Canvas {
    fn origin(&self) -> u32 {
        self.view_box / 2
    }
}

/// Head-only stickers.
pub const STICKER_CANVAS: Canvas = Canvas { view_box: 400 };
/// Full avatars; wide enough for the largest calibrated offsets.
pub const AVATAR_CANVAS: Canvas = Canvas { view_box: 640 };

/// A style value that should produce a layer: non-blank and not `"none"`.
///
/// Every optional layer uses this, including sticker hair, so `"none"` never
/// turns into an asset path such as `hair/none-black.png`.
fn configured(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != "none")
}

/// Full-avatar layers, bottom to top.
pub fn avatar_layers(config: &AvatarConfiguration) -> Vec<Layer> {
    let gender = config.gender.as_str();
    let mut layers = Vec::with_capacity(11);

    for (part, index, kind) in [
        (IndexedPart::Base, config.base_index, LayerKind::Base),
        (IndexedPart::Eyes, config.eyes_index, LayerKind::Eyes),
        (IndexedPart::Nose, config.nose_index, LayerKind::Nose),
        (IndexedPart::Mouth, config.mouth_index, LayerKind::Mouth),
    ] {
        layers.push(Layer::new(
            assets::indexed_part_path(gender, part, index),
            positions::default_position(kind),
        ));
    }

    if let (Some(style), Some(color)) = (
        configured(&config.clothes_style),
        configured(&config.clothes_color),
    ) {
        layers.push(Layer::new(
            assets::clothes_path(gender, style, color),
            positions::clothes_position(gender, style),
        ));
    }

    if let Some(style) = configured(&config.facial_hair_style) {
        layers.push(Layer::new(
            assets::facial_hair_path(gender, style),
            positions::facial_hair_position(style),
        ));
    }

    if let Some(style) = configured(&config.glasses_style) {
        layers.push(Layer::new(
            assets::glasses_path(style),
            positions::glasses_position(style),
        ));
    }

    if let Some(style) = configured(&config.headwear_style) {
        layers.push(Layer::new(
            assets::headwear_path(style, configured(&config.headwear_color)),
            positions::headwear_position(style),
        ));
    }

    if let (Some(style), Some(color)) = (
        configured(&config.neckwear_style),
        configured(&config.neckwear_color),
    ) {
        layers.push(Layer::new(
            assets::neckwear_path(style, color),
            positions::neckwear_position(style),
        ));
    }

    if let (Some(style), Some(color)) = (
        configured(&config.extras_style),
        configured(&config.extras_color),
    ) {
        layers.push(Layer::new(
            assets::extras_path(style, color),
            positions::extras_position(style),
        ));
    }

    if let (Some(style), Some(color)) = (
        configured(&config.hair_style),
        configured(&config.hair_color),
    ) {
        layers.push(Layer::new(
            assets::hair_path(gender, style, color),
            positions::hair_position(gender, style),
        ));
    }

    layers
}

/// Mood-sticker layers, bottom to top.
pub fn mood_sticker_layers(config: &AvatarConfiguration, mood: Mood) -> Vec<Layer> {
    let gender = config.gender.as_str();
    let expressions = sticker::expression_positions(gender);
    let mut layers = Vec::with_capacity(6);

    layers.push(Layer::new(
        assets::just_head_base_path(gender, config.base_index),
        sticker::JUST_HEAD_BASE,
    ));
    layers.push(Layer::new(
        assets::expression_path(mood.key(), ExpressionPart::Eyes),
        expressions.eyes,
    ));
    layers.push(Layer::new(
        assets::expression_path(mood.key(), ExpressionPart::Nose),
        expressions.nose,
    ));
    layers.push(Layer::new(
        assets::expression_path(mood.key(), ExpressionPart::Mouth),
        expressions.mouth,
    ));

    if gender == "male" {
        if let Some(style) = configured(&config.facial_hair_style) {
            if let Some(position) = sticker::facial_hair_position(style) {
                layers.push(Layer::new(assets::facial_hair_path("male", style), position));
            }
        }
    }

    if let (Some(style), Some(color)) = (
        configured(&config.hair_style),
        configured(&config.hair_color),
    ) {
        layers.push(Layer::new(
            assets::hair_path(gender, style, color),
            sticker::hair_position(gender, style),
        ));
    }

    layers
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Serializes layers in order onto `canvas`, sized to `width`×`height`.
pub fn render_svg(canvas: Canvas, layers: &[Layer], width: u32, height: u32) -> String {
    let half = LAYER_SIZE / 2;
    let mut svg = String::with_capacity(256 + layers.len() * 160);

    // Writing into a String cannot fail.
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {vb} {vb}" width="{width}" height="{height}">"#,
        vb = canvas.view_box,
    );
    let _ = writeln!(
        svg,
        r#"  <g transform="translate({o}, {o})">"#,
        o = canvas.origin()
    );
    for layer in layers {
        let p = layer.position;
        let _ = writeln!(
            svg,
            r#"    <image href="{href}" x="-{half}" y="-{half}" width="{LAYER_SIZE}" height="{LAYER_SIZE}" transform="translate({x}, {y}) scale({s:.2})" />"#,
            href = escape_attr(&layer.href),
            x = p.x,
            y = p.y,
            s = p.scale,
        );
    }
    svg.push_str("  </g>\n</svg>\n");
    svg
}

pub fn render_avatar_svg(config: &AvatarConfiguration, width: u32, height: u32) -> String {
    render_svg(AVATAR_CANVAS, &avatar_layers(config), width, height)
}

pub fn render_mood_sticker_svg(
    config: &AvatarConfiguration,
    mood: Mood,
    width: u32,
    height: u32,
) -> String {
    render_svg(
        STICKER_CANVAS,
        &mood_sticker_layers(config, mood),
        width,
        height,
    )
}

/// Wraps an SVG document as a base64 `data:` URI.
pub fn to_data_url(svg: &str) -> String {
    format!(
        "data:image/svg+xml;base64,{}",
        general_purpose::STANDARD.encode(svg.as_bytes())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn male_config() -> AvatarConfiguration {
        AvatarConfiguration {
            gender: "male".to_string(),
            base_index: 2,
            hair_style: Some("spiky-hair".to_string()),
            hair_color: Some("black".to_string()),
            facial_hair_style: Some("style4".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_sticker_layer_order() {
        let layers = mood_sticker_layers(&male_config(), Mood::Happy);
        let hrefs: Vec<&str> = layers.iter().map(|l| l.href.as_str()).collect();
        assert_eq!(
            hrefs,
            vec![
                "/assets/avatar/male/justheadbase/justheadbase02.png",
                "/assets/avatar/expressions/happy/eyes.png",
                "/assets/avatar/expressions/happy/nose.png",
                "/assets/avatar/expressions/happy/mouth.png",
                "/assets/avatar/male/facialhair/style4.png",
                "/assets/avatar/male/hair/spiky-hair-black.png",
            ]
        );
        assert_eq!(layers[1].position, sticker::expression_positions("male").eyes);
    }

    #[test]
    fn test_sticker_skips_facial_hair_for_female_and_sentinel() {
        let mut config = male_config();
        config.gender = "female".to_string();
        assert_eq!(mood_sticker_layers(&config, Mood::Sad).len(), 5);

        let mut config = male_config();
        config.facial_hair_style = Some("none".to_string());
        assert_eq!(mood_sticker_layers(&config, Mood::Sad).len(), 5);

        let mut config = male_config();
        config.facial_hair_style = Some("style77".to_string());
        assert_eq!(mood_sticker_layers(&config, Mood::Sad).len(), 5);
    }

    #[test]
    fn test_sticker_hair_needs_color() {
        let mut config = male_config();
        config.hair_color = None;
        let layers = mood_sticker_layers(&config, Mood::Calm);
        assert!(layers.iter().all(|l| !l.href.contains("/hair/")));
    }

    #[test]
    fn test_sticker_hair_none_is_absent() {
        let mut config = male_config();
        config.hair_style = Some("none".to_string());
        let layers = mood_sticker_layers(&config, Mood::Calm);
        assert_eq!(layers.len(), 5);
        assert!(layers.iter().all(|l| !l.href.contains("/hair/")));
    }

    #[test]
    fn test_avatar_layer_order() {
        let config = AvatarConfiguration {
            gender: "female".to_string(),
            hair_style: Some("bun".to_string()),
            hair_color: Some("brown".to_string()),
            clothes_style: Some("sweater".to_string()),
            clothes_color: Some("blue".to_string()),
            glasses_style: Some("default".to_string()),
            headwear_style: Some("hat".to_string()),
            neckwear_style: Some("boy-tie".to_string()),
            neckwear_color: Some("red".to_string()),
            extras_style: Some("flower".to_string()),
            extras_color: Some("pink".to_string()),
            ..Default::default()
        };
        let hrefs: Vec<String> = avatar_layers(&config).into_iter().map(|l| l.href).collect();
        assert_eq!(
            hrefs,
            vec![
                "/assets/avatar/female/base/base01.png",
                "/assets/avatar/female/eyes/eyes01.png",
                "/assets/avatar/female/nose/nose01.png",
                "/assets/avatar/female/mouth/mouth01.png",
                "/assets/avatar/female/clothes/sweater-blue.png",
                "/assets/avatar/accessories/glasses/default.png",
                "/assets/avatar/accessories/headwear/hat-default.png",
                "/assets/avatar/accessories/neckwear/boy-tie-red.png",
                "/assets/avatar/accessories/extras/flower-pink.png",
                "/assets/avatar/female/hair/bun-brown.png",
            ]
        );
    }

    #[test]
    fn test_avatar_omits_unconfigured_layers() {
        let config = AvatarConfiguration {
            clothes_style: Some("sweater".to_string()),
            neckwear_style: Some("boy-tie".to_string()),
            glasses_style: Some("".to_string()),
            ..Default::default()
        };
        assert_eq!(avatar_layers(&config).len(), 4);
    }

    #[test]
    fn test_render_transform_and_scale_format() {
        let svg = render_mood_sticker_svg(&male_config(), Mood::Happy, 80, 80);

        assert!(svg.starts_with(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 400 400" width="80" height="80">"#
        ));
        assert!(svg.contains(r#"<g transform="translate(200, 200)">"#));
        assert!(svg.contains(
            r#"<image href="/assets/avatar/male/justheadbase/justheadbase02.png" x="-200" y="-200" width="400" height="400" transform="translate(0, 0) scale(0.75)" />"#
        ));
        assert!(svg.contains(r#"transform="translate(0, -26) scale(0.30)""#));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn test_avatar_canvas() {
        let svg = render_avatar_svg(&AvatarConfiguration::default(), 200, 200);
        assert!(svg.contains(r#"viewBox="0 0 640 640" width="200" height="200""#));
        assert!(svg.contains(r#"<g transform="translate(320, 320)">"#));
    }

    #[test]
    fn test_size_only_changes_outer_dimensions() {
        let small = render_mood_sticker_svg(&male_config(), Mood::Tired, 80, 80);
        let large = render_mood_sticker_svg(&male_config(), Mood::Tired, 320, 320);
        assert_eq!(
            small.replace(r#"width="80" height="80""#, ""),
            large.replace(r#"width="320" height="320""#, "")
        );
    }

    #[test]
    fn test_href_is_escaped() {
        let config = AvatarConfiguration {
            glasses_style: Some("a\"b&c".to_string()),
            ..Default::default()
        };
        let svg = render_avatar_svg(&config, 100, 100);
        assert!(svg.contains("glasses/a&quot;b&amp;c.png"));
    }

    #[test]
    fn test_data_url() {
        let url = to_data_url("<svg/>");
        assert_eq!(url, "data:image/svg+xml;base64,PHN2Zy8+");
    }
}
