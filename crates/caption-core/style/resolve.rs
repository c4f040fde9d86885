//! Partial style input and the single default-merge step

use super::descriptor::{HighlightStyle, StylingDescriptor};
use crate::utils::color::{parse_hex_color, Rgba};
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Style as supplied by the authoring surface, every field optional
///
/// Field names follow the stored wire format (`font_size`, `stroke_width`,
/// `highlight_bg_color`, ...). Enumerations and colors stay textual here and
/// are validated by [`resolve_styling`].
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct PartialStylingDescriptor {
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "keyword_or_number"))]
    pub font_weight: Option<String>,
    pub font_color: Option<String>,
    pub stroke_color: Option<String>,
    pub stroke_width: Option<f32>,
    pub shadow_color: Option<String>,
    pub shadow_offset: Option<f32>,
    pub background_enabled: Option<bool>,
    pub background_color: Option<String>,
    pub background_opacity: Option<f32>,
    pub background_padding: Option<f32>,
    pub background_radius: Option<f32>,
    pub position: Option<String>,
    pub margin_x: Option<f32>,
    pub margin_y: Option<f32>,
    pub text_align: Option<String>,
    pub max_width_percent: Option<f32>,
    pub uppercase: Option<bool>,
    pub animation: Option<String>,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub highlight: PartialHighlight,
}

/// Accept a keyword (`"bold"`), a numeric string (`"700"`) or a bare number
/// (`700`); any other JSON value is treated as absent.
#[cfg(feature = "serde")]
fn keyword_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde_json::Value;

    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => number.as_f64().map(|value| value.to_string()),
        _ => None,
    })
}

/// Highlight fields of a partial style, flattened into the wire format
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct PartialHighlight {
    #[cfg_attr(feature = "serde", serde(rename = "highlight_font_color"))]
    pub font_color: Option<String>,
    #[cfg_attr(feature = "serde", serde(rename = "highlight_bg_color"))]
    pub background_color: Option<String>,
    #[cfg_attr(feature = "serde", serde(rename = "highlight_bg_padding"))]
    pub background_padding: Option<f32>,
    #[cfg_attr(feature = "serde", serde(rename = "highlight_bg_radius"))]
    pub background_radius: Option<f32>,
    #[cfg_attr(feature = "serde", serde(rename = "highlight_active_word"))]
    pub active_word: Option<bool>,
}

/// Supported range for each numeric field, in reference pixels
mod limits {
    pub const FONT_SIZE: (f32, f32) = (16.0, 120.0);
    pub const STROKE_WIDTH: (f32, f32) = (0.0, 10.0);
    pub const SHADOW_OFFSET: (f32, f32) = (0.0, 10.0);
    pub const OPACITY: (f32, f32) = (0.0, 1.0);
    pub const PADDING: (f32, f32) = (0.0, 50.0);
    pub const RADIUS: (f32, f32) = (0.0, 30.0);
    pub const MARGIN_X: (f32, f32) = (0.0, 200.0);
    pub const MARGIN_Y: (f32, f32) = (0.0, 300.0);
    pub const MAX_WIDTH_PERCENT: (f32, f32) = (50.0, 100.0);
}

/// Merge a partial style over the defaults and validate every field.
///
/// Never fails: absent fields take their default, out-of-range numbers are
/// clamped, and unparsable colors or keywords fall back to the default value.
///
/// # Examples
///
/// ```rust
/// use caption_core::{resolve_styling, PartialStylingDescriptor, VerticalPosition};
///
/// let style = resolve_styling(&PartialStylingDescriptor {
///     stroke_width: Some(-4.0),
///     position: Some("top".into()),
///     ..Default::default()
/// });
/// assert_eq!(style.stroke_width(), 0.0);
/// assert_eq!(style.position(), VerticalPosition::Top);
/// ```
#[must_use]
pub fn resolve_styling(partial: &PartialStylingDescriptor) -> StylingDescriptor {
    let defaults = StylingDescriptor::default();

    let font_family = partial
        .font_family
        .as_deref()
        .map(str::trim)
        .filter(|family| !family.is_empty())
        .map_or(defaults.font_family, ToString::to_string);

    StylingDescriptor {
        font_family,
        font_size: number("font_size", partial.font_size, defaults.font_size, limits::FONT_SIZE),
        font_weight: keyword("font_weight", partial.font_weight.as_deref(), defaults.font_weight),
        font_color: color("font_color", partial.font_color.as_deref(), defaults.font_color),
        stroke_color: color("stroke_color", partial.stroke_color.as_deref(), defaults.stroke_color),
        stroke_width: number(
            "stroke_width",
            partial.stroke_width,
            defaults.stroke_width,
            limits::STROKE_WIDTH,
        ),
        shadow_color: color("shadow_color", partial.shadow_color.as_deref(), defaults.shadow_color),
        shadow_offset: number(
            "shadow_offset",
            partial.shadow_offset,
            defaults.shadow_offset,
            limits::SHADOW_OFFSET,
        ),
        background_enabled: partial.background_enabled.unwrap_or(defaults.background_enabled),
        background_color: color(
            "background_color",
            partial.background_color.as_deref(),
            defaults.background_color,
        ),
        background_opacity: number(
            "background_opacity",
            partial.background_opacity,
            defaults.background_opacity,
            limits::OPACITY,
        ),
        background_padding: number(
            "background_padding",
            partial.background_padding,
            defaults.background_padding,
            limits::PADDING,
        ),
        background_radius: number(
            "background_radius",
            partial.background_radius,
            defaults.background_radius,
            limits::RADIUS,
        ),
        position: keyword("position", partial.position.as_deref(), defaults.position),
        margin_x: number("margin_x", partial.margin_x, defaults.margin_x, limits::MARGIN_X),
        margin_y: number("margin_y", partial.margin_y, defaults.margin_y, limits::MARGIN_Y),
        text_align: keyword("text_align", partial.text_align.as_deref(), defaults.text_align),
        max_width_percent: number(
            "max_width_percent",
            partial.max_width_percent,
            defaults.max_width_percent,
            limits::MAX_WIDTH_PERCENT,
        ),
        uppercase: partial.uppercase.unwrap_or(defaults.uppercase),
        animation: keyword("animation", partial.animation.as_deref(), defaults.animation),
        highlight: resolve_highlight(&partial.highlight, defaults.highlight),
    }
}

fn resolve_highlight(partial: &PartialHighlight, defaults: HighlightStyle) -> HighlightStyle {
    HighlightStyle {
        font_color: color(
            "highlight_font_color",
            partial.font_color.as_deref(),
            defaults.font_color,
        ),
        background_color: color(
            "highlight_bg_color",
            partial.background_color.as_deref(),
            defaults.background_color,
        ),
        background_padding: number(
            "highlight_bg_padding",
            partial.background_padding,
            defaults.background_padding,
            limits::PADDING,
        ),
        background_radius: number(
            "highlight_bg_radius",
            partial.background_radius,
            defaults.background_radius,
            limits::RADIUS,
        ),
        active_word: partial.active_word.unwrap_or(defaults.active_word),
    }
}

fn number(field: &'static str, value: Option<f32>, default: f32, (min, max): (f32, f32)) -> f32 {
    match value {
        None => default,
        Some(v) if v.is_nan() => {
            tracing::debug!(field, "NaN style value, using default");
            default
        }
        Some(v) => {
            let clamped = v.clamp(min, max);
            if clamped != v {
                tracing::debug!(field, value = v, clamped, "style value out of range");
            }
            clamped
        }
    }
}

fn color(field: &'static str, value: Option<&str>, default: Rgba) -> Rgba {
    value.map_or(default, |raw| {
        parse_hex_color(raw).unwrap_or_else(|err| {
            tracing::debug!(field, %err, "invalid style color, using default");
            default
        })
    })
}

fn keyword<T: FromStr + Copy>(field: &'static str, value: Option<&str>, default: T) -> T {
    value.map_or(default, |raw| {
        raw.parse().unwrap_or_else(|_| {
            tracing::debug!(field, value = raw, "unknown style keyword, using default");
            default
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{AnimationMode, FontWeight, TextAlign, VerticalPosition};

    #[test]
    fn empty_partial_resolves_to_defaults() {
        assert_eq!(
            resolve_styling(&PartialStylingDescriptor::default()),
            StylingDescriptor::default()
        );
    }

    #[test]
    fn provided_fields_override_defaults() {
        let style = resolve_styling(&PartialStylingDescriptor {
            font_family: Some("Inter".into()),
            font_weight: Some("black".into()),
            font_color: Some("#ff0000".into()),
            text_align: Some("left".into()),
            animation: Some("pop".into()),
            uppercase: Some(true),
            highlight: PartialHighlight {
                active_word: Some(true),
                background_padding: Some(4.0),
                ..Default::default()
            },
            ..Default::default()
        });
        assert_eq!(style.font_family(), "Inter");
        assert_eq!(style.font_weight(), FontWeight::Black);
        assert_eq!(style.font_color(), Rgba::rgb(255, 0, 0));
        assert_eq!(style.text_align(), TextAlign::Left);
        assert_eq!(style.animation(), AnimationMode::Pop);
        assert!(style.uppercase());
        assert!(style.highlight().active_word());
        assert_eq!(style.highlight().background_padding(), 4.0);
        assert_eq!(style.highlight().background_radius(), 8.0);
    }

    #[test]
    fn invalid_values_fall_back_or_clamp() {
        let style = resolve_styling(&PartialStylingDescriptor {
            font_family: Some("   ".into()),
            font_size: Some(500.0),
            stroke_width: Some(f32::NAN),
            stroke_color: Some("not-a-color".into()),
            background_opacity: Some(-1.0),
            position: Some("diagonal".into()),
            max_width_percent: Some(10.0),
            ..Default::default()
        });
        assert_eq!(style.font_family(), "Montserrat");
        assert_eq!(style.font_size(), 120.0);
        assert_eq!(style.stroke_width(), 3.0);
        assert_eq!(style.stroke_color(), Rgba::BLACK);
        assert_eq!(style.background_opacity(), 0.0);
        assert_eq!(style.position(), VerticalPosition::Bottom);
        assert_eq!(style.max_width_percent(), 50.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn wire_format_uses_flat_highlight_keys() {
        let json = r##"{
            "font_size": 64,
            "position": "top",
            "highlight_bg_color": "#00ff00",
            "highlight_active_word": true,
            "some_future_field": 1
        }"##;
        let partial: PartialStylingDescriptor = serde_json::from_str(json).unwrap();
        let style = resolve_styling(&partial);
        assert_eq!(style.font_size(), 64.0);
        assert_eq!(style.position(), VerticalPosition::Top);
        assert_eq!(style.highlight().background_color(), Rgba::rgb(0, 255, 0));
        assert!(style.highlight().active_word());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn font_weight_accepts_numbers_and_keywords() {
        let weight = |json: &str| {
            let partial: PartialStylingDescriptor = serde_json::from_str(json).unwrap();
            resolve_styling(&partial).font_weight()
        };
        assert_eq!(weight(r#"{"font_weight": 400}"#), FontWeight::Normal);
        assert_eq!(weight(r#"{"font_weight": 900.0}"#), FontWeight::Black);
        assert_eq!(weight(r#"{"font_weight": "700"}"#), FontWeight::Bold);
        assert_eq!(weight(r#"{"font_weight": "black"}"#), FontWeight::Black);
        assert_eq!(weight(r#"{"font_weight": 550}"#), FontWeight::Bold);
        assert_eq!(weight(r#"{"font_weight": true}"#), FontWeight::Bold);
        assert_eq!(weight(r#"{"font_weight": null}"#), FontWeight::Bold);
    }
}
