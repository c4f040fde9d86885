//! Fully resolved styling descriptor and its enumerations
//!
//! All lengths are in reference-resolution pixels, the grid the offline
//! renderer draws onto. Conversion to screen pixels happens in the overlay
//! engine by multiplying with a single scale factor.

use crate::utils::color::Rgba;
use crate::utils::CoreError;
use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Font weight of caption text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(rename_all = "lowercase"))]
pub enum FontWeight {
    /// Regular weight (400)
    Normal,
    /// Bold weight (700)
    #[default]
    Bold,
    /// Heaviest weight (900)
    Black,
}

impl FontWeight {
    /// Numeric CSS weight
    #[must_use]
    pub const fn css_weight(self) -> u16 {
        match self {
            Self::Normal => 400,
            Self::Bold => 700,
            Self::Black => 900,
        }
    }
}

impl FromStr for FontWeight {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" | "regular" | "400" => Ok(Self::Normal),
            "bold" | "700" => Ok(Self::Bold),
            "black" | "heavy" | "900" => Ok(Self::Black),
            other => Err(CoreError::InvalidNumeric(format!("unknown font weight '{other}'"))),
        }
    }
}

/// Vertical anchor of the caption block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(rename_all = "lowercase"))]
pub enum VerticalPosition {
    /// Anchored to the top edge, offset by the vertical margin
    Top,
    /// Vertically centered, margin ignored
    Middle,
    /// Anchored to the bottom edge, offset by the vertical margin
    #[default]
    Bottom,
}

impl FromStr for VerticalPosition {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "middle" | "center" => Ok(Self::Middle),
            "bottom" => Ok(Self::Bottom),
            other => Err(CoreError::InvalidNumeric(format!("unknown position '{other}'"))),
        }
    }
}

/// Horizontal alignment of lines inside the caption block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(rename_all = "lowercase"))]
pub enum TextAlign {
    /// Left aligned
    Left,
    /// Centered
    #[default]
    Center,
    /// Right aligned
    Right,
}

impl TextAlign {
    /// CSS `text-align` keyword
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

impl FromStr for TextAlign {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" | "centre" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            other => Err(CoreError::InvalidNumeric(format!("unknown alignment '{other}'"))),
        }
    }
}

/// Entrance/exit animation applied to each caption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(rename_all = "lowercase"))]
pub enum AnimationMode {
    /// Static caption
    #[default]
    None,
    /// Opacity ramps in and out
    Fade,
    /// Scale pops in from 10%
    Pop,
    /// Characters are revealed with progress
    Typewriter,
}

impl FromStr for AnimationMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "fade" | "fade_in_out" => Ok(Self::Fade),
            "pop" => Ok(Self::Pop),
            "typewriter" => Ok(Self::Typewriter),
            other => Err(CoreError::InvalidNumeric(format!("unknown animation '{other}'"))),
        }
    }
}

macro_rules! impl_display_via_debug_lowercase {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    let name = format!("{self:?}");
                    f.write_str(&name.to_ascii_lowercase())
                }
            }
        )*
    };
}

impl_display_via_debug_lowercase!(FontWeight, VerticalPosition, TextAlign, AnimationMode);

/// Highlight sub-descriptor for markup and active-word spans
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct HighlightStyle {
    pub(crate) font_color: Rgba,
    pub(crate) background_color: Rgba,
    pub(crate) background_padding: f32,
    pub(crate) background_radius: f32,
    pub(crate) active_word: bool,
}

impl HighlightStyle {
    /// Fill color of highlighted text
    #[must_use]
    pub fn font_color(&self) -> Rgba {
        self.font_color
    }

    /// Background box color behind highlighted text
    #[must_use]
    pub fn background_color(&self) -> Rgba {
        self.background_color
    }

    /// Background box padding in reference pixels
    #[must_use]
    pub fn background_padding(&self) -> f32 {
        self.background_padding
    }

    /// Background box corner radius in reference pixels
    #[must_use]
    pub fn background_radius(&self) -> f32 {
        self.background_radius
    }

    /// Whether the active word follows playback progress (karaoke mode)
    #[must_use]
    pub fn active_word(&self) -> bool {
        self.active_word
    }
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            font_color: Rgba::WHITE,
            background_color: Rgba::rgb(0x6e, 0x00, 0xff),
            background_padding: 8.0,
            background_radius: 8.0,
            active_word: false,
        }
    }
}

/// Fully populated, validated caption style
///
/// Only obtainable through [`Default`] or [`crate::resolve_styling`], and
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct StylingDescriptor {
    pub(crate) font_family: String,
    pub(crate) font_size: f32,
    pub(crate) font_weight: FontWeight,
    pub(crate) font_color: Rgba,
    pub(crate) stroke_color: Rgba,
    pub(crate) stroke_width: f32,
    pub(crate) shadow_color: Rgba,
    pub(crate) shadow_offset: f32,
    pub(crate) background_enabled: bool,
    pub(crate) background_color: Rgba,
    pub(crate) background_opacity: f32,
    pub(crate) background_padding: f32,
    pub(crate) background_radius: f32,
    pub(crate) position: VerticalPosition,
    pub(crate) margin_x: f32,
    pub(crate) margin_y: f32,
    pub(crate) text_align: TextAlign,
    pub(crate) max_width_percent: f32,
    pub(crate) uppercase: bool,
    pub(crate) animation: AnimationMode,
    pub(crate) highlight: HighlightStyle,
}

impl Default for StylingDescriptor {
    fn default() -> Self {
        Self {
            font_family: "Montserrat".to_string(),
            font_size: 48.0,
            font_weight: FontWeight::Bold,
            font_color: Rgba::WHITE,
            stroke_color: Rgba::BLACK,
            stroke_width: 3.0,
            shadow_color: Rgba::BLACK,
            shadow_offset: 2.0,
            background_enabled: false,
            background_color: Rgba::BLACK,
            background_opacity: 0.7,
            background_padding: 12.0,
            background_radius: 8.0,
            position: VerticalPosition::Bottom,
            margin_x: 50.0,
            margin_y: 60.0,
            text_align: TextAlign::Center,
            max_width_percent: 90.0,
            uppercase: false,
            animation: AnimationMode::None,
            highlight: HighlightStyle::default(),
        }
    }
}

impl StylingDescriptor {
    /// Font family name
    #[must_use]
    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    /// Font size in reference pixels
    #[must_use]
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Font weight
    #[must_use]
    pub fn font_weight(&self) -> FontWeight {
        self.font_weight
    }

    /// Text fill color
    #[must_use]
    pub fn font_color(&self) -> Rgba {
        self.font_color
    }

    /// Outline color
    #[must_use]
    pub fn stroke_color(&self) -> Rgba {
        self.stroke_color
    }

    /// Outline width in reference pixels, `0` disables the outline
    #[must_use]
    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    /// Drop shadow color
    #[must_use]
    pub fn shadow_color(&self) -> Rgba {
        self.shadow_color
    }

    /// Drop shadow offset in reference pixels
    #[must_use]
    pub fn shadow_offset(&self) -> f32 {
        self.shadow_offset
    }

    /// Whether the background box is drawn
    #[must_use]
    pub fn background_enabled(&self) -> bool {
        self.background_enabled
    }

    /// Background box color, without opacity applied
    #[must_use]
    pub fn background_color(&self) -> Rgba {
        self.background_color
    }

    /// Background box opacity in `0..=1`
    #[must_use]
    pub fn background_opacity(&self) -> f32 {
        self.background_opacity
    }

    /// Background box padding in reference pixels
    #[must_use]
    pub fn background_padding(&self) -> f32 {
        self.background_padding
    }

    /// Background box corner radius in reference pixels
    #[must_use]
    pub fn background_radius(&self) -> f32 {
        self.background_radius
    }

    /// Vertical anchor
    #[must_use]
    pub fn position(&self) -> VerticalPosition {
        self.position
    }

    /// Horizontal margin in reference pixels
    #[must_use]
    pub fn margin_x(&self) -> f32 {
        self.margin_x
    }

    /// Vertical margin in reference pixels
    #[must_use]
    pub fn margin_y(&self) -> f32 {
        self.margin_y
    }

    /// Line alignment
    #[must_use]
    pub fn text_align(&self) -> TextAlign {
        self.text_align
    }

    /// Maximum caption width as a percentage of the video width
    #[must_use]
    pub fn max_width_percent(&self) -> f32 {
        self.max_width_percent
    }

    /// Whether text is rendered uppercase
    #[must_use]
    pub fn uppercase(&self) -> bool {
        self.uppercase
    }

    /// Animation mode
    #[must_use]
    pub fn animation(&self) -> AnimationMode {
        self.animation
    }

    /// Highlight sub-descriptor
    #[must_use]
    pub fn highlight(&self) -> &HighlightStyle {
        &self.highlight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_parse_leniently() {
        assert_eq!("BOLD".parse::<FontWeight>().unwrap(), FontWeight::Bold);
        assert_eq!("900".parse::<FontWeight>().unwrap(), FontWeight::Black);
        assert_eq!(" top ".parse::<VerticalPosition>().unwrap(), VerticalPosition::Top);
        assert_eq!("centre".parse::<TextAlign>().unwrap(), TextAlign::Center);
        assert_eq!("fade_in_out".parse::<AnimationMode>().unwrap(), AnimationMode::Fade);
        assert!("sideways".parse::<VerticalPosition>().is_err());
    }

    #[test]
    fn display_is_lowercase() {
        assert_eq!(AnimationMode::Typewriter.to_string(), "typewriter");
        assert_eq!(VerticalPosition::Middle.to_string(), "middle");
    }

    #[test]
    fn defaults_match_offline_renderer() {
        let style = StylingDescriptor::default();
        assert_eq!(style.font_size(), 48.0);
        assert_eq!(style.stroke_width(), 3.0);
        assert_eq!(style.margin_y(), 60.0);
        assert_eq!(style.highlight().background_color().to_hex(), "#6e00ff");
        assert!(!style.highlight().active_word());
    }
}
