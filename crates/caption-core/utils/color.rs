//! Hex color parsing for styling descriptors
//!
//! The authoring surface stores colors as CSS-style hex strings. Parsing
//! accepts `#RGB`, `#RRGGBB` and `#RRGGBBAA`, with or without the leading `#`.

use super::{CoreError, Result};
use core::fmt;

/// Straight (non-premultiplied) RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel, 255 is opaque
    pub a: u8,
}

impl Rgba {
    /// Opaque white
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque black
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Create an opaque color
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color with explicit alpha
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Multiply alpha by `opacity` (clamped to `0..=1`)
    #[must_use]
    pub fn with_opacity(self, opacity: f32) -> Self {
        let opacity = if opacity.is_nan() { 1.0 } else { opacity.clamp(0.0, 1.0) };
        Self {
            a: (f32::from(self.a) * opacity).round() as u8,
            ..self
        }
    }

    /// Hex representation, `#rrggbb` when opaque and `#rrggbbaa` otherwise
    #[must_use]
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// CSS `rgba()` function notation
    #[must_use]
    pub fn to_css(&self) -> String {
        if self.a == 255 {
            format!("rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            let alpha = f32::from(self.a) / 255.0;
            format!("rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, alpha)
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl core::str::FromStr for Rgba {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        parse_hex_color(s)
    }
}

/// Parse a CSS-style hex color
///
/// # Examples
///
/// ```rust
/// use caption_core::{parse_hex_color, Rgba};
///
/// assert_eq!(parse_hex_color("#6e00ff").unwrap(), Rgba::rgb(0x6e, 0x00, 0xff));
/// assert_eq!(parse_hex_color("fff").unwrap(), Rgba::WHITE);
/// assert!(parse_hex_color("#12345").is_err());
/// ```
///
/// # Errors
///
/// Returns [`CoreError::InvalidColor`] if the string has the wrong length or
/// contains non-hex digits.
pub fn parse_hex_color(color_str: &str) -> Result<Rgba> {
    let trimmed = color_str.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);

    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CoreError::invalid_color(color_str));
    }

    let channel = |range: core::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| CoreError::invalid_color(color_str))
    };
    let short = |idx: usize| channel(idx..idx + 1).map(|v| v * 17);

    match hex.len() {
        3 => Ok(Rgba::rgb(short(0)?, short(1)?, short(2)?)),
        6 => Ok(Rgba::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        8 => Ok(Rgba::rgba(
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
            channel(6..8)?,
        )),
        _ => Err(CoreError::invalid_color(color_str)),
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Rgba {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Rgba {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_hex_color(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_colors() {
        assert_eq!(parse_hex_color("#FFFFFF").unwrap(), Rgba::WHITE);
        assert_eq!(parse_hex_color("#000").unwrap(), Rgba::BLACK);
        assert_eq!(parse_hex_color("6e00ff").unwrap(), Rgba::rgb(110, 0, 255));
        assert_eq!(
            parse_hex_color("#00000080").unwrap(),
            Rgba::rgba(0, 0, 0, 128)
        );
    }

    #[test]
    fn parse_hex_colors_invalid() {
        assert!(parse_hex_color("").is_err());
        assert!(parse_hex_color("#").is_err());
        assert!(parse_hex_color("#GGGGGG").is_err());
        assert!(parse_hex_color("#12345").is_err());
        assert!(parse_hex_color("#ééé").is_err());
    }

    #[test]
    fn opacity_scales_alpha() {
        assert_eq!(Rgba::BLACK.with_opacity(0.5).a, 128);
        assert_eq!(Rgba::BLACK.with_opacity(2.0).a, 255);
        assert_eq!(Rgba::BLACK.with_opacity(f32::NAN).a, 255);
    }

    #[test]
    fn css_notation() {
        assert_eq!(Rgba::WHITE.to_css(), "rgb(255, 255, 255)");
        assert_eq!(Rgba::rgba(0, 0, 0, 0).to_css(), "rgba(0, 0, 0, 0.000)");
        assert_eq!(Rgba::rgb(110, 0, 255).to_hex(), "#6e00ff");
    }
}
