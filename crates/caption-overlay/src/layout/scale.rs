//! Scale mapping from the offline renderer's canvas to the on-screen viewport
//!
//! Style lengths are authored against a fixed reference canvas per output
//! format. The preview multiplies every length by a single factor, the
//! smaller of the two axis ratios, so the caption never overflows the
//! viewport on the limiting axis.

use crate::config::OverlayConfig;
use caption_core::CoreError;
use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Output aspect format of the rendered video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OutputFormat {
    /// 9:16 vertical video
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "9:16", alias = "portrait"))]
    Portrait,
    /// 16:9 horizontal video
    #[cfg_attr(feature = "serde", serde(rename = "16:9", alias = "landscape"))]
    Landscape,
}

impl OutputFormat {
    /// Canvas the offline renderer draws onto for this format
    #[must_use]
    pub const fn reference(self) -> ReferenceResolution {
        match self {
            Self::Portrait => ReferenceResolution::new(720, 1280),
            Self::Landscape => ReferenceResolution::new(1280, 720),
        }
    }

    /// Aspect ratio label (`"9:16"` or `"16:9"`)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Portrait => "9:16",
            Self::Landscape => "16:9",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "9:16" | "portrait" | "vertical" => Ok(Self::Portrait),
            "16:9" | "landscape" | "horizontal" => Ok(Self::Landscape),
            _ => Err(CoreError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Pixel grid of the offline renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReferenceResolution {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
}

impl ReferenceResolution {
    /// Create a reference resolution
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// On-screen box available to the overlay, in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ViewportSize {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl ViewportSize {
    /// Not yet laid out
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a viewport size
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether both dimensions are positive and finite
    #[must_use]
    pub fn is_measured(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// `min(viewport.w / reference.w, viewport.h / reference.h)`
///
/// # Examples
///
/// ```rust
/// use caption_overlay::layout::{compute_scale, ReferenceResolution, ViewportSize};
///
/// let scale = compute_scale(ReferenceResolution::new(1280, 720), ViewportSize::new(640.0, 400.0));
/// assert_eq!(scale, 0.5);
/// ```
#[must_use]
pub fn compute_scale(reference: ReferenceResolution, viewport: ViewportSize) -> f32 {
    if reference.width == 0 || reference.height == 0 {
        return 0.0;
    }
    let x = viewport.width / reference.width as f32;
    let y = viewport.height / reference.height as f32;
    x.min(y)
}

/// Converts reference-resolution lengths to on-screen pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleMapper {
    format: OutputFormat,
    viewport: ViewportSize,
    scale: f32,
    min_font_px: f32,
}

impl ScaleMapper {
    /// Create a mapper for `format`, falling back to the configured default
    /// viewport when `viewport` has not been measured yet
    #[must_use]
    pub fn new(format: OutputFormat, viewport: ViewportSize, config: &OverlayConfig) -> Self {
        let viewport = if viewport.is_measured() {
            viewport
        } else {
            tracing::trace!(?viewport, %format, "viewport unmeasured, using fallback");
            config.fallback_viewport(format)
        };

        Self {
            format,
            viewport,
            scale: compute_scale(format.reference(), viewport),
            min_font_px: config.min_font_px,
        }
    }

    /// Output format
    #[must_use]
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Reference canvas of the output format
    #[must_use]
    pub fn reference(&self) -> ReferenceResolution {
        self.format.reference()
    }

    /// Viewport actually used for scaling
    #[must_use]
    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    /// Scale factor
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Reference length in screen pixels
    #[must_use]
    pub fn scale_length(&self, length: f32) -> f32 {
        length * self.scale
    }

    /// Font size in screen pixels, never below the legibility floor
    #[must_use]
    pub fn scale_font(&self, size: f32) -> f32 {
        (size * self.scale).max(self.min_font_px)
    }
}
