//! Overlay engine tuning parameters
//!
//! Every field has a default that reproduces the offline renderer, so hosts
//! only override what they need. Loaded from JSON by the CLI's `--config`.

use crate::layout::{OutputFormat, ViewportSize};
use crate::pipeline::{OutlineParams, MAX_OUTLINE_STEPS};
use crate::utils::{OverlayError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest accepted `outline_density`
pub const MAX_OUTLINE_DENSITY: f32 = 64.0;

/// Configuration for the overlay engine
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct OverlayConfig {
    /// Smallest on-screen font size in pixels
    pub min_font_px: f32,
    /// Outline samples per pixel of scaled stroke width
    pub outline_density: f32,
    /// Minimum number of samples on the outer outline ring
    pub min_outline_steps: usize,
    /// Inner ring radius relative to the outer ring
    pub inner_ring_ratio: f32,
    /// Scaled stroke width above which the inner ring is added
    pub inner_ring_threshold_px: f32,
    /// Progress shown for the paused preview fallback caption
    pub paused_preview_progress: f64,
    /// Viewport used for portrait output before layout is measured
    pub fallback_portrait: ViewportSize,
    /// Viewport used for landscape output before layout is measured
    pub fallback_landscape: ViewportSize,
    /// Maximum number of memoized outline layer sets
    pub outline_cache_capacity: usize,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            min_font_px: 8.0,
            outline_density: 4.0,
            min_outline_steps: 8,
            inner_ring_ratio: 0.6,
            inner_ring_threshold_px: 1.0,
            paused_preview_progress: 0.5,
            fallback_portrait: ViewportSize::new(360.0, 640.0),
            fallback_landscape: ViewportSize::new(640.0, 360.0),
            outline_cache_capacity: 64,
        }
    }
}

impl OverlayConfig {
    /// Viewport to scale against while the real one is unmeasured
    #[must_use]
    pub fn fallback_viewport(&self, format: OutputFormat) -> ViewportSize {
        match format {
            OutputFormat::Portrait => self.fallback_portrait,
            OutputFormat::Landscape => self.fallback_landscape,
        }
    }

    /// Outline synthesis parameters
    #[must_use]
    pub fn outline_params(&self) -> OutlineParams {
        OutlineParams {
            density: self.outline_density,
            min_steps: self.min_outline_steps,
            inner_ring_ratio: self.inner_ring_ratio,
            inner_ring_threshold_px: self.inner_ring_threshold_px,
        }
    }

    /// Check that every field is usable
    pub fn validate(&self) -> Result<()> {
        if !(self.min_font_px.is_finite() && self.min_font_px >= 0.0) {
            return Err(OverlayError::invalid_config("min_font_px must be >= 0"));
        }
        if !(self.outline_density > 0.0 && self.outline_density <= MAX_OUTLINE_DENSITY) {
            return Err(OverlayError::invalid_config(format!(
                "outline_density must be within (0, {MAX_OUTLINE_DENSITY}]"
            )));
        }
        if !(1..=MAX_OUTLINE_STEPS).contains(&self.min_outline_steps) {
            return Err(OverlayError::invalid_config(format!(
                "min_outline_steps must be within 1..={MAX_OUTLINE_STEPS}"
            )));
        }
        if !(0.0..=1.0).contains(&self.inner_ring_ratio) {
            return Err(OverlayError::invalid_config("inner_ring_ratio must be within 0..=1"));
        }
        if !(0.0..=1.0).contains(&self.paused_preview_progress) {
            return Err(OverlayError::invalid_config(
                "paused_preview_progress must be within 0..=1",
            ));
        }
        for viewport in [self.fallback_portrait, self.fallback_landscape] {
            if !viewport.is_measured() {
                return Err(OverlayError::InvalidDimensions {
                    width: viewport.width,
                    height: viewport.height,
                });
            }
        }
        Ok(())
    }

    /// Parse a JSON configuration and validate it
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(caption_core::CoreError::serde)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(OverlayConfig::default().validate().is_ok());
    }

    #[test]
    fn outline_sampling_is_bounded() {
        let steps = OverlayConfig {
            min_outline_steps: usize::MAX,
            ..OverlayConfig::default()
        };
        assert!(matches!(steps.validate(), Err(OverlayError::InvalidConfig(_))));

        let density = OverlayConfig {
            outline_density: 1.0e9,
            ..OverlayConfig::default()
        };
        assert!(matches!(density.validate(), Err(OverlayError::InvalidConfig(_))));

        let edge = OverlayConfig {
            min_outline_steps: MAX_OUTLINE_STEPS,
            outline_density: MAX_OUTLINE_DENSITY,
            ..OverlayConfig::default()
        };
        assert!(edge.validate().is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_with_huge_step_count_is_rejected() {
        assert!(OverlayConfig::from_json(r#"{"min_outline_steps": 18446744073709551615}"#).is_err());
    }

    #[test]
    fn fallback_follows_format() {
        let config = OverlayConfig::default();
        assert_eq!(
            config.fallback_viewport(OutputFormat::Landscape),
            ViewportSize::new(640.0, 360.0)
        );
    }

    #[test]
    fn rejects_unusable_values() {
        let config = OverlayConfig {
            min_outline_steps: 0,
            ..OverlayConfig::default()
        };
        assert!(matches!(config.validate(), Err(OverlayError::InvalidConfig(_))));

        let config = OverlayConfig {
            fallback_portrait: ViewportSize::new(0.0, 640.0),
            ..OverlayConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(OverlayError::InvalidDimensions { .. })
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_overrides_only_given_fields() {
        let config = OverlayConfig::from_json(r#"{"min_font_px": 10, "outline_density": 2.5}"#)
            .unwrap();
        assert_eq!(config.min_font_px, 10.0);
        assert_eq!(config.outline_density, 2.5);
        assert_eq!(config.min_outline_steps, 8);

        assert!(OverlayConfig::from_json(r#"{"paused_preview_progress": 2}"#).is_err());
    }
}
