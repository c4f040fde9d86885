//! Entrance/exit animation sampling
//!
//! Mirrors the offline renderer's clip effects: `fade` ramps opacity in and
//! out over `min(0.3s, duration / 2)`, `pop` grows from 10% to full size in
//! the first 0.2s, and `typewriter` reveals characters with progress.

use caption_core::AnimationMode;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Longest fade ramp in seconds
pub const MAX_FADE_SECONDS: f64 = 0.3;

/// Pop growth rate per second
const POP_RATE: f64 = 5.0;

/// Smallest pop scale
const POP_MIN_SCALE: f64 = 0.1;

/// Sampled animation values for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct AnimationFrame {
    /// Opacity multiplier in `0..=1`
    pub opacity: f32,
    /// Uniform scale multiplier
    pub scale: f32,
    /// Number of visible characters, `None` when everything is visible
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub reveal_chars: Option<usize>,
}

impl AnimationFrame {
    /// No animation applied
    pub const IDENTITY: Self = Self {
        opacity: 1.0,
        scale: 1.0,
        reveal_chars: None,
    };
}

impl Default for AnimationFrame {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Sample `mode` at `elapsed` seconds into a caption lasting `duration`
///
/// `progress` and `total_chars` are only used by typewriter reveal.
///
/// # Examples
///
/// ```rust
/// use caption_core::AnimationMode;
/// use caption_overlay::sample_animation;
///
/// let frame = sample_animation(AnimationMode::Fade, 0.15, 2.0, 0.075, 10);
/// assert!((frame.opacity - 0.5).abs() < 1e-6);
/// ```
#[must_use]
pub fn sample_animation(
    mode: AnimationMode,
    elapsed: f64,
    duration: f64,
    progress: f64,
    total_chars: usize,
) -> AnimationFrame {
    match mode {
        AnimationMode::None => AnimationFrame::IDENTITY,
        AnimationMode::Fade => AnimationFrame {
            opacity: fade_opacity(elapsed, duration),
            ..AnimationFrame::IDENTITY
        },
        AnimationMode::Pop => {
            let scale = if elapsed.is_finite() {
                (elapsed * POP_RATE).clamp(POP_MIN_SCALE, 1.0)
            } else {
                1.0
            };
            AnimationFrame {
                scale: scale as f32,
                ..AnimationFrame::IDENTITY
            }
        }
        AnimationMode::Typewriter => {
            let progress = if progress.is_nan() { 1.0 } else { progress.clamp(0.0, 1.0) };
            let visible = (progress * total_chars as f64).ceil() as usize;
            AnimationFrame {
                reveal_chars: Some(visible.min(total_chars)),
                ..AnimationFrame::IDENTITY
            }
        }
    }
}

fn fade_opacity(elapsed: f64, duration: f64) -> f32 {
    let ramp = MAX_FADE_SECONDS.min(duration / 2.0);
    if ramp.is_nan() || ramp <= 0.0 || !elapsed.is_finite() {
        return 1.0;
    }
    let fade_in = elapsed / ramp;
    let fade_out = (duration - elapsed) / ramp;
    fade_in.min(fade_out).clamp(0.0, 1.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_identity() {
        assert_eq!(
            sample_animation(AnimationMode::None, 0.0, 1.0, 0.0, 5),
            AnimationFrame::IDENTITY
        );
    }

    #[test]
    fn fade_ramps_at_both_ends() {
        let at = |elapsed| sample_animation(AnimationMode::Fade, elapsed, 2.0, 0.0, 0).opacity;
        assert_eq!(at(0.0), 0.0);
        assert_eq!(at(1.0), 1.0);
        assert!((at(1.85) - 0.5).abs() < 1e-6);
        assert_eq!(at(2.0), 0.0);
    }

    #[test]
    fn short_captions_fade_over_half_duration() {
        let frame = sample_animation(AnimationMode::Fade, 0.1, 0.4, 0.25, 0);
        assert!((frame.opacity - 0.5).abs() < 1e-6);
        assert_eq!(sample_animation(AnimationMode::Fade, 0.0, 0.0, 0.0, 0).opacity, 1.0);
    }

    #[test]
    fn pop_grows_then_holds() {
        let at = |elapsed| sample_animation(AnimationMode::Pop, elapsed, 2.0, 0.0, 0).scale;
        assert_eq!(at(0.0), 0.1);
        assert!((at(0.1) - 0.5).abs() < 1e-6);
        assert_eq!(at(0.5), 1.0);
    }

    #[test]
    fn typewriter_reveals_with_progress() {
        let at = |progress| {
            sample_animation(AnimationMode::Typewriter, 0.0, 1.0, progress, 10).reveal_chars
        };
        assert_eq!(at(0.0), Some(0));
        assert_eq!(at(0.25), Some(3));
        assert_eq!(at(1.0), Some(10));
        assert_eq!(at(7.0), Some(10));
    }
}
