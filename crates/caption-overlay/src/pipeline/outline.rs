//! Outline synthesis
//!
//! The offline renderer strokes text by stamping the glyph at every integer
//! offset inside a disc of radius `stroke_width`. Browsers have no equivalent
//! primitive that matches it, so the preview layers flat-colored copies of the
//! glyph at sampled points on one or two rings around the origin.
//!
//! Sample density grows with the scaled width so thick outlines stay round.
//! Above a threshold a second, inner ring fills the hollow the outer ring
//! would leave.

use crate::utils::round_tenth;
use ahash::AHashMap;
use caption_core::Rgba;
use core::f32::consts::TAU;
use std::collections::VecDeque;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Upper bound on samples per ring
pub const MAX_OUTLINE_STEPS: usize = 1024;

/// One flat-colored glyph copy behind the fill
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct OutlineOffset {
    /// Horizontal offset in screen pixels, one decimal place
    pub dx: f32,
    /// Vertical offset in screen pixels, one decimal place
    pub dy: f32,
    /// Layer color
    pub color: Rgba,
}

/// Sampling parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineParams {
    /// Samples per pixel of scaled width
    pub density: f32,
    /// Minimum samples on the outer ring
    pub min_steps: usize,
    /// Inner ring radius relative to the outer one
    pub inner_ring_ratio: f32,
    /// Scaled width above which the inner ring is added
    pub inner_ring_threshold_px: f32,
}

impl Default for OutlineParams {
    fn default() -> Self {
        Self {
            density: 4.0,
            min_steps: 8,
            inner_ring_ratio: 0.6,
            inner_ring_threshold_px: 1.0,
        }
    }
}

/// Synthesize outline layers with the default sampling parameters
///
/// # Examples
///
/// ```rust
/// use caption_core::Rgba;
/// use caption_overlay::synthesize_outline;
///
/// assert!(synthesize_outline(0.0, 1.0, Rgba::BLACK).is_empty());
/// let layers = synthesize_outline(3.0, 1.0, Rgba::BLACK);
/// assert_eq!(layers.len(), 12 + 6);
/// ```
#[must_use]
pub fn synthesize_outline(stroke_width: f32, scale: f32, color: Rgba) -> Vec<OutlineOffset> {
    synthesize_outline_with(&OutlineParams::default(), stroke_width, scale, color)
}

/// Synthesize outline layers
///
/// Returns an empty list when the scaled width is not positive. Negative
/// stroke widths count as zero. Rings never exceed [`MAX_OUTLINE_STEPS`]
/// samples.
#[must_use]
pub fn synthesize_outline_with(
    params: &OutlineParams,
    stroke_width: f32,
    scale: f32,
    color: Rgba,
) -> Vec<OutlineOffset> {
    let scaled = stroke_width.max(0.0) * scale;
    if !(scaled > 0.0 && scaled.is_finite()) {
        return Vec::new();
    }

    let wanted = (scaled * params.density.max(0.0)).ceil() as usize;
    let steps = params.min_steps.max(wanted).clamp(1, MAX_OUTLINE_STEPS);
    let inner = scaled > params.inner_ring_threshold_px;
    let mut layers = Vec::with_capacity(if inner { steps + steps / 2 } else { steps });

    push_ring(&mut layers, scaled, steps, color);
    if inner {
        push_ring(&mut layers, scaled * params.inner_ring_ratio, steps / 2, color);
    }
    layers
}

fn push_ring(layers: &mut Vec<OutlineOffset>, radius: f32, steps: usize, color: Rgba) {
    for i in 0..steps {
        let angle = TAU * i as f32 / steps as f32;
        layers.push(OutlineOffset {
            dx: round_tenth(angle.cos() * radius),
            dy: round_tenth(angle.sin() * radius),
            color,
        });
    }
}

/// Render layers as a CSS `text-shadow` value
///
/// ```rust
/// use caption_core::Rgba;
/// use caption_overlay::pipeline::{to_text_shadow, OutlineOffset};
///
/// let css = to_text_shadow(&[OutlineOffset { dx: 1.5, dy: 0.0, color: Rgba::BLACK }]);
/// assert_eq!(css, "1.5px 0px 0 rgb(0, 0, 0)");
/// ```
#[must_use]
pub fn to_text_shadow(layers: &[OutlineOffset]) -> String {
    layers
        .iter()
        .map(|layer| format!("{}px {}px 0 {}", layer.dx, layer.dy, layer.color.to_css()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Cache key; floats are keyed by bit pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct OutlineKey {
    stroke_width: u32,
    scale: u32,
    color: Rgba,
}

impl OutlineKey {
    fn new(stroke_width: f32, scale: f32, color: Rgba) -> Self {
        Self {
            stroke_width: stroke_width.to_bits(),
            scale: scale.to_bits(),
            color,
        }
    }
}

/// Cache statistics for monitoring
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OutlineCacheStats {
    /// Lookups answered from the cache
    pub hits: usize,
    /// Lookups that synthesized new layers
    pub misses: usize,
    /// Entries dropped to stay within capacity
    pub evictions: usize,
}

/// Memoized outline layers keyed on stroke width, scale and color
///
/// Evicts the oldest entry once `capacity` is reached.
#[derive(Debug)]
pub struct OutlineCache {
    params: OutlineParams,
    entries: AHashMap<OutlineKey, Arc<[OutlineOffset]>>,
    order: VecDeque<OutlineKey>,
    capacity: usize,
    stats: OutlineCacheStats,
}

impl OutlineCache {
    /// Create a cache using the default sampling parameters
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::with_params(OutlineParams::default(), capacity)
    }

    /// Create a cache using custom sampling parameters
    #[must_use]
    pub fn with_params(params: OutlineParams, capacity: usize) -> Self {
        Self {
            params,
            entries: AHashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
            stats: OutlineCacheStats::default(),
        }
    }

    /// Layers for the given inputs, synthesizing them on a miss
    pub fn get_or_synthesize(
        &mut self,
        stroke_width: f32,
        scale: f32,
        color: Rgba,
    ) -> Arc<[OutlineOffset]> {
        let key = OutlineKey::new(stroke_width, scale, color);
        if let Some(layers) = self.entries.get(&key) {
            self.stats.hits += 1;
            return Arc::clone(layers);
        }

        self.stats.misses += 1;
        let layers: Arc<[OutlineOffset]> =
            synthesize_outline_with(&self.params, stroke_width, scale, color).into();

        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
                self.stats.evictions += 1;
            }
        }
        self.entries.insert(key, Arc::clone(&layers));
        self.order.push_back(key);
        layers
    }

    /// Sampling parameters in use
    #[must_use]
    pub fn params(&self) -> &OutlineParams {
        &self.params
    }

    /// Cache statistics
    #[must_use]
    pub fn stats(&self) -> OutlineCacheStats {
        self.stats
    }

    /// Number of cached entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn radius_sq(layer: &OutlineOffset) -> f32 {
        layer.dx * layer.dx + layer.dy * layer.dy
    }

    #[test]
    fn zero_and_negative_widths_have_no_outline() {
        assert!(synthesize_outline(0.0, 1.0, Rgba::BLACK).is_empty());
        assert!(synthesize_outline(-2.0, 1.0, Rgba::BLACK).is_empty());
        assert!(synthesize_outline(3.0, 0.0, Rgba::BLACK).is_empty());
        assert!(synthesize_outline(f32::NAN, 1.0, Rgba::BLACK).is_empty());
    }

    #[test]
    fn oversized_params_are_capped() {
        let params = OutlineParams {
            min_steps: usize::MAX,
            ..OutlineParams::default()
        };
        let layers = synthesize_outline_with(&params, 3.0, 1.0, Rgba::BLACK);
        assert_eq!(layers.len(), MAX_OUTLINE_STEPS + MAX_OUTLINE_STEPS / 2);

        let dense = OutlineParams {
            density: f32::MAX,
            ..OutlineParams::default()
        };
        assert_eq!(
            synthesize_outline_with(&dense, 0.5, 1.0, Rgba::BLACK).len(),
            MAX_OUTLINE_STEPS
        );

        let width = synthesize_outline(1.0e30, 1.0, Rgba::BLACK);
        assert_eq!(width.len(), MAX_OUTLINE_STEPS + MAX_OUTLINE_STEPS / 2);
    }

    #[test]
    fn thin_strokes_use_minimum_steps_without_inner_ring() {
        let layers = synthesize_outline(1.0, 0.5, Rgba::BLACK);
        assert_eq!(layers.len(), 8);
        assert!(layers.iter().all(|l| (radius_sq(l) - 0.25).abs() < 0.1));
    }

    #[test]
    fn outer_ring_sits_on_stroke_radius() {
        let layers = synthesize_outline(3.0, 1.0, Rgba::BLACK);
        let outer = &layers[..12];
        assert!(outer.iter().all(|l| (radius_sq(l) - 9.0).abs() < 0.5));
        assert_eq!(outer[0], OutlineOffset { dx: 3.0, dy: 0.0, color: Rgba::BLACK });
        assert_eq!(outer[3].dx, 0.0);
        assert_eq!(outer[3].dy, 3.0);
    }

    #[test]
    fn thick_strokes_add_inner_ring() {
        let layers = synthesize_outline(5.0, 1.0, Rgba::BLACK);
        assert_eq!(layers.len(), 20 + 10);
        assert!(layers[20..].iter().all(|l| (radius_sq(l) - 9.0).abs() < 0.5));
    }

    #[test]
    fn text_shadow_lists_every_layer() {
        let layers = synthesize_outline(1.0, 1.0, Rgba::rgb(255, 0, 0));
        let css = to_text_shadow(&layers);
        assert_eq!(css.matches("px 0 rgb(255, 0, 0)").count(), 8);
        assert!(css.starts_with("1px 0px 0 "));
        assert!(!css.contains("-0px"));
    }

    #[test]
    fn cache_hits_and_evicts_oldest() {
        let mut cache = OutlineCache::new(2);
        let first = cache.get_or_synthesize(3.0, 1.0, Rgba::BLACK);
        let again = cache.get_or_synthesize(3.0, 1.0, Rgba::BLACK);
        assert!(Arc::ptr_eq(&first, &again));

        cache.get_or_synthesize(3.0, 0.5, Rgba::BLACK);
        cache.get_or_synthesize(3.0, 0.25, Rgba::BLACK);
        assert_eq!(cache.len(), 2);
        assert_eq!(
            cache.stats(),
            OutlineCacheStats { hits: 1, misses: 3, evictions: 1 }
        );

        let rebuilt = cache.get_or_synthesize(3.0, 1.0, Rgba::BLACK);
        assert!(!Arc::ptr_eq(&first, &rebuilt));
        assert_eq!(first, rebuilt);
    }
}
