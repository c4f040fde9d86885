//! Per-frame overlay composition

use caption_core::{Rgba, StylingDescriptor, TextAlign};

use crate::animation::{sample_animation, AnimationFrame};
use crate::config::OverlayConfig;
use crate::layout::{OverlayPosition, ScaleMapper, ViewportSize};
use crate::pipeline::{
    reveal_spans, to_text_shadow, tokenize, OutlineCache, OutlineOffset, TextSpan,
};
use crate::playback::PlaybackState;
use crate::store::CaptionSnapshot;
use crate::timeline::{track_with, ActiveCaption};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Drop shadow in screen pixels
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ShadowStyle {
    /// Offset along both axes
    pub offset_px: f32,
    /// Shadow color
    pub color: Rgba,
}

/// Caption background box in screen pixels
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct BackgroundStyle {
    /// Fill with the configured opacity applied
    pub color: Rgba,
    /// Inner padding
    pub padding_px: f32,
    /// Corner radius
    pub radius_px: f32,
}

/// Caption style mapped to on-screen pixels
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ComputedStyle {
    /// Font family name
    pub font_family: String,
    /// Scaled font size, never below the configured floor
    pub font_size_px: f32,
    /// CSS numeric weight
    pub font_weight: u16,
    /// Text fill
    pub color: Rgba,
    /// Outline layers drawn behind outlined spans
    pub outline: Vec<OutlineOffset>,
    /// Drop shadow, absent for a zero offset
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub shadow: Option<ShadowStyle>,
    /// Background box, absent when disabled
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub background: Option<BackgroundStyle>,
    /// Line alignment
    pub text_align: TextAlign,
    /// Opacity from the entrance animation
    pub opacity: f32,
    /// Scale transform from the entrance animation
    pub transform_scale: f32,
}

impl ComputedStyle {
    fn from_descriptor(
        style: &StylingDescriptor,
        mapper: &ScaleMapper,
        outlines: &mut OutlineCache,
        animation: AnimationFrame,
    ) -> Self {
        let scale = mapper.scale();
        let outline = outlines
            .get_or_synthesize(style.stroke_width(), scale, style.stroke_color())
            .to_vec();

        let shadow_offset = mapper.scale_length(style.shadow_offset());
        let shadow = (shadow_offset > 0.0).then(|| ShadowStyle {
            offset_px: shadow_offset,
            color: style.shadow_color(),
        });

        let background = style.background_enabled().then(|| BackgroundStyle {
            color: style
                .background_color()
                .with_opacity(style.background_opacity()),
            padding_px: mapper.scale_length(style.background_padding()),
            radius_px: mapper.scale_length(style.background_radius()),
        });

        Self {
            font_family: style.font_family().to_string(),
            font_size_px: mapper.scale_font(style.font_size()),
            font_weight: style.font_weight().css_weight(),
            color: style.font_color(),
            outline,
            shadow,
            background,
            text_align: style.text_align(),
            opacity: animation.opacity,
            transform_scale: animation.scale,
        }
    }

    /// CSS `text-shadow` value: outline layers, then the drop shadow
    #[must_use]
    pub fn text_shadow_css(&self) -> String {
        let mut css = to_text_shadow(&self.outline);
        if let Some(shadow) = self.shadow {
            if !css.is_empty() {
                css.push_str(", ");
            }
            css.push_str(&format!(
                "{0}px {0}px 0 {1}",
                shadow.offset_px,
                shadow.color.to_css()
            ));
        }
        css
    }
}

/// The caption currently drawn over the video
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CaptionLayer {
    /// Id of the displayed entry
    pub entry_id: i64,
    /// Position of the entry in the list
    pub index: usize,
    /// Progress through the entry
    pub progress: f64,
    /// Shown as the paused preview rather than by time
    pub is_preview: bool,
    /// Screen-space style
    pub style: ComputedStyle,
    /// Text runs in display order
    pub spans: Vec<TextSpan>,
    /// Block placement
    pub position: OverlayPosition,
    /// Sampled animation values
    pub animation: AnimationFrame,
}

impl CaptionLayer {
    /// Concatenated span text
    #[must_use]
    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }
}

/// Everything the host draws for one frame
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct OverlayFrame {
    /// Active caption, `None` when nothing is shown
    pub caption: Option<CaptionLayer>,
    /// Reference-to-screen scale factor
    pub scale: f32,
    /// Viewport the frame was laid out for
    pub viewport: ViewportSize,
}

impl OverlayFrame {
    /// Whether nothing is drawn
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.caption.is_none()
    }
}

/// Compose the overlay for one frame
///
/// Pure apart from the outline cache: identical inputs give identical frames.
/// An unmeasured viewport falls back to the configured size for the format.
#[must_use]
pub fn compose_overlay(
    snapshot: &CaptionSnapshot,
    playback: PlaybackState,
    viewport: ViewportSize,
    config: &OverlayConfig,
    outlines: &mut OutlineCache,
) -> OverlayFrame {
    let mapper = ScaleMapper::new(snapshot.format, viewport, config);
    let tracker = track_with(
        &snapshot.entries,
        playback.current_time,
        playback.is_playing,
        config.paused_preview_progress,
    );

    OverlayFrame {
        caption: tracker.active.and_then(|active| {
            caption_layer(&snapshot.styling, &active, playback, &mapper, outlines)
        }),
        scale: mapper.scale(),
        viewport: mapper.viewport(),
    }
}

fn caption_layer(
    style: &StylingDescriptor,
    active: &ActiveCaption<'_>,
    playback: PlaybackState,
    mapper: &ScaleMapper,
    outlines: &mut OutlineCache,
) -> Option<CaptionLayer> {
    let spans = tokenize(
        &active.entry.text,
        style.highlight(),
        mapper.scale(),
        active.progress,
        style.uppercase(),
    );
    if spans.is_empty() {
        return None;
    }

    let animation = if active.is_preview {
        AnimationFrame::IDENTITY
    } else {
        let total_chars = spans.iter().map(TextSpan::char_count).sum();
        sample_animation(
            style.animation(),
            playback.current_time - active.start,
            active.duration(),
            active.progress,
            total_chars,
        )
    };
    let spans = match animation.reveal_chars {
        Some(visible) => reveal_spans(&spans, visible),
        None => spans,
    };

    Some(CaptionLayer {
        entry_id: active.entry.id,
        index: active.index,
        progress: active.progress,
        is_preview: active.is_preview,
        style: ComputedStyle::from_descriptor(style, mapper, outlines, animation),
        spans,
        position: OverlayPosition::compute(style, mapper),
        animation,
    })
}
