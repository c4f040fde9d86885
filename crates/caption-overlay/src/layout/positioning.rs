//! Caption block placement inside the scaled reference canvas

use super::scale::ScaleMapper;
use caption_core::{StylingDescriptor, TextAlign, VerticalPosition};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Axis-aligned rectangle in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    /// Bottom edge
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Where the caption block goes, in screen pixels
///
/// The content rectangle is the reference canvas scaled by the mapper's
/// factor and centered in the viewport. With the minimum-ratio scale it fills
/// the limiting axis exactly and is letterboxed on the other.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct OverlayPosition {
    /// Vertical anchor
    pub anchor: VerticalPosition,
    /// Line alignment inside the block
    pub text_align: TextAlign,
    /// Scaled reference canvas
    pub content: Rect,
    /// Distance from the anchored edge, `0` for middle
    pub offset_y_px: f32,
    /// Horizontal margin
    pub margin_x_px: f32,
    /// Maximum block width
    pub max_width_px: f32,
}

impl OverlayPosition {
    /// Place a caption styled with `style` using `mapper`'s scale
    #[must_use]
    pub fn compute(style: &StylingDescriptor, mapper: &ScaleMapper) -> Self {
        let viewport = mapper.viewport();
        let reference = mapper.reference();
        let width = reference.width as f32 * mapper.scale();
        let height = reference.height as f32 * mapper.scale();
        let content = Rect {
            x: (viewport.width - width) / 2.0,
            y: (viewport.height - height) / 2.0,
            width,
            height,
        };

        let offset_y_px = match style.position() {
            VerticalPosition::Middle => 0.0,
            VerticalPosition::Top | VerticalPosition::Bottom => {
                mapper.scale_length(style.margin_y())
            }
        };

        Self {
            anchor: style.position(),
            text_align: style.text_align(),
            content,
            offset_y_px,
            margin_x_px: mapper.scale_length(style.margin_x()),
            max_width_px: width * style.max_width_percent() / 100.0,
        }
    }

    /// Top-left corner for a laid-out block of the given size
    ///
    /// The block is centered horizontally and kept inside the content
    /// rectangle vertically.
    #[must_use]
    pub fn block_origin(&self, block_width: f32, block_height: f32) -> (f32, f32) {
        let x = self.content.x + (self.content.width - block_width) / 2.0;
        let y = match self.anchor {
            VerticalPosition::Top => self.content.y + self.offset_y_px,
            VerticalPosition::Middle => self.content.y + (self.content.height - block_height) / 2.0,
            VerticalPosition::Bottom => self.content.bottom() - self.offset_y_px - block_height,
        };
        let max_y = (self.content.bottom() - block_height).max(self.content.y);
        (x, y.clamp(self.content.y, max_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverlayConfig;
    use crate::layout::{OutputFormat, ViewportSize};
    use caption_core::{resolve_styling, PartialStylingDescriptor};

    fn mapper(viewport: ViewportSize, format: OutputFormat) -> ScaleMapper {
        ScaleMapper::new(format, viewport, &OverlayConfig::default())
    }

    #[test]
    fn default_style_sits_above_bottom_margin() {
        let style = StylingDescriptor::default();
        let position = OverlayPosition::compute(
            &style,
            &mapper(ViewportSize::new(360.0, 640.0), OutputFormat::Portrait),
        );
        assert_eq!(position.content, Rect { x: 0.0, y: 0.0, width: 360.0, height: 640.0 });
        assert_eq!(position.offset_y_px, 30.0);
        assert_eq!(position.margin_x_px, 25.0);
        assert_eq!(position.max_width_px, 324.0);
        assert_eq!(position.block_origin(100.0, 40.0), (130.0, 570.0));
    }

    #[test]
    fn letterboxed_content_is_centered() {
        let style = resolve_styling(&PartialStylingDescriptor {
            position: Some("top".into()),
            ..Default::default()
        });
        let position = OverlayPosition::compute(
            &style,
            &mapper(ViewportSize::new(640.0, 400.0), OutputFormat::Landscape),
        );
        assert_eq!(position.content.y, 20.0);
        assert_eq!(position.content.height, 360.0);
        assert_eq!(position.block_origin(200.0, 50.0), (220.0, 50.0));
    }

    #[test]
    fn middle_ignores_margin_and_tall_blocks_clamp() {
        let style = resolve_styling(&PartialStylingDescriptor {
            position: Some("middle".into()),
            ..Default::default()
        });
        let position = OverlayPosition::compute(
            &style,
            &mapper(ViewportSize::new(360.0, 640.0), OutputFormat::Portrait),
        );
        assert_eq!(position.offset_y_px, 0.0);
        assert_eq!(position.block_origin(100.0, 40.0).1, 300.0);
        assert_eq!(position.block_origin(100.0, 900.0).1, 0.0);
    }
}
