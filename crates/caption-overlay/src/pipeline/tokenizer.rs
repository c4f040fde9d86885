//! Caption text to styled spans
//!
//! Two highlighting rules, in priority order:
//!
//! 1. Explicit `<h>…</h>` markup. Marked substrings are always highlighted,
//!    regardless of playback progress.
//! 2. Karaoke mode. Without markup, when the style enables active-word
//!    highlighting and a caption is active, the word at
//!    `floor(progress * words)` is highlighted.
//!
//! Otherwise the whole text is one plain span. Uppercasing is applied to span
//! text after tokenizing so delimiters are never altered.

use caption_core::{HighlightStyle, Rgba};
use smallvec::SmallVec;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Opening highlight delimiter
pub const HIGHLIGHT_OPEN: &str = "<h>";
/// Closing highlight delimiter
pub const HIGHLIGHT_CLOSE: &str = "</h>";

/// How a span renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(rename_all = "snake_case"))]
pub enum SpanKind {
    /// Regular caption text
    Plain,
    /// Text drawn with the highlight colors and background box
    Highlighted,
    /// Explicit line break
    LineBreak,
}

/// Highlight colors and box geometry, lengths in screen pixels
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct HighlightBox {
    /// Text fill
    pub font_color: Rgba,
    /// Background box fill
    pub background_color: Rgba,
    /// Background box padding
    pub padding_px: f32,
    /// Background box corner radius
    pub radius_px: f32,
}

impl HighlightBox {
    /// Scale a highlight sub-descriptor to screen pixels
    #[must_use]
    pub fn scaled(style: &HighlightStyle, scale: f32) -> Self {
        Self {
            font_color: style.font_color(),
            background_color: style.background_color(),
            padding_px: style.background_padding() * scale,
            radius_px: style.background_radius() * scale,
        }
    }
}

/// A run of caption text with uniform styling
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TextSpan {
    /// Text to draw, `"\n"` for line breaks
    pub text: String,
    /// Rendering kind
    pub kind: SpanKind,
    /// Highlight styling, present for highlighted spans
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub highlight: Option<HighlightBox>,
    /// Whether outline layers are drawn behind this span
    ///
    /// The offline renderer leaves the active karaoke word unstroked.
    pub outlined: bool,
}

impl TextSpan {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            kind: SpanKind::Plain,
            highlight: None,
            outlined: true,
        }
    }

    fn highlighted(text: &str, highlight: HighlightBox, outlined: bool) -> Self {
        Self {
            text: text.to_string(),
            kind: SpanKind::Highlighted,
            highlight: Some(highlight),
            outlined,
        }
    }

    fn line_break() -> Self {
        Self {
            text: "\n".to_string(),
            kind: SpanKind::LineBreak,
            highlight: None,
            outlined: false,
        }
    }

    /// Whether the span uses highlight styling
    #[must_use]
    pub fn is_highlighted(&self) -> bool {
        self.kind == SpanKind::Highlighted
    }

    /// Visible characters, `0` for line breaks
    #[must_use]
    pub fn char_count(&self) -> usize {
        match self.kind {
            SpanKind::LineBreak => 0,
            SpanKind::Plain | SpanKind::Highlighted => self.text.chars().count(),
        }
    }
}

/// Split caption text into spans
///
/// `progress` is the active caption's progress in `0..=1`, or `-1` when no
/// caption is active; karaoke highlighting only applies for `progress >= 0`.
///
/// # Examples
///
/// ```rust
/// use caption_core::{resolve_styling, PartialHighlight, PartialStylingDescriptor};
/// use caption_overlay::{tokenize, SpanKind};
///
/// let style = resolve_styling(&PartialStylingDescriptor {
///     highlight: PartialHighlight { active_word: Some(true), ..Default::default() },
///     ..Default::default()
/// });
/// let spans = tokenize("hello world foo", style.highlight(), 1.0, 0.5, false);
/// let active: Vec<&str> = spans
///     .iter()
///     .filter(|s| s.kind == SpanKind::Highlighted)
///     .map(|s| s.text.as_str())
///     .collect();
/// assert_eq!(active, ["world"]);
/// ```
#[must_use]
pub fn tokenize(
    text: &str,
    highlight: &HighlightStyle,
    scale: f32,
    progress: f64,
    uppercase: bool,
) -> Vec<TextSpan> {
    let highlight_box = HighlightBox::scaled(highlight, scale);

    let mut spans = if let Some(segments) = markup_segments(text) {
        segments
            .into_iter()
            .map(|(segment, marked)| {
                if marked {
                    TextSpan::highlighted(segment, highlight_box, true)
                } else {
                    TextSpan::plain(segment)
                }
            })
            .collect()
    } else if highlight.active_word() && progress >= 0.0 {
        karaoke_spans(text, highlight_box, progress)
    } else if text.is_empty() {
        Vec::new()
    } else {
        vec![TextSpan::plain(text)]
    };

    if uppercase {
        for span in spans.iter_mut().filter(|s| s.kind != SpanKind::LineBreak) {
            span.text = span.text.to_uppercase();
        }
    }
    spans
}

/// Alternating literal/marked segments, or `None` without a complete pair
///
/// An opening delimiter without a matching close stays literal text.
fn markup_segments(text: &str) -> Option<SmallVec<[(&str, bool); 8]>> {
    let mut segments: SmallVec<[(&str, bool); 8]> = SmallVec::new();
    let mut rest = text;
    let mut found = false;

    while let Some(open) = rest.find(HIGHLIGHT_OPEN) {
        let inner = &rest[open + HIGHLIGHT_OPEN.len()..];
        let Some(close) = inner.find(HIGHLIGHT_CLOSE) else {
            break;
        };
        found = true;
        segments.push((&rest[..open], false));
        segments.push((&inner[..close], true));
        rest = &inner[close + HIGHLIGHT_CLOSE.len()..];
    }

    if !found {
        return None;
    }
    segments.push((rest, false));
    segments.retain(|(segment, _)| !segment.is_empty());
    Some(segments)
}

/// Whitespace-separated tokens, whitespace runs kept as their own tokens
fn split_words(text: &str) -> SmallVec<[(&str, bool); 16]> {
    let mut tokens: SmallVec<[(&str, bool); 16]> = SmallVec::new();
    let mut start = 0;
    let mut in_space = None;

    for (idx, ch) in text.char_indices() {
        let space = ch.is_whitespace();
        match in_space {
            Some(prev) if prev != space => {
                tokens.push((&text[start..idx], prev));
                start = idx;
            }
            _ => {}
        }
        in_space = Some(space);
    }
    if let Some(space) = in_space {
        tokens.push((&text[start..], space));
    }
    tokens
}

fn karaoke_spans(text: &str, highlight: HighlightBox, progress: f64) -> Vec<TextSpan> {
    let tokens = split_words(text);
    let total_words = tokens.iter().filter(|(_, space)| !space).count();
    let active_index = if total_words == 0 {
        None
    } else {
        Some(((progress * total_words as f64).floor() as usize).min(total_words - 1))
    };

    let mut spans = Vec::with_capacity(tokens.len());
    let mut word_index = 0;
    for (token, space) in tokens {
        if space {
            let breaks = token.matches('\n').count();
            if breaks == 0 {
                spans.push(TextSpan::plain(token));
            } else {
                spans.extend(core::iter::repeat_with(TextSpan::line_break).take(breaks));
            }
        } else {
            if active_index == Some(word_index) {
                spans.push(TextSpan::highlighted(token, highlight, false));
            } else {
                spans.push(TextSpan::plain(token));
            }
            word_index += 1;
        }
    }
    spans
}

/// Keep only the first `visible` characters, for typewriter reveal
#[must_use]
pub fn reveal_spans(spans: &[TextSpan], visible: usize) -> Vec<TextSpan> {
    let mut remaining = visible;
    let mut out = Vec::with_capacity(spans.len());

    for span in spans {
        if remaining == 0 {
            break;
        }
        let count = span.char_count();
        if span.kind == SpanKind::LineBreak || count <= remaining {
            remaining -= count;
            out.push(span.clone());
        } else {
            out.push(TextSpan {
                text: span.text.chars().take(remaining).collect(),
                ..span.clone()
            });
            remaining = 0;
        }
    }
    out
}
