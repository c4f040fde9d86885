//! Per-caption processing stages
//!
//! - [`outline`]: offset layers approximating the offline renderer's disc stroke
//! - [`tokenizer`]: highlight markup and karaoke word spans

pub mod outline;
pub mod tokenizer;

pub use outline::{
    synthesize_outline, synthesize_outline_with, to_text_shadow, OutlineCache, OutlineCacheStats,
    OutlineOffset, OutlineParams, MAX_OUTLINE_STEPS,
};
pub use tokenizer::{reveal_spans, tokenize, HighlightBox, SpanKind, TextSpan};
