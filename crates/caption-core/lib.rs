//! # caption-core
//!
//! Data model and leaf utilities for previewing burned-in captions. The crate
//! knows nothing about viewports or playback; it turns the loosely typed data an
//! authoring surface hands over into canonical, fully defaulted values.
//!
//! ## Contents
//!
//! - **Time codec**: total parsing of `"90"`, `"1:30"`, `"01:30:00,500"` and raw
//!   seconds into canonical seconds, plus short display formatting
//! - **Caption entries**: `CaptionEntry` with `TimeValue` start/end that keep
//!   their original textual form for display
//! - **Styling**: `StylingDescriptor` expressed in reference-resolution units and
//!   the single `resolve_styling` merge from a partial descriptor
//! - **SRT**: tolerant SubRip import and export (feature `srt`)
//!
//! ## Quick Start
//!
//! ```rust
//! use caption_core::{parse_time_to_seconds, format_time, resolve_styling, PartialStylingDescriptor};
//!
//! assert_eq!(parse_time_to_seconds("1:30,5"), 90.5);
//! assert_eq!(format_time(90.0), "1:30");
//!
//! let style = resolve_styling(&PartialStylingDescriptor {
//!     font_size: Some(64.0),
//!     ..Default::default()
//! });
//! assert_eq!(style.font_size(), 64.0);
//! assert_eq!(style.stroke_width(), 3.0);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]

pub mod model;
pub mod style;
pub mod utils;

#[cfg(feature = "srt")]
#[cfg_attr(docsrs, doc(cfg(feature = "srt")))]
pub mod formats;

pub use model::{CaptionEntry, TimeValue};
pub use style::{
    resolve_styling, AnimationMode, FontWeight, HighlightStyle, PartialHighlight,
    PartialStylingDescriptor, StylingDescriptor, TextAlign, VerticalPosition,
};
pub use utils::color::{parse_hex_color, Rgba};
pub use utils::time::{
    format_srt_time, format_time, parse_time_to_seconds, try_parse_time,
};
pub use utils::{CoreError, Result};

/// Crate version for runtime compatibility checks
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
