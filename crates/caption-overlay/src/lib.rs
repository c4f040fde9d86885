//! Playback-synchronized caption overlay engine
//!
//! `caption-overlay` reproduces, on top of a playing video, what an offline
//! renderer will burn into the exported file. Given a caption snapshot, the
//! current playhead and the measured viewport it produces a frame: the
//! on-screen computed style, the outline offset layers, the text spans and
//! the anchored position of the active caption.
//!
//! ## Pipeline
//!
//! 1. [`layout::ScaleMapper`] maps reference-resolution lengths to screen pixels
//! 2. [`timeline::track`] selects the active caption and its progress
//! 3. [`pipeline::tokenize`] splits the caption into plain and highlighted spans
//! 4. [`pipeline::synthesize_outline`] approximates the stroked outline
//! 5. [`renderer::compose_overlay`] assembles the [`renderer::OverlayFrame`]
//!
//! [`playback::PlaybackClock`] keeps the playhead current while playing, and
//! [`store::SnapshotStore`] pushes caption and style edits to subscribers.
//!
//! ## Example
//!
//! ```rust
//! use caption_core::CaptionEntry;
//! use caption_overlay::{
//!     compose_overlay, CaptionSnapshot, OutlineCache, OverlayConfig, PlaybackState,
//!     ViewportSize,
//! };
//!
//! let snapshot = CaptionSnapshot {
//!     entries: vec![CaptionEntry::new(1, 0.0, 2.0, "hello world")],
//!     ..Default::default()
//! };
//! let config = OverlayConfig::default();
//! let mut outlines = OutlineCache::new(config.outline_cache_capacity);
//!
//! let frame = compose_overlay(
//!     &snapshot,
//!     PlaybackState { current_time: 1.0, is_playing: true },
//!     ViewportSize::new(360.0, 640.0),
//!     &config,
//!     &mut outlines,
//! );
//! assert_eq!(frame.scale, 0.5);
//! assert_eq!(frame.caption.unwrap().entry_id, 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod animation;
pub mod config;
pub mod layout;
pub mod pipeline;
pub mod playback;
pub mod renderer;
pub mod store;
pub mod timeline;
pub mod utils;

pub use animation::{sample_animation, AnimationFrame};
pub use config::OverlayConfig;
pub use layout::{OutputFormat, OverlayPosition, ReferenceResolution, ScaleMapper, ViewportSize};
pub use pipeline::{
    synthesize_outline, to_text_shadow, tokenize, OutlineCache, OutlineOffset, SpanKind,
    TextSpan,
};
pub use playback::{
    FrameScheduler, FrameToken, ManualScheduler, MediaEvent, MediaSource, PlaybackClock,
    PlaybackState, SimulatedMedia,
};
pub use renderer::{compose_overlay, CaptionLayer, ComputedStyle, OverlayFrame, PreviewSession};
pub use store::{
    CaptionSnapshot, SnapshotChange, SnapshotPayload, SnapshotStore, StoreConfig, SubscriptionId,
};
pub use timeline::{track, ScrubTimeline, TimedItem, TrackerState};
pub use utils::{OverlayError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
