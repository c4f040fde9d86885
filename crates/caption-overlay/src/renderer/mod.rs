//! Overlay composition and the interactive preview session
//!
//! [`compose_overlay`] is the stateless per-frame entry point. [`PreviewSession`]
//! wires it to a [`crate::SnapshotStore`], a [`crate::PlaybackClock`] and the
//! measured viewport, recomposing only when one of them changed.

mod compose;
mod session;

pub use compose::{
    compose_overlay, BackgroundStyle, CaptionLayer, ComputedStyle, OverlayFrame, ShadowStyle,
};
pub use session::{PreviewSession, SessionStats};
