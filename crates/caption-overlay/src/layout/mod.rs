//! Reference-to-screen scaling and caption block positioning

mod positioning;
mod scale;

pub use positioning::{OverlayPosition, Rect};
pub use scale::{compute_scale, OutputFormat, ReferenceResolution, ScaleMapper, ViewportSize};
