//! Caption timing: active caption selection and the scrub bar model

mod scrub;
mod tracker;

pub use scrub::{ScrubSegment, ScrubTimeline, TimedItem};
pub use tracker::{track, track_with, ActiveCaption, TrackerState, NO_PROGRESS};
