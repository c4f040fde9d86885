//! Playback clock bridge between the media element and the tracker
//!
//! The host supplies two seams: a [`MediaSource`] to read the playhead from and
//! a [`FrameScheduler`] that delivers one callback per displayed frame. The
//! [`PlaybackClock`] owns the start/stop pairing of the sampling loop.

mod clock;
mod media;
mod scheduler;

pub use clock::{MediaEvent, PlaybackClock, PlaybackState};
pub use media::SimulatedMedia;
pub use scheduler::{FrameScheduler, FrameToken, ManualScheduler};

/// Read-only view of a media element
///
/// Both accessors return `None` while the value is unavailable, for example
/// before metadata has loaded.
pub trait MediaSource {
    /// Current playhead in seconds
    fn current_time(&self) -> Option<f64>;

    /// Media duration in seconds
    fn duration(&self) -> Option<f64>;
}
