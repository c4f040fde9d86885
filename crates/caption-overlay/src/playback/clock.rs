//! Frame-paced playhead sampling
//!
//! The loop is a start/stop pair keyed to `is_playing` transitions. At most
//! one frame request is outstanding, every exit path cancels it, and dropping
//! the clock stops it too.

use super::{FrameScheduler, FrameToken, MediaSource};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Playhead as seen by the overlay; read-only for the engine
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PlaybackState {
    /// Current media time in seconds
    pub current_time: f64,
    /// Whether the media is playing
    pub is_playing: bool,
}

/// Notification from the media element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaEvent {
    /// Playback started or resumed
    Play,
    /// Playback paused
    Pause,
    /// Playback reached the end
    Ended,
    /// A seek completed
    Seeked,
    /// Duration became known
    LoadedMetadata,
    /// The media element failed
    Error,
    /// The media element is going away
    Unmount,
}

/// Republishes the media playhead once per displayed frame while playing
#[derive(Debug)]
pub struct PlaybackClock<S: FrameScheduler> {
    scheduler: S,
    pending: Option<FrameToken>,
    state: PlaybackState,
    duration: Option<f64>,
}

impl<S: FrameScheduler> PlaybackClock<S> {
    /// Create a stopped clock at time `0`
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            pending: None,
            state: PlaybackState::default(),
            duration: None,
        }
    }

    /// Last published playback state
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Media duration once metadata has loaded
    #[must_use]
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    /// Whether a frame request is outstanding
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Underlying scheduler
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Underlying scheduler, mutably
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// React to a media notification
    ///
    /// `media` is `None` once the element is gone; the clock then keeps its
    /// last state. Returns `true` when the published state changed.
    pub fn handle_event(&mut self, event: MediaEvent, media: Option<&dyn MediaSource>) -> bool {
        let before = self.state;
        match event {
            MediaEvent::Play => {
                self.state.is_playing = true;
                self.sample(media);
                self.start();
            }
            MediaEvent::Pause | MediaEvent::Ended => {
                self.stop();
                self.state.is_playing = false;
                self.sample(media);
            }
            MediaEvent::Seeked => self.sample(media),
            MediaEvent::LoadedMetadata => {
                if let Some(duration) = media.and_then(|m| m.duration()) {
                    if duration.is_finite() {
                        self.duration = Some(duration);
                    }
                }
                self.sample(media);
            }
            MediaEvent::Error | MediaEvent::Unmount => {
                self.stop();
                self.state.is_playing = false;
            }
        }
        self.state != before
    }

    /// Deliver a frame callback
    ///
    /// Tokens other than the outstanding request are stale and ignored.
    /// Returns `true` when the published state changed.
    pub fn tick(&mut self, token: FrameToken, media: Option<&dyn MediaSource>) -> bool {
        if self.pending != Some(token) {
            tracing::trace!(?token, "ignoring stale frame");
            return false;
        }
        self.pending = None;

        let before = self.state;
        self.sample(media);
        if self.state.is_playing {
            self.pending = Some(self.scheduler.request_frame());
        }
        self.state != before
    }

    /// Start the sampling loop; a second start without a stop is a no-op
    pub fn start(&mut self) {
        if self.pending.is_some() {
            tracing::debug!("sampling loop already running");
            return;
        }
        self.pending = Some(self.scheduler.request_frame());
        tracing::debug!("sampling loop started");
    }

    /// Stop the sampling loop, cancelling the outstanding request
    pub fn stop(&mut self) {
        if let Some(token) = self.pending.take() {
            self.scheduler.cancel_frame(token);
            tracing::debug!("sampling loop stopped");
        }
    }

    fn sample(&mut self, media: Option<&dyn MediaSource>) {
        let Some(time) = media.and_then(|m| m.current_time()) else {
            return;
        };
        if !time.is_finite() {
            return;
        }
        tracing::trace!(time, "playhead sample");
        self.state.current_time = time;
    }
}

impl<S: FrameScheduler> Drop for PlaybackClock<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
