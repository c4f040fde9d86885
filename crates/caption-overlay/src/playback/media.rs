//! In-memory media element for simulation and tests

use super::MediaSource;

/// Media element stand-in with a manually advanced playhead
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedMedia {
    time: f64,
    duration: Option<f64>,
    playing: bool,
    rate: f64,
}

impl SimulatedMedia {
    /// Paused media at `0` with metadata already loaded
    #[must_use]
    pub fn new(duration: f64) -> Self {
        Self {
            time: 0.0,
            duration: Some(duration),
            playing: false,
            rate: 1.0,
        }
    }

    /// Media whose metadata has not loaded yet
    #[must_use]
    pub fn without_metadata() -> Self {
        Self {
            duration: None,
            ..Self::new(0.0)
        }
    }

    /// Load metadata
    pub fn load_metadata(&mut self, duration: f64) {
        self.duration = Some(duration);
    }

    /// Start playback
    pub fn play(&mut self) {
        self.playing = true;
    }

    /// Pause playback
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Whether the playhead advances
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Set the playback rate
    pub fn set_rate(&mut self, rate: f64) {
        self.rate = rate;
    }

    /// Move the playhead, clamped to the known duration
    pub fn seek(&mut self, time: f64) {
        self.time = self.clamp(time);
    }

    /// Advance by `dt` wall seconds while playing; returns `true` when the
    /// end was reached and playback stopped
    pub fn advance(&mut self, dt: f64) -> bool {
        if !self.playing {
            return false;
        }
        self.time = self.clamp(self.time + dt * self.rate);
        match self.duration {
            Some(duration) if self.time >= duration => {
                self.playing = false;
                true
            }
            _ => false,
        }
    }

    fn clamp(&self, time: f64) -> f64 {
        let time = time.max(0.0);
        self.duration.map_or(time, |d| time.min(d))
    }
}

impl MediaSource for SimulatedMedia {
    fn current_time(&self) -> Option<f64> {
        self.duration.map(|_| self.time)
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }
}
