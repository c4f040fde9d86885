//! Frame scheduling seam

/// Handle for one requested frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameToken(pub u64);

/// Host frame scheduler, e.g. `requestAnimationFrame`
///
/// A requested frame is delivered by the host calling
/// [`crate::PlaybackClock::tick`] with the returned token, unless it was
/// cancelled first.
pub trait FrameScheduler {
    /// Request one callback on the next displayed frame
    fn request_frame(&mut self) -> FrameToken;

    /// Cancel a pending request; unknown tokens are ignored
    fn cancel_frame(&mut self, token: FrameToken);
}

/// Scheduler driven by hand, for tests and offline simulation
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: Vec<FrameToken>,
    requested: usize,
    cancelled: usize,
}

impl ManualScheduler {
    /// Create an empty scheduler
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain requests that are due on this frame
    pub fn take_due(&mut self) -> Vec<FrameToken> {
        core::mem::take(&mut self.pending)
    }

    /// Requests not yet delivered or cancelled
    #[must_use]
    pub fn pending(&self) -> &[FrameToken] {
        &self.pending
    }

    /// Total requests made
    #[must_use]
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// Total requests cancelled before delivery
    #[must_use]
    pub fn cancelled(&self) -> usize {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameToken {
        self.next_id += 1;
        self.requested += 1;
        let token = FrameToken(self.next_id);
        self.pending.push(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        if let Some(pos) = self.pending.iter().position(|t| *t == token) {
            self.pending.remove(pos);
            self.cancelled += 1;
        }
    }
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for &mut S {
    fn request_frame(&mut self) -> FrameToken {
        (**self).request_frame()
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        (**self).cancel_frame(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique_and_cancellable() {
        let mut scheduler = ManualScheduler::new();
        let a = scheduler.request_frame();
        let b = scheduler.request_frame();
        assert_ne!(a, b);

        scheduler.cancel_frame(a);
        scheduler.cancel_frame(a);
        assert_eq!(scheduler.pending(), &[b]);
        assert_eq!(scheduler.cancelled(), 1);

        assert_eq!(scheduler.take_due(), vec![b]);
        assert!(scheduler.pending().is_empty());
        assert_eq!(scheduler.requested(), 2);
    }
}
