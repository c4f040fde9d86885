//! Preview session driving the overlay from live inputs

use core::cell::Cell;
use std::rc::Rc;

use crate::config::OverlayConfig;
use crate::layout::ViewportSize;
use crate::pipeline::{OutlineCache, OutlineCacheStats};
use crate::playback::{
    FrameScheduler, FrameToken, MediaEvent, MediaSource, PlaybackClock, PlaybackState,
};
use crate::store::{SnapshotChange, SnapshotStore, SubscriptionId};
use crate::timeline::ScrubTimeline;
use crate::utils::Result;

use super::compose::{compose_overlay, OverlayFrame};

/// Composition counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionStats {
    /// Frames actually composed
    pub compositions: u64,
    /// Frame requests answered from the previous composition
    pub reuses: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct FrameKey {
    playback: PlaybackState,
    viewport: ViewportSize,
}

/// One overlay bound to a store, a media element and a viewport
///
/// Subscribes to the store on creation and unsubscribes on drop; the
/// playback clock stops its sampling loop on drop as well.
#[derive(Debug)]
pub struct PreviewSession<S: FrameScheduler> {
    store: SnapshotStore,
    subscription: SubscriptionId,
    changes: Rc<Cell<SnapshotChange>>,
    clock: PlaybackClock<S>,
    viewport: ViewportSize,
    config: OverlayConfig,
    outlines: OutlineCache,
    frame: OverlayFrame,
    key: FrameKey,
    stats: SessionStats,
}

impl<S: FrameScheduler> PreviewSession<S> {
    /// Bind a new session to `store`
    pub fn new(store: SnapshotStore, scheduler: S, config: OverlayConfig) -> Result<Self> {
        config.validate()?;

        let changes = Rc::new(Cell::new(SnapshotChange::empty()));
        let sink = Rc::clone(&changes);
        let subscription = store.subscribe(move |_, change| sink.set(sink.get() | change))?;

        let clock = PlaybackClock::new(scheduler);
        let mut outlines =
            OutlineCache::with_params(config.outline_params(), config.outline_cache_capacity);
        let key = FrameKey {
            playback: clock.state(),
            viewport: ViewportSize::ZERO,
        };
        let frame = compose_overlay(
            &store.snapshot(),
            key.playback,
            key.viewport,
            &config,
            &mut outlines,
        );

        Ok(Self {
            store,
            subscription,
            changes,
            clock,
            viewport: ViewportSize::ZERO,
            config,
            outlines,
            frame,
            key,
            stats: SessionStats {
                compositions: 1,
                reuses: 0,
            },
        })
    }

    /// Record a new viewport measurement; returns `true` when it changed
    pub fn resize(&mut self, viewport: ViewportSize) -> bool {
        if viewport == self.viewport {
            return false;
        }
        tracing::debug!(width = viewport.width, height = viewport.height, "viewport resized");
        self.viewport = viewport;
        true
    }

    /// Forward a media notification to the playback clock
    pub fn handle_media_event(
        &mut self,
        event: MediaEvent,
        media: Option<&dyn MediaSource>,
    ) -> bool {
        self.clock.handle_event(event, media)
    }

    /// Deliver a frame callback to the playback clock
    pub fn on_frame(&mut self, token: FrameToken, media: Option<&dyn MediaSource>) -> bool {
        self.clock.tick(token, media)
    }

    /// Current overlay, recomposed only when an input changed
    pub fn frame(&mut self) -> &OverlayFrame {
        let key = FrameKey {
            playback: self.clock.state(),
            viewport: self.viewport,
        };
        let changes = self.changes.replace(SnapshotChange::empty());

        if changes.is_empty() && key == self.key {
            self.stats.reuses += 1;
        } else {
            let snapshot = self.store.snapshot();
            self.frame = compose_overlay(
                &snapshot,
                key.playback,
                key.viewport,
                &self.config,
                &mut self.outlines,
            );
            self.key = key;
            self.stats.compositions += 1;
        }
        &self.frame
    }

    /// Scrub bar for the caption track
    #[must_use]
    pub fn scrub_timeline(&self) -> ScrubTimeline {
        ScrubTimeline::build(&self.store.snapshot().entries, self.clock.duration())
    }

    /// Snapshot changes not yet composed
    #[must_use]
    pub fn pending_changes(&self) -> SnapshotChange {
        self.changes.get()
    }

    /// Last published playback state
    #[must_use]
    pub fn playback(&self) -> PlaybackState {
        self.clock.state()
    }

    /// Last measured viewport
    #[must_use]
    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    /// Playback clock
    pub fn clock(&self) -> &PlaybackClock<S> {
        &self.clock
    }

    /// Playback clock, mutably
    pub fn clock_mut(&mut self) -> &mut PlaybackClock<S> {
        &mut self.clock
    }

    /// Bound store
    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Active configuration
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Composition counters
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Outline cache counters
    pub fn outline_stats(&self) -> OutlineCacheStats {
        self.outlines.stats()
    }
}

impl<S: FrameScheduler> Drop for PreviewSession<S> {
    fn drop(&mut self) {
        if let Err(err) = self.store.unsubscribe(self.subscription) {
            tracing::warn!(%err, "preview session unsubscribe failed");
        }
    }
}
