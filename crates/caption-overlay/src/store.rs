//! Shared caption snapshot with push notification
//!
//! The authoring surface writes caption entries, styling and the output format
//! into a [`SnapshotStore`]; overlay sessions subscribe and re-render when
//! notified instead of polling. Everything is single-threaded: the store is a
//! cheap `Rc` handle and subscribers run synchronously after each committed
//! change.
//!
//! # Examples
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use caption_core::CaptionEntry;
//! use caption_overlay::{CaptionSnapshot, SnapshotChange, SnapshotStore};
//!
//! let store = SnapshotStore::new(CaptionSnapshot::default());
//! let seen = Rc::new(Cell::new(SnapshotChange::empty()));
//! let sink = Rc::clone(&seen);
//! store
//!     .subscribe(move |_, change| sink.set(sink.get() | change))
//!     .unwrap();
//!
//! store
//!     .update_entries(vec![CaptionEntry::new(1, 0.0, 1.0, "hi")])
//!     .unwrap();
//! assert_eq!(seen.get(), SnapshotChange::ENTRIES);
//! ```

use core::cell::{Cell, RefCell};
use core::fmt;
use std::rc::Rc;

use caption_core::{resolve_styling, CaptionEntry, PartialStylingDescriptor, StylingDescriptor};

use crate::layout::OutputFormat;
use crate::utils::{OverlayError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier returned by [`SnapshotStore::subscribe`]
pub type SubscriptionId = usize;

/// Everything the overlay needs besides playback and the viewport
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CaptionSnapshot {
    /// Ordered caption list
    pub entries: Vec<CaptionEntry>,
    /// Fully resolved styling
    pub styling: StylingDescriptor,
    /// Output aspect format
    pub format: OutputFormat,
}

impl CaptionSnapshot {
    /// Parse a JSON snapshot with partial styling
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        let payload: SnapshotPayload =
            serde_json::from_str(json).map_err(caption_core::CoreError::serde)?;
        Ok(payload.into())
    }
}

/// Wire form of a snapshot as sent by an authoring surface
///
/// Styling may be partial; it is resolved on conversion.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SnapshotPayload {
    /// Ordered caption list
    #[cfg_attr(feature = "serde", serde(alias = "captions"))]
    pub entries: Vec<CaptionEntry>,
    /// Raw styling fields
    #[cfg_attr(feature = "serde", serde(alias = "style"))]
    pub styling: PartialStylingDescriptor,
    /// Output aspect format
    #[cfg_attr(feature = "serde", serde(alias = "aspect_ratio"))]
    pub format: OutputFormat,
}

impl From<SnapshotPayload> for CaptionSnapshot {
    fn from(payload: SnapshotPayload) -> Self {
        Self {
            entries: payload.entries,
            styling: resolve_styling(&payload.styling),
            format: payload.format,
        }
    }
}

bitflags::bitflags! {
    /// Parts of a snapshot that changed in one commit
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SnapshotChange: u8 {
        /// Caption list
        const ENTRIES = 1 << 0;
        /// Styling descriptor
        const STYLING = 1 << 1;
        /// Output format
        const FORMAT = 1 << 2;
    }
}

impl SnapshotChange {
    /// Fields that differ between two snapshots
    #[must_use]
    pub fn between(old: &CaptionSnapshot, new: &CaptionSnapshot) -> Self {
        let mut change = Self::empty();
        change.set(Self::ENTRIES, old.entries != new.entries);
        change.set(Self::STYLING, old.styling != new.styling);
        change.set(Self::FORMAT, old.format != new.format);
        change
    }
}

/// Store limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct StoreConfig {
    /// Maximum simultaneous subscribers
    pub max_subscribers: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_subscribers: 64,
        }
    }
}

type Subscriber = Box<dyn FnMut(&CaptionSnapshot, SnapshotChange)>;

struct SubscriberInfo {
    id: SubscriptionId,
    callback: Subscriber,
}

impl fmt::Debug for SubscriberInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberInfo")
            .field("id", &self.id)
            .field("callback", &"<FnMut>")
            .finish()
    }
}

#[derive(Debug)]
struct StoreState {
    snapshot: Rc<CaptionSnapshot>,
    version: u64,
    next_id: SubscriptionId,
}

/// Shared snapshot container; clones refer to the same store
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    state: Rc<RefCell<StoreState>>,
    subscribers: Rc<RefCell<Vec<SubscriberInfo>>>,
    registered: Rc<RefCell<Vec<SubscriptionId>>>,
    deferred_removals: Rc<RefCell<Vec<SubscriptionId>>>,
    notifying: Rc<Cell<bool>>,
    config: StoreConfig,
}

/// Clears the notifying flag even when a subscriber unwinds
struct NotifyGuard<'a>(&'a Cell<bool>);

impl<'a> NotifyGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for NotifyGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl SnapshotStore {
    /// Create a store holding `snapshot`
    #[must_use]
    pub fn new(snapshot: CaptionSnapshot) -> Self {
        Self::with_config(snapshot, StoreConfig::default())
    }

    /// Create a store with explicit limits
    #[must_use]
    pub fn with_config(snapshot: CaptionSnapshot, config: StoreConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(StoreState {
                snapshot: Rc::new(snapshot),
                version: 0,
                next_id: 0,
            })),
            subscribers: Rc::new(RefCell::new(Vec::new())),
            registered: Rc::new(RefCell::new(Vec::new())),
            deferred_removals: Rc::new(RefCell::new(Vec::new())),
            notifying: Rc::new(Cell::new(false)),
            config,
        }
    }

    /// Current snapshot
    #[must_use]
    pub fn snapshot(&self) -> Rc<CaptionSnapshot> {
        Rc::clone(&self.state.borrow().snapshot)
    }

    /// Number of committed changes so far
    #[must_use]
    pub fn version(&self) -> u64 {
        self.state.borrow().version
    }

    /// Registered subscriber count
    ///
    /// Safe to call from inside a subscriber; removals deferred during a
    /// notification are already subtracted.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.registered.borrow().len()
    }

    /// Store limits
    #[must_use]
    pub fn config(&self) -> StoreConfig {
        self.config
    }

    /// Register a callback run after every committed change
    pub fn subscribe<F>(&self, callback: F) -> Result<SubscriptionId>
    where
        F: FnMut(&CaptionSnapshot, SnapshotChange) + 'static,
    {
        let mut subscribers = self
            .subscribers
            .try_borrow_mut()
            .map_err(|_| OverlayError::invalid_state("subscribe during notification"))?;
        if self.registered.borrow().len() >= self.config.max_subscribers {
            return Err(OverlayError::SubscriberLimit {
                limit: self.config.max_subscribers,
            });
        }

        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        subscribers.push(SubscriberInfo {
            id,
            callback: Box::new(callback),
        });
        self.registered.borrow_mut().push(id);
        Ok(id)
    }

    /// Remove a subscriber
    ///
    /// During a notification the removal is deferred until the current round
    /// of callbacks finishes; the removed subscriber is not called again.
    pub fn unsubscribe(&self, id: SubscriptionId) -> Result<()> {
        {
            let mut registered = self.registered.borrow_mut();
            let pos = registered
                .iter()
                .position(|&known| known == id)
                .ok_or(OverlayError::UnknownSubscription(id))?;
            registered.remove(pos);
        }

        match self.subscribers.try_borrow_mut() {
            Ok(mut subscribers) => subscribers.retain(|info| info.id != id),
            Err(_) => {
                tracing::debug!(id, "unsubscribe deferred until notification ends");
                self.deferred_removals.borrow_mut().push(id);
            }
        }
        Ok(())
    }

    /// Replace the caption list
    pub fn update_entries(&self, entries: Vec<CaptionEntry>) -> Result<bool> {
        let mut next = (*self.snapshot()).clone();
        next.entries = entries;
        self.commit(next)
    }

    /// Merge raw styling fields through [`resolve_styling`]
    pub fn update_styling(&self, styling: &PartialStylingDescriptor) -> Result<bool> {
        self.set_styling(resolve_styling(styling))
    }

    /// Replace the styling with an already resolved descriptor
    pub fn set_styling(&self, styling: StylingDescriptor) -> Result<bool> {
        let mut next = (*self.snapshot()).clone();
        next.styling = styling;
        self.commit(next)
    }

    /// Change the output format
    pub fn set_format(&self, format: OutputFormat) -> Result<bool> {
        let mut next = (*self.snapshot()).clone();
        next.format = format;
        self.commit(next)
    }

    /// Replace the whole snapshot
    pub fn replace(&self, snapshot: CaptionSnapshot) -> Result<bool> {
        self.commit(snapshot)
    }

    /// Apply a wire payload, resolving its styling
    pub fn apply_payload(&self, payload: SnapshotPayload) -> Result<bool> {
        self.commit(payload.into())
    }

    fn commit(&self, next: CaptionSnapshot) -> Result<bool> {
        if self.notifying.get() {
            return Err(OverlayError::invalid_state("store updated during notification"));
        }

        let (snapshot, change) = {
            let mut state = self
                .state
                .try_borrow_mut()
                .map_err(|_| OverlayError::invalid_state("store is borrowed"))?;
            let change = SnapshotChange::between(&state.snapshot, &next);
            if change.is_empty() {
                return Ok(false);
            }
            state.snapshot = Rc::new(next);
            state.version += 1;
            tracing::debug!(version = state.version, ?change, "snapshot committed");
            (Rc::clone(&state.snapshot), change)
        };

        self.notify(&snapshot, change)?;
        Ok(true)
    }

    fn notify(&self, snapshot: &CaptionSnapshot, change: SnapshotChange) -> Result<()> {
        let mut subscribers = self
            .subscribers
            .try_borrow_mut()
            .map_err(|_| OverlayError::invalid_state("subscribers are borrowed"))?;
        {
            let _guard = NotifyGuard::enter(&self.notifying);
            for info in subscribers.iter_mut() {
                if self.deferred_removals.borrow().contains(&info.id) {
                    continue;
                }
                (info.callback)(snapshot, change);
            }
        }

        let removed: Vec<_> = self.deferred_removals.borrow_mut().drain(..).collect();
        if !removed.is_empty() {
            subscribers.retain(|info| !removed.contains(&info.id));
        }
        Ok(())
    }
}
