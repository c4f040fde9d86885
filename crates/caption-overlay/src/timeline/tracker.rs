//! Active caption selection
//!
//! Selection is a linear first-match scan in list order over inclusive
//! `[start, end]` intervals, so with overlapping entries the earlier one in
//! the list wins. While paused outside every interval the first entry is shown
//! at a fixed progress, giving style edits something to preview.

use caption_core::CaptionEntry;

/// Progress reported when no caption is active
pub const NO_PROGRESS: f64 = -1.0;

/// The caption currently on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveCaption<'a> {
    /// Position in the entry list
    pub index: usize,
    /// The entry itself
    pub entry: &'a CaptionEntry,
    /// Canonical start in seconds
    pub start: f64,
    /// Canonical end in seconds
    pub end: f64,
    /// Fraction of the interval elapsed, `0` for degenerate durations
    pub progress: f64,
    /// Shown as the paused preview rather than by time
    pub is_preview: bool,
}

impl ActiveCaption<'_> {
    /// `end - start`
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Tracker output for one `(entries, time, playing)` input
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrackerState<'a> {
    /// Active caption, if any
    pub active: Option<ActiveCaption<'a>>,
}

impl<'a> TrackerState<'a> {
    /// Active progress, or [`NO_PROGRESS`]
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.active.map_or(NO_PROGRESS, |active| active.progress)
    }

    /// Active caption text
    #[must_use]
    pub fn text(&self) -> Option<&'a str> {
        self.active.map(|active| active.entry.text.as_str())
    }

    /// Active entry id
    #[must_use]
    pub fn entry_id(&self) -> Option<i64> {
        self.active.map(|active| active.entry.id)
    }
}

/// Select the active caption with the default paused preview progress (`0.5`)
///
/// # Examples
///
/// ```rust
/// use caption_core::CaptionEntry;
/// use caption_overlay::track;
///
/// let entries = vec![
///     CaptionEntry::new(1, 0.0, 2.0, "a"),
///     CaptionEntry::new(2, 2.0, 4.0, "b"),
/// ];
/// assert_eq!(track(&entries, 3.0, true).entry_id(), Some(2));
/// assert_eq!(track(&entries, 5.0, true).progress(), -1.0);
/// assert_eq!(track(&entries, 5.0, false).entry_id(), Some(1));
/// ```
#[must_use]
pub fn track(entries: &[CaptionEntry], current_time: f64, is_playing: bool) -> TrackerState<'_> {
    track_with(entries, current_time, is_playing, 0.5)
}

/// Select the active caption
#[must_use]
pub fn track_with(
    entries: &[CaptionEntry],
    current_time: f64,
    is_playing: bool,
    preview_progress: f64,
) -> TrackerState<'_> {
    let hit = entries.iter().enumerate().find_map(|(index, entry)| {
        let start = entry.start_seconds();
        let end = entry.end_seconds();
        (start <= current_time && current_time <= end).then(|| {
            let duration = end - start;
            let progress = if duration > 0.0 {
                (current_time - start) / duration
            } else {
                0.0
            };
            ActiveCaption {
                index,
                entry,
                start,
                end,
                progress,
                is_preview: false,
            }
        })
    });

    if hit.is_some() {
        return TrackerState { active: hit };
    }
    if is_playing {
        return TrackerState::default();
    }

    let active = entries.first().map(|entry| ActiveCaption {
        index: 0,
        entry,
        start: entry.start_seconds(),
        end: entry.end_seconds(),
        progress: preview_progress,
        is_preview: true,
    });
    TrackerState { active }
}
