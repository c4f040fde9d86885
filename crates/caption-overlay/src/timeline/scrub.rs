//! Scrub bar model for timed tracks
//!
//! Each item becomes a segment whose width is proportional to its share of the
//! total duration. Any track with start/end times can be laid out, so the
//! same model serves the caption track and secondary scene tracks.

use caption_core::{format_time, CaptionEntry};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Anything placed on a timeline
pub trait TimedItem {
    /// Canonical start in seconds
    fn start_seconds(&self) -> f64;

    /// Canonical end in seconds
    fn end_seconds(&self) -> f64;

    /// Segment label; defaults to the formatted start time
    fn label(&self) -> String {
        format_time(self.start_seconds())
    }
}

impl TimedItem for CaptionEntry {
    fn start_seconds(&self) -> f64 {
        CaptionEntry::start_seconds(self)
    }

    fn end_seconds(&self) -> f64 {
        CaptionEntry::end_seconds(self)
    }
}

impl TimedItem for (f64, f64) {
    fn start_seconds(&self) -> f64 {
        self.0
    }

    fn end_seconds(&self) -> f64 {
        self.1
    }
}

/// One item on the scrub bar
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ScrubSegment {
    /// Position in the source track
    pub index: usize,
    /// Seek target in seconds
    pub start: f64,
    /// End in seconds
    pub end: f64,
    /// Left edge as a percentage of the total duration
    pub left_percent: f64,
    /// Width as a percentage of the total duration
    pub width_percent: f64,
    /// Display label
    pub label: String,
}

/// Scrub bar layout for a track
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ScrubTimeline {
    /// Duration the percentages are relative to
    pub total_duration: f64,
    /// Segments in track order
    pub segments: Vec<ScrubSegment>,
}

impl ScrubTimeline {
    /// Lay out `items` against the media duration when known, otherwise
    /// against the end of the last item
    #[must_use]
    pub fn build<T: TimedItem>(items: &[T], media_duration: Option<f64>) -> Self {
        let total_duration = media_duration
            .filter(|d| d.is_finite() && *d > 0.0)
            .or_else(|| items.last().map(TimedItem::end_seconds))
            .filter(|d| d.is_finite() && *d > 0.0)
            .unwrap_or(0.0);

        let percent = |seconds: f64| {
            if total_duration > 0.0 {
                seconds / total_duration * 100.0
            } else {
                0.0
            }
        };

        let segments = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let start = item.start_seconds();
                let end = item.end_seconds();
                ScrubSegment {
                    index,
                    start,
                    end,
                    left_percent: percent(start),
                    width_percent: percent((end - start).max(0.0)),
                    label: item.label(),
                }
            })
            .collect();

        Self {
            total_duration,
            segments,
        }
    }

    /// Playhead position as a percentage, clamped to `0..=100`
    #[must_use]
    pub fn playhead_percent(&self, current_time: f64) -> f64 {
        if self.total_duration > 0.0 && current_time.is_finite() {
            (current_time / self.total_duration * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        }
    }

    /// First segment containing `time`
    #[must_use]
    pub fn segment_at(&self, time: f64) -> Option<&ScrubSegment> {
        self.segments
            .iter()
            .find(|segment| segment.start <= time && time <= segment.end)
    }

    /// Seek target for a click on segment `index`
    #[must_use]
    pub fn seek_target(&self, index: usize) -> Option<f64> {
        self.segments.get(index).map(|segment| segment.start)
    }
}
