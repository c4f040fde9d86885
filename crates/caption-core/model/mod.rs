//! Caption entries and their time values
//!
//! Entries are owned by the authoring surface and handed over as immutable
//! snapshots. Times keep the representation they arrived in so that display
//! round-trips exactly, while every comparison goes through canonical seconds.

use crate::utils::time::{format_time, parse_time_to_seconds};
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize};

/// A caption time as either raw seconds or a textual timecode
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(untagged))]
pub enum TimeValue {
    /// Raw seconds
    Seconds(f64),
    /// Textual timecode (`"12.5"`, `"MM:SS"`, `"HH:MM:SS,mmm"`)
    Text(String),
}

impl TimeValue {
    /// Canonical seconds; never fails, unparsable or NaN values yield `0`
    #[must_use]
    pub fn seconds(&self) -> f64 {
        match self {
            Self::Seconds(s) if s.is_finite() => *s,
            Self::Seconds(_) => 0.0,
            Self::Text(text) => parse_time_to_seconds(text),
        }
    }

    /// Short display text (`M:SS`) of the canonical value
    #[must_use]
    pub fn display(&self) -> String {
        format_time(self.seconds())
    }
}

impl Default for TimeValue {
    fn default() -> Self {
        Self::Seconds(0.0)
    }
}

impl From<f64> for TimeValue {
    fn from(seconds: f64) -> Self {
        Self::Seconds(seconds)
    }
}

impl From<&str> for TimeValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for TimeValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Writes the value in its original representation
impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seconds(s) => write!(f, "{s}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// One timed line of caption text
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CaptionEntry {
    /// Unique id; list position, not id, decides display order
    pub id: i64,
    /// Start of the display interval
    #[cfg_attr(
        feature = "serde",
        serde(default, alias = "start_time", deserialize_with = "lenient_time")
    )]
    pub start: TimeValue,
    /// End of the display interval, expected to be `>= start`
    #[cfg_attr(
        feature = "serde",
        serde(default, alias = "end_time", deserialize_with = "lenient_time")
    )]
    pub end: TimeValue,
    /// Caption text, may contain newlines and `<h>…</h>` highlight markup
    #[cfg_attr(feature = "serde", serde(default))]
    pub text: String,
}

impl CaptionEntry {
    /// Create an entry
    pub fn new(
        id: i64,
        start: impl Into<TimeValue>,
        end: impl Into<TimeValue>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id,
            start: start.into(),
            end: end.into(),
            text: text.into(),
        }
    }

    /// Canonical start in seconds
    #[must_use]
    pub fn start_seconds(&self) -> f64 {
        self.start.seconds()
    }

    /// Canonical end in seconds
    #[must_use]
    pub fn end_seconds(&self) -> f64 {
        self.end.seconds()
    }

    /// `end - start`; zero or negative for degenerate entries
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end_seconds() - self.start_seconds()
    }

    /// Whether `time` falls inside the inclusive `[start, end]` interval
    #[must_use]
    pub fn contains(&self, time: f64) -> bool {
        self.start_seconds() <= time && time <= self.end_seconds()
    }
}

/// Accepts `null` as the default time instead of failing the whole snapshot
#[cfg(feature = "serde")]
fn lenient_time<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TimeValue, D::Error> {
    Ok(Option::<TimeValue>::deserialize(deserializer)?.unwrap_or_default())
}
