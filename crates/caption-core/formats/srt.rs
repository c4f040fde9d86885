//! SubRip (SRT) import and export
//!
//! Parsing follows what hand-edited and machine-generated SRT files actually
//! look like rather than the strict grammar:
//!
//! - `\r\n` and lone `\r` line endings are normalized
//! - blocks are separated by one or more blank lines
//! - the timing line may be any of the first three lines of a block
//! - timecode fields accept one or two digits and one to three millisecond
//!   digits, with `,` or `.` as separator
//! - the numeric id is optional; missing or non-numeric ids are replaced by
//!   the entry's 1-based position
//!
//! Times are normalized to `HH:MM:SS,mmm` on import so that entries keep a
//! textual representation for display.

use crate::model::{CaptionEntry, TimeValue};
use crate::utils::time::{format_srt_time, parse_time_to_seconds};
use crate::utils::{CoreError, Result};
use core::fmt;

/// Why a block was skipped during import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SrtIssueKind {
    /// Block has fewer than two lines
    TooShort,
    /// No `start --> end` line within the first three lines
    MissingTiming,
    /// Timing line found but no caption text follows it
    EmptyText,
}

impl fmt::Display for SrtIssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort => write!(f, "too short"),
            Self::MissingTiming => write!(f, "missing timing"),
            Self::EmptyText => write!(f, "empty text"),
        }
    }
}

/// A skipped block and where it started
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrtIssue {
    /// Issue kind
    pub kind: SrtIssueKind,
    /// 1-based line number of the block's first line
    pub line: usize,
    /// Human-readable description
    pub message: String,
}

impl SrtIssue {
    fn new(kind: SrtIssueKind, line: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            message: message.into(),
        }
    }

    /// Whether the block was unusable rather than merely empty
    #[must_use]
    pub fn is_error(&self) -> bool {
        !matches!(self.kind, SrtIssueKind::EmptyText)
    }
}

impl fmt::Display for SrtIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} ({})", self.line, self.message, self.kind)
    }
}

/// Result of a tolerant import
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SrtDocument {
    /// Entries in file order
    pub entries: Vec<CaptionEntry>,
    /// Blocks that were skipped
    pub issues: Vec<SrtIssue>,
}

impl SrtDocument {
    /// Whether any block was skipped
    #[must_use]
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

/// Parse SRT content, skipping malformed blocks
///
/// # Examples
///
/// ```rust
/// use caption_core::formats::srt::parse_srt;
///
/// let doc = parse_srt("1\r\n00:00:01,000 --> 00:00:02,500\r\nHello <h>world</h>\r\n");
/// assert_eq!(doc.entries.len(), 1);
/// assert_eq!(doc.entries[0].end_seconds(), 2.5);
/// assert_eq!(doc.entries[0].text, "Hello <h>world</h>");
/// ```
#[must_use]
pub fn parse_srt(content: &str) -> SrtDocument {
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    let mut doc = SrtDocument::default();

    for (first_line, lines) in blocks(&normalized) {
        match parse_block(&lines, doc.entries.len()) {
            Ok(entry) => doc.entries.push(entry),
            Err((kind, message)) => {
                tracing::warn!(line = first_line, %kind, "skipping SRT block");
                doc.issues.push(SrtIssue::new(kind, first_line, message));
            }
        }
    }

    tracing::debug!(
        entries = doc.entries.len(),
        skipped = doc.issues.len(),
        "parsed SRT content"
    );
    doc
}

/// Parse SRT content, failing on the first unusable block
///
/// Blocks that only lack text are still skipped silently.
///
/// # Errors
///
/// Returns [`CoreError::Parse`] with the block's first line number when a
/// block is too short or has no timing line.
pub fn parse_srt_strict(content: &str) -> Result<Vec<CaptionEntry>> {
    let doc = parse_srt(content);
    if let Some(issue) = doc.issues.iter().find(|issue| issue.is_error()) {
        return Err(CoreError::parse(issue.line, &issue.message));
    }
    Ok(doc.entries)
}

/// Serialize entries as SRT
///
/// Blocks are separated by a blank line and the output ends with a newline.
/// Timecodes are always written as `HH:MM:SS,mmm` regardless of how the
/// entry stores them.
#[must_use]
pub fn write_srt(entries: &[CaptionEntry]) -> String {
    let mut out = String::new();
    for (idx, entry) in entries.iter().enumerate() {
        if idx > 0 {
            out.push_str("\n\n");
        }
        out.push_str(&format!(
            "{}\n{} --> {}\n{}",
            entry.id,
            format_srt_time(entry.start_seconds()),
            format_srt_time(entry.end_seconds()),
            entry.text
        ));
    }
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Split into blocks of non-blank lines, each with its 1-based first line
fn blocks(content: &str) -> Vec<(usize, Vec<&str>)> {
    let mut out = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut first_line = 0;

    for (idx, line) in content.split('\n').enumerate() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                out.push((first_line, core::mem::take(&mut current)));
            }
        } else {
            if current.is_empty() {
                first_line = idx + 1;
            }
            current.push(line);
        }
    }
    if !current.is_empty() {
        out.push((first_line, current));
    }
    out
}

fn parse_block(
    lines: &[&str],
    parsed_so_far: usize,
) -> core::result::Result<CaptionEntry, (SrtIssueKind, String)> {
    if lines.len() < 2 {
        return Err((
            SrtIssueKind::TooShort,
            "block needs a timing line and text".to_string(),
        ));
    }

    let (timing_idx, (start, end)) = lines
        .iter()
        .take(3)
        .enumerate()
        .find_map(|(idx, line)| match_timing_line(line.trim()).map(|times| (idx, times)))
        .ok_or_else(|| {
            (
                SrtIssueKind::MissingTiming,
                "no 'HH:MM:SS,mmm --> HH:MM:SS,mmm' line in block".to_string(),
            )
        })?;

    let fallback_id = i64::try_from(parsed_so_far + 1).unwrap_or(i64::MAX);
    let id = if timing_idx > 0 {
        lines[0].trim().parse().unwrap_or(fallback_id)
    } else {
        fallback_id
    };

    let text = lines[timing_idx + 1..].join("\n");
    let text = text.trim();
    if text.is_empty() {
        return Err((SrtIssueKind::EmptyText, format!("entry {id} has no text")));
    }

    Ok(CaptionEntry {
        id,
        start: normalized_time(start),
        end: normalized_time(end),
        text: text.to_string(),
    })
}

fn normalized_time(raw: &str) -> TimeValue {
    TimeValue::Text(format_srt_time(parse_time_to_seconds(raw)))
}

/// Match `start --> end` at the beginning of a trimmed line
///
/// Anything after the end timecode (position hints, stray digits) is ignored.
fn match_timing_line(line: &str) -> Option<(&str, &str)> {
    let start_len = match_timecode(line)?;
    let (start, rest) = line.split_at(start_len);
    let rest = rest.trim_start().strip_prefix("-->")?.trim_start();
    let end_len = match_timecode(rest)?;
    Some((start, &rest[..end_len]))
}

/// Length of a leading `H:M:S,ms` timecode, if present
fn match_timecode(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut pos = 0;

    for _ in 0..2 {
        pos += digit_run(&bytes[pos..], 2)?;
        if bytes.get(pos) != Some(&b':') {
            return None;
        }
        pos += 1;
    }
    pos += digit_run(&bytes[pos..], 2)?;
    if !matches!(bytes.get(pos), Some(b',' | b'.')) {
        return None;
    }
    pos += 1;
    pos += digit_run(&bytes[pos..], 3)?;
    Some(pos)
}

/// Length of a leading run of `1..=max` ASCII digits
fn digit_run(bytes: &[u8], max: usize) -> Option<usize> {
    let len = bytes
        .iter()
        .take(max)
        .take_while(|b| b.is_ascii_digit())
        .count();
    (len > 0).then_some(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timecode_matching_is_relaxed() {
        assert_eq!(match_timecode("00:00:01,000"), Some(12));
        assert_eq!(match_timecode("0:0:1.5"), Some(7));
        assert_eq!(match_timecode("123:00:01,000"), None);
        assert_eq!(match_timecode("00:00:01"), None);
        assert_eq!(match_timecode("00:00:01,"), None);
    }

    #[test]
    fn timing_line_matching() {
        assert_eq!(
            match_timing_line("00:00:01,000 --> 00:00:02,000 X1:40"),
            Some(("00:00:01,000", "00:00:02,000"))
        );
        assert_eq!(
            match_timing_line("0:0:1.5-->0:0:2.25"),
            Some(("0:0:1.5", "0:0:2.25"))
        );
        assert_eq!(match_timing_line("00:00:01,000 -> 00:00:02,000"), None);
    }

    #[test]
    fn blocks_track_first_line() {
        let split = blocks("a\nb\n\n\n  \nc\n");
        assert_eq!(split, vec![(1, vec!["a", "b"]), (6, vec!["c"])]);
    }

    #[test]
    fn id_falls_back_to_position() {
        let doc = parse_srt("00:00:01,000 --> 00:00:02,000\nfirst\n\nabc\n00:00:03,000 --> 00:00:04,000\nsecond");
        assert_eq!(doc.entries[0].id, 1);
        assert_eq!(doc.entries[1].id, 2);
        assert!(!doc.has_issues());
    }

    #[test]
    fn write_ends_with_newline() {
        assert_eq!(write_srt(&[]), "");
        let out = write_srt(&[CaptionEntry::new(7, 1.5, 3.0, "hi")]);
        assert_eq!(out, "7\n00:00:01,500 --> 00:00:03,000\nhi\n");
    }
}
