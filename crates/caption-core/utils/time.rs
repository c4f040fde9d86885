//! Time codec: textual timecodes to canonical seconds and back
//!
//! Caption times arrive as raw seconds (`12.5`), `MM:SS`, or `HH:MM:SS`, with
//! either `.` or `,` as the decimal separator. The render path uses the total
//! [`parse_time_to_seconds`], which never fails and maps anything unparsable to
//! `0`. [`try_parse_time`] is the strict counterpart for import and CLI input.

use super::{parse_float_prefix, CoreError, Result};
use smallvec::SmallVec;

/// Maximum number of `:`-separated components (`HH:MM:SS`)
const MAX_TIME_PARTS: usize = 3;

/// Parse a textual time into seconds, degrading to `0` on malformed input.
///
/// Each `:`-separated component is parsed leniently as a float prefix, and a
/// component that cannot be parsed counts as `0`. More than three components
/// or a non-finite result also yield `0`.
///
/// # Examples
///
/// ```rust
/// use caption_core::parse_time_to_seconds;
///
/// assert_eq!(parse_time_to_seconds("1:30"), 90.0);
/// assert_eq!(parse_time_to_seconds("01:30:00"), 5400.0);
/// assert_eq!(parse_time_to_seconds("1:30,5"), 90.5);
/// assert_eq!(parse_time_to_seconds("abc"), 0.0);
/// ```
#[must_use]
pub fn parse_time_to_seconds(value: &str) -> f64 {
    let normalized = value.trim().replace(',', ".");
    if normalized.is_empty() {
        return 0.0;
    }

    let seconds = if normalized.contains(':') {
        let parts: SmallVec<[f64; MAX_TIME_PARTS]> = normalized
            .split(':')
            .map(|part| parse_float_prefix(part).unwrap_or(0.0))
            .collect();
        combine_parts(&parts)
    } else {
        parse_float_prefix(&normalized)
    };

    match seconds {
        Some(s) if s.is_finite() => s,
        _ => {
            tracing::debug!(input = value, "unparsable time value, using 0");
            0.0
        }
    }
}

/// Parse a textual time into seconds, rejecting malformed components.
///
/// Accepts the same shapes as [`parse_time_to_seconds`] but every component
/// must be a complete number.
///
/// # Errors
///
/// Returns [`CoreError::InvalidTime`] for empty input, more than three
/// components, or any component that is not a finite number.
pub fn try_parse_time(value: &str) -> Result<f64> {
    let normalized = value.trim().replace(',', ".");
    if normalized.is_empty() {
        return Err(CoreError::invalid_time(value, "empty time"));
    }

    let mut parts: SmallVec<[f64; MAX_TIME_PARTS]> = SmallVec::new();
    for part in normalized.split(':') {
        let parsed = part
            .trim()
            .parse::<f64>()
            .map_err(|_| CoreError::invalid_time(value, "component is not a number"))?;
        parts.push(parsed);
    }

    combine_parts(&parts)
        .filter(|s| s.is_finite())
        .ok_or_else(|| CoreError::invalid_time(value, "expected seconds, MM:SS or HH:MM:SS"))
}

fn combine_parts(parts: &[f64]) -> Option<f64> {
    match *parts {
        [s] => Some(s),
        [m, s] => Some(m * 60.0 + s),
        [h, m, s] => Some(h * 3600.0 + m * 60.0 + s),
        _ => None,
    }
}

/// Format seconds as short display text (`M:SS`).
///
/// Zero, negative, and non-finite inputs render as `"0:00"`. Minutes are not
/// wrapped into hours, so `4500.0` renders as `"75:00"`.
///
/// # Examples
///
/// ```rust
/// use caption_core::format_time;
///
/// assert_eq!(format_time(90.0), "1:30");
/// assert_eq!(format_time(f64::NAN), "0:00");
/// ```
#[must_use]
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }

    let whole = seconds.floor() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}

/// Format seconds as a SubRip timecode (`HH:MM:SS,mmm`).
///
/// Rounds to the nearest millisecond. Negative and non-finite inputs format
/// as `00:00:00,000`.
#[must_use]
pub fn format_srt_time(seconds: f64) -> String {
    let total_ms = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    };

    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{hours:02}:{minutes:02}:{secs:02},{millis:03}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_time_shapes() {
        assert_eq!(parse_time_to_seconds("1:30"), 90.0);
        assert_eq!(parse_time_to_seconds("01:30:00"), 5400.0);
        assert_eq!(parse_time_to_seconds("90"), 90.0);
        assert_eq!(parse_time_to_seconds("1:30,5"), 90.5);
        assert_eq!(parse_time_to_seconds("00:00:01,250"), 1.25);
        assert_eq!(parse_time_to_seconds("  12.5  "), 12.5);
    }

    #[test]
    fn parse_time_degrades_to_zero() {
        assert_eq!(parse_time_to_seconds(""), 0.0);
        assert_eq!(parse_time_to_seconds("   "), 0.0);
        assert_eq!(parse_time_to_seconds("abc"), 0.0);
        assert_eq!(parse_time_to_seconds("1:2:3:4"), 0.0);
        assert_eq!(parse_time_to_seconds("1e400"), 0.0);
    }

    #[test]
    fn parse_time_unparsable_components_count_as_zero() {
        assert_eq!(parse_time_to_seconds("abc:30"), 30.0);
        assert_eq!(parse_time_to_seconds("1:xx"), 60.0);
    }

    #[test]
    fn strict_parse_rejects_garbage() {
        assert_eq!(try_parse_time("1:30").unwrap(), 90.0);
        assert_eq!(try_parse_time("00:00:02,5").unwrap(), 2.5);
        assert!(try_parse_time("").is_err());
        assert!(try_parse_time("abc").is_err());
        assert!(try_parse_time("1:xx").is_err());
        assert!(try_parse_time("1:2:3:4").is_err());
    }

    #[test]
    fn format_time_display() {
        assert_eq!(format_time(90.0), "1:30");
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(59.99), "0:59");
        assert_eq!(format_time(4500.0), "75:00");
        assert_eq!(format_time(-5.0), "0:00");
    }

    #[test]
    fn format_srt_time_display() {
        assert_eq!(format_srt_time(0.0), "00:00:00,000");
        assert_eq!(format_srt_time(1.5), "00:00:01,500");
        assert_eq!(format_srt_time(3661.001), "01:01:01,001");
        assert_eq!(format_srt_time(f64::INFINITY), "00:00:00,000");
    }
}
