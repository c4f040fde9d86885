//! Caption file formats
//!
//! Only SubRip is supported. Import is tolerant: malformed blocks are skipped
//! and reported as issues instead of failing the whole file.

pub mod srt;

pub use srt::{parse_srt, parse_srt_strict, write_srt, SrtDocument, SrtIssue, SrtIssueKind};
