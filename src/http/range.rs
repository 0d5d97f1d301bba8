//! HTTP Range request parsing module
//!
//! Single byte-range parsing for resumable image downloads (RFC 7233).

use std::ops::RangeInclusive;

/// Range header parse result
#[derive(Debug, PartialEq, Eq)]
pub enum RangeParseResult {
    /// Satisfiable range, inclusive byte positions within the file
    Valid(RangeInclusive<usize>),
    /// Range cannot be served for this file size - respond 416
    NotSatisfiable,
    /// No Range header, multi-range, or malformed - serve the whole file
    None,
}

/// Parse HTTP Range header (single range only, bytes unit)
///
/// Supported forms: `bytes=start-end`, `bytes=start-`, `bytes=-suffix`.
///
/// # Examples
/// ```
/// use picfind::http::range::{parse_range_header, RangeParseResult};
///
/// assert_eq!(parse_range_header(Some("bytes=0-99"), 1000), RangeParseResult::Valid(0..=99));
/// assert_eq!(parse_range_header(Some("bytes=-10"), 1000), RangeParseResult::Valid(990..=999));
/// assert_eq!(parse_range_header(None, 1000), RangeParseResult::None);
/// ```
pub fn parse_range_header(range_header: Option<&str>, file_size: usize) -> RangeParseResult {
    let Some(spec) = range_header.and_then(|h| h.trim().strip_prefix("bytes=")) else {
        return RangeParseResult::None;
    };
    if spec.contains(',') {
        return RangeParseResult::None;
    }
    let Some((first, last)) = spec.split_once('-') else {
        return RangeParseResult::None;
    };

    match (first.trim(), last.trim()) {
        ("", "") => RangeParseResult::None,
        ("", suffix) => suffix_range(suffix, file_size),
        (start, end) => bounded_range(start, end, file_size),
    }
}

/// `-N`: the last N bytes
fn suffix_range(suffix: &str, file_size: usize) -> RangeParseResult {
    match suffix.parse::<usize>() {
        Err(_) => RangeParseResult::None,
        Ok(0) => RangeParseResult::NotSatisfiable,
        Ok(_) if file_size == 0 => RangeParseResult::NotSatisfiable,
        Ok(n) => RangeParseResult::Valid(file_size.saturating_sub(n)..=file_size - 1),
    }
}

/// `S-` or `S-E`, with `E` clamped to the last byte
fn bounded_range(start: &str, end: &str, file_size: usize) -> RangeParseResult {
    let Ok(start) = start.parse::<usize>() else {
        return RangeParseResult::None;
    };
    if start >= file_size {
        return RangeParseResult::NotSatisfiable;
    }

    let last = file_size - 1;
    let end = if end.is_empty() {
        last
    } else {
        match end.parse::<usize>() {
            Ok(e) => e.min(last),
            Err(_) => return RangeParseResult::None,
        }
    };

    if start > end {
        RangeParseResult::NotSatisfiable
    } else {
        RangeParseResult::Valid(start..=end)
    }
}
