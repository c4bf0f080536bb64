//! Shaping of raw weather-warning text.
//!
//! Government alert descriptions arrive as one long string with `*` marking
//! section starts and `...` as an intra-section delimiter, e.g.
//! `"...WINTER STORM WARNING...* WHAT...Heavy snow. * WHERE...Downtown."`.
//! This module splits that into a headline plus bulleted details.

use crate::model::AlertRecord;

/// Separator substituting for the first `...` inside each detail bullet.
pub const DETAIL_SEPARATOR: &str = " — ";

/// Parse one raw alert description into an [`AlertRecord`].
///
/// Segment 0 (before the first `*`) becomes the headline with `...` runs
/// collapsed into spaces. Every following segment becomes one detail bullet
/// with its first `...` replaced by [`DETAIL_SEPARATOR`]. Blank segments are
/// dropped.
pub fn parse_alert_description(raw: &str) -> AlertRecord {
    let mut segments = raw.split('*');

    let headline = segments
        .next()
        .map(normalize_headline)
        .unwrap_or_default();

    let details = segments
        .map(format_detail)
        .filter(|detail| !detail.is_empty())
        .collect();

    AlertRecord { headline, details }
}

fn normalize_headline(segment: &str) -> String {
    segment
        .replace("...", " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_detail(segment: &str) -> String {
    segment.trim().replacen("...", DETAIL_SEPARATOR, 1)
}
