use chrono::{DateTime, Utc};
use crate::schedule::types::{CompressedRange, DaySummary};

/// Title line prepended to the digest when it is sent
pub const DIGEST_TITLE: &str = "**Gaming Availability for the Week**";

/// Formats a range label: the slot alone, or "start–end"
pub fn format_range_span(range: &CompressedRange) -> String {
    if range.is_single_slot() {
        range.start.clone()
    } else {
        format!("{}–{}", range.start, range.end)
    }
}

/// Formats one digest line: **span** — label
pub fn format_range_line(range: &CompressedRange) -> String {
    format!("**{}** — {}", format_range_span(range), range.qualification)
}

/// Renders a day section, or `None` when the day has nothing to report
pub fn format_day(day_name: &str, ranges: &[CompressedRange]) -> Option<String> {
    if ranges.is_empty() {
        return None;
    }

    let mut lines = Vec::with_capacity(ranges.len() + 1);
    lines.push(format!("__{}__", day_name));
    lines.extend(ranges.iter().map(format_range_line));
    Some(lines.join("\n"))
}

/// Joins all non-empty day sections with a blank line.
/// Returns `None` when no day has a qualifying range, so callers never send
/// an empty message.
pub fn format_digest(days: &[DaySummary]) -> Option<String> {
    let sections: Vec<String> = days
        .iter()
        .filter_map(|day| format_day(&day.day, &day.ranges))
        .collect();

    if sections.is_empty() {
        None
    } else {
        Some(sections.join("\n\n"))
    }
}

/// Wraps a digest into the message delivered to the channel
pub fn compose_message(digest: &str, generated_at: DateTime<Utc>) -> String {
    format!(
        "{} (generated {})\n\n{}",
        DIGEST_TITLE,
        generated_at.format("%Y-%m-%d %H:%M UTC"),
        digest
    )
}
