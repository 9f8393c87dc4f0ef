pub mod types;
pub mod color;
pub mod aggregate;
pub mod slot_utils;

pub use types::{DaySummary, WeekReport};
pub use color::classify;
pub use aggregate::aggregate_day;
pub use slot_utils::compress_ranges;

use crate::grid::Row;
use crate::parser::{parse_grid, ParsedGrid};
use types::Day;

/// Aggregates one day and compresses its qualifying slots
pub fn summarize_day(day: &Day, slots: &[String]) -> DaySummary {
    let outcomes = aggregate_day(day, slots);
    let ranges = compress_ranges(
        outcomes
            .iter()
            .map(|o| (o.slot.as_str(), o.qualification.as_ref())),
    );

    DaySummary {
        day: day.name.clone(),
        players: day.players.len(),
        slots: outcomes,
        ranges,
    }
}

/// Runs the whole engine over one grid snapshot
pub fn build_report(rows: &[Row]) -> WeekReport {
    let ParsedGrid { slots, days } = parse_grid(rows);
    let days: Vec<DaySummary> = days.iter().map(|day| summarize_day(day, &slots)).collect();

    tracing::info!(
        slots = slots.len(),
        days = days.len(),
        ranges = days.iter().map(|d| d.ranges.len()).sum::<usize>(),
        "grid summarized"
    );

    WeekReport { slots, days }
}
