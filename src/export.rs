use std::io::Write;
use std::path::Path;
use csv::Writer;
use serde::Serialize;

use crate::error::AppError;
use crate::schedule::WeekReport;

/// One (day, slot) line of the tally export
#[derive(Debug, Serialize)]
struct TallyRecord<'a> {
    day: &'a str,
    slot: &'a str,
    players: usize,
    available: usize,
    tentative: usize,
    unavailable: usize,
    unknown: usize,
    qualification: String,
}

/// Writes per-slot tallies of every day as CSV
pub fn write_tallies<W: Write>(report: &WeekReport, writer: W) -> Result<(), AppError> {
    let mut wtr = Writer::from_writer(writer);

    for day in &report.days {
        for outcome in &day.slots {
            wtr.serialize(TallyRecord {
                day: &day.day,
                slot: &outcome.slot,
                players: day.players,
                available: outcome.tally.available,
                tentative: outcome.tally.tentative,
                unavailable: outcome.tally.unavailable,
                unknown: outcome.tally.unknown,
                qualification: outcome
                    .qualification
                    .map(|q| q.to_string())
                    .unwrap_or_default(),
            })?;
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Exports the report's tallies to a CSV file, replacing it if present
pub fn export_tallies_to_csv(report: &WeekReport, csv_path: &Path) -> Result<(), AppError> {
    let file = std::fs::File::create(csv_path)?;
    write_tallies(report, file)?;
    tracing::info!(path = %csv_path.display(), days = report.days.len(), "tallies exported");
    Ok(())
}
