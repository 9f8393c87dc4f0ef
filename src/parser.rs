use crate::grid::Row;
use crate::schedule::classify;
use crate::schedule::types::{AvailabilityState, Day, PlayerRecord};

/// Column holding the day name on the first row of each day
const DAY_COLUMN: usize = 0;
/// Column holding the player name
const PLAYER_COLUMN: usize = 1;
/// First time-slot column
const FIRST_SLOT_COLUMN: usize = 2;

/// Header labels that may repeat in the day column ("day:", "who:")
const DAY_HEADER_MARKERS: [&str; 2] = ["dzień:", "kto:"];
/// Header labels that may repeat in the player column
const PLAYER_HEADER_MARKERS: [&str; 2] = ["kto", "kto:"];

/// The logical structure recovered from a grid
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedGrid {
    pub slots: Vec<String>,
    pub days: Vec<Day>,
}

fn is_marker(text: &str, markers: &[&str]) -> bool {
    let lower = text.to_lowercase();
    markers.contains(&lower.as_str())
}

/// Day name if this row opens a new day section
fn day_marker(row: &Row) -> Option<&str> {
    let text = row.text_at(DAY_COLUMN);
    if text.is_empty() || is_marker(text, &DAY_HEADER_MARKERS) {
        None
    } else {
        Some(text)
    }
}

/// Player name if this row carries a player's availability
fn player_name(row: &Row) -> Option<&str> {
    let text = row.text_at(PLAYER_COLUMN);
    if text.is_empty() || is_marker(text, &PLAYER_HEADER_MARKERS) {
        None
    } else {
        Some(text)
    }
}

/// Classifies every slot column of a player row; missing columns are unknown
fn player_record(name: &str, row: &Row, slot_count: usize) -> PlayerRecord {
    let states = (0..slot_count)
        .map(|index| {
            row.values
                .get(index + FIRST_SLOT_COLUMN)
                .map(|cell| classify(&cell.background()))
                .unwrap_or(AvailabilityState::Unknown)
        })
        .collect();

    PlayerRecord {
        name: name.to_string(),
        states,
    }
}

/// Accumulator of the row scan: finished days plus the day being filled
#[derive(Debug, Default)]
struct DayFold {
    days: Vec<Day>,
    current: Option<Day>,
}

impl DayFold {
    /// Closes the open day, keeping it only if anybody was listed under it
    fn flush(&mut self) {
        if let Some(day) = self.current.take() {
            if day.players.is_empty() {
                tracing::debug!(day = %day.name, "dropping day without players");
            } else {
                tracing::debug!(day = %day.name, players = day.players.len(), "day complete");
                self.days.push(day);
            }
        }
    }

    fn step(mut self, row: &Row, slot_count: usize) -> Self {
        // A day row also carries the first player of that day, so no early return here
        if let Some(name) = day_marker(row) {
            self.flush();
            self.current = Some(Day::new(name));
        }

        if let Some(name) = player_name(row) {
            let record = player_record(name, row, slot_count);
            match self.current.as_mut() {
                Some(day) => day.players.push(record),
                None => tracing::debug!(player = name, "player row before any day marker, skipping"),
            }
        }

        self
    }

    fn finish(mut self) -> Vec<Day> {
        self.flush();
        self.days
    }
}

/// Parses raw grid rows into time slots and days.
///
/// Row 0 is the header with slot labels from column C onward. Every later row
/// may open a new day (column A) and may list a player (column B) whose slot
/// cells are classified by background color.
pub fn parse_grid(rows: &[Row]) -> ParsedGrid {
    if rows.len() < 2 {
        return ParsedGrid::default();
    }

    let slots: Vec<String> = rows[0]
        .values
        .iter()
        .skip(FIRST_SLOT_COLUMN)
        .map(|cell| cell.text().to_string())
        .collect();

    let days = rows[1..]
        .iter()
        .fold(DayFold::default(), |fold, row| fold.step(row, slots.len()))
        .finish();

    ParsedGrid { slots, days }
}
