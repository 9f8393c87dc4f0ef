use std::fmt;
use serde::Serialize;

/// Availability of one player in one time slot, read from the cell color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AvailabilityState {
    Available,
    Tentative,
    Unavailable,
    #[default]
    Unknown,
}

impl AvailabilityState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AvailabilityState::Available => "available",
            AvailabilityState::Tentative => "tentative",
            AvailabilityState::Unavailable => "unavailable",
            AvailabilityState::Unknown => "unknown",
        }
    }
}

/// One player row: a state per time slot, positionally aligned with the
/// grid's slot list
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub name: String,
    pub states: Vec<AvailabilityState>,
}

impl PlayerRecord {
    pub fn state_at(&self, slot_index: usize) -> AvailabilityState {
        self.states.get(slot_index).copied().unwrap_or_default()
    }
}

/// A day section of the grid with the players listed under it
#[derive(Debug, Clone, PartialEq)]
pub struct Day {
    pub name: String,
    pub players: Vec<PlayerRecord>,
}

impl Day {
    pub fn new(name: &str) -> Self {
        Day {
            name: name.to_string(),
            players: Vec::new(),
        }
    }
}

/// Per-state player counts for one slot of one day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SlotTally {
    pub available: usize,
    pub tentative: usize,
    pub unavailable: usize,
    pub unknown: usize,
}

impl SlotTally {
    pub fn record(&mut self, state: AvailabilityState) {
        match state {
            AvailabilityState::Available => self.available += 1,
            AvailabilityState::Tentative => self.tentative += 1,
            AvailabilityState::Unavailable => self.unavailable += 1,
            AvailabilityState::Unknown => self.unknown += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.available + self.tentative + self.unavailable + self.unknown
    }
}

/// Why a slot made it into the digest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Qualification {
    /// Every player of the day is available
    AllAvailable,
    /// Exactly two available and one tentative
    Possible { total: usize },
}

impl fmt::Display for Qualification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Qualification::AllAvailable => write!(f, "✅ Grane!"),
            Qualification::Possible { total } => {
                write!(f, "⚠️ Możliwe granie? (2/{}, 1 być może)", total)
            }
        }
    }
}

/// Tally and verdict for one slot of one day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotOutcome {
    pub slot: String,
    pub tally: SlotTally,
    pub qualification: Option<Qualification>,
}

/// A maximal run of consecutive slots sharing one qualification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompressedRange {
    pub start: String,
    pub end: String,
    pub qualification: Qualification,
}

impl CompressedRange {
    pub fn is_single_slot(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub day: String,
    pub players: usize,
    pub slots: Vec<SlotOutcome>,
    pub ranges: Vec<CompressedRange>,
}

/// Everything derived from one grid snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeekReport {
    pub slots: Vec<String>,
    pub days: Vec<DaySummary>,
}

impl WeekReport {
    /// Rendered digest, `None` when no day has a qualifying slot
    pub fn digest(&self) -> Option<String> {
        crate::display::format_digest(&self.days)
    }
}
