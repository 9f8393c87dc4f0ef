use super::types::{Day, Qualification, SlotOutcome, SlotTally};

/// Counts every player's state at one slot
pub fn tally_slot(day: &Day, slot_index: usize) -> SlotTally {
    let mut tally = SlotTally::default();
    for player in &day.players {
        tally.record(player.state_at(slot_index));
    }
    tally
}

/// Decides whether a slot is worth reporting.
///
/// Full attendance wins; otherwise exactly two available plus exactly one
/// tentative counts as a possible session, whatever the size of the group.
pub fn qualify(tally: &SlotTally) -> Option<Qualification> {
    let total = tally.total();
    if total > 0 && tally.available == total {
        Some(Qualification::AllAvailable)
    } else if tally.available == 2 && tally.tentative == 1 {
        Some(Qualification::Possible { total })
    } else {
        None
    }
}

/// Tallies and qualifies each slot of a day, in slot order
pub fn aggregate_day(day: &Day, slots: &[String]) -> Vec<SlotOutcome> {
    slots
        .iter()
        .enumerate()
        .map(|(index, slot)| {
            let tally = tally_slot(day, index);
            SlotOutcome {
                slot: slot.clone(),
                tally,
                qualification: qualify(&tally),
            }
        })
        .collect()
}
