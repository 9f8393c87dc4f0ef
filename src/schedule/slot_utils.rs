use super::types::{CompressedRange, Qualification};

/// Collapses labeled slots into maximal runs of identical qualification.
/// Unqualified slots end the current run and are never reported.
pub fn compress_ranges<'a, I>(labeled_slots: I) -> Vec<CompressedRange>
where
    I: IntoIterator<Item = (&'a str, Option<&'a Qualification>)>,
{
    let mut ranges = Vec::new();
    let mut open: Option<CompressedRange> = None;

    for (slot, qualification) in labeled_slots {
        if let (Some(run), Some(q)) = (open.as_mut(), qualification) {
            if run.qualification == *q {
                run.end = slot.to_string();
                continue;
            }
        }

        ranges.extend(open.take());
        open = qualification.map(|q| CompressedRange {
            start: slot.to_string(),
            end: slot.to_string(),
            qualification: *q,
        });
    }

    ranges.extend(open);
    ranges
}
