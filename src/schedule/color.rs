use crate::grid::Color;
use super::types::AvailabilityState;

/// Reference colors, in tie-breaking order
pub const REFERENCE_COLORS: [(AvailabilityState, Color); 4] = [
    (AvailabilityState::Available, Color::new(0.0, 1.0, 0.0)),
    (AvailabilityState::Tentative, Color::new(1.0, 1.0, 0.0)),
    (AvailabilityState::Unavailable, Color::new(1.0, 0.0, 0.0)),
    (AvailabilityState::Unknown, Color::WHITE),
];

/// Maps a cell background to the state of the nearest reference color.
/// Ties go to the earlier reference; NaN channels fall through to `Unknown`.
pub fn classify(color: &Color) -> AvailabilityState {
    let mut best = AvailabilityState::Unknown;
    let mut min_distance = f64::INFINITY;

    for (state, reference) in &REFERENCE_COLORS {
        let distance = color.distance(reference);
        if distance < min_distance {
            min_distance = distance;
            best = *state;
        }
    }

    tracing::trace!(?color, state = best.as_str(), distance = min_distance, "classified cell color");
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_colors_classify_to_their_own_state() {
        for (state, reference) in &REFERENCE_COLORS {
            assert_eq!(classify(reference), *state);
        }
    }

    #[test]
    fn default_color_is_unknown() {
        assert_eq!(classify(&Color::default()), AvailabilityState::Unknown);
    }

    #[test]
    fn saturated_shades_snap_to_nearest_reference() {
        assert_eq!(classify(&Color::new(0.2, 0.8, 0.2)), AvailabilityState::Available);
        assert_eq!(classify(&Color::new(0.95, 0.9, 0.1)), AvailabilityState::Tentative);
        assert_eq!(classify(&Color::new(0.9, 0.2, 0.15)), AvailabilityState::Unavailable);
        assert_eq!(classify(&Color::new(0.95, 0.95, 0.95)), AvailabilityState::Unknown);
    }

    #[test]
    fn equidistant_color_prefers_earlier_reference() {
        // halfway between green and yellow
        assert_eq!(classify(&Color::new(0.5, 1.0, 0.0)), AvailabilityState::Available);
        // halfway between yellow and red
        assert_eq!(classify(&Color::new(1.0, 0.5, 0.0)), AvailabilityState::Tentative);
    }

    #[test]
    fn out_of_range_and_degenerate_channels_still_classify() {
        let inputs = [
            Color::new(-3.0, 7.5, 0.2),
            Color::new(0.0, 0.0, 0.0),
            Color::new(f64::NAN, 0.0, 0.0),
            Color::new(f64::INFINITY, 1.0, 1.0),
        ];
        for color in &inputs {
            let first = classify(color);
            assert_eq!(classify(color), first);
        }
        assert_eq!(classify(&Color::new(f64::NAN, 1.0, 1.0)), AvailabilityState::Unknown);
    }
}
