use crate::waveform::{interpolate, Extrapolation};

const PULSE_INPUT_DB: [f32; 3] = [-160.0, -60.0, 0.0];
const PULSE_OUTPUT: [f32; 3] = [0.0, 0.0, -30.0];

/// Inset of the pulse ring drawn around the record button for a live level.
/// Quiet input keeps the ring flush with the button; louder input pushes it
/// outward (more negative).
pub fn record_pulse_inset(level_db: f32) -> f32 {
    interpolate(level_db, &PULSE_INPUT_DB, &PULSE_OUTPUT, Extrapolation::Extend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_flat_below_minus_60() {
        assert_eq!(record_pulse_inset(-160.0), 0.0);
        assert_eq!(record_pulse_inset(-100.0), 0.0);
        assert_eq!(record_pulse_inset(-60.0), 0.0);
    }

    #[test]
    fn test_pulse_grows_with_level() {
        assert_eq!(record_pulse_inset(-30.0), -15.0);
        assert_eq!(record_pulse_inset(0.0), -30.0);
    }

    #[test]
    fn test_pulse_extends_past_range() {
        assert_eq!(record_pulse_inset(-200.0), 0.0);
        assert_eq!(record_pulse_inset(6.0), -33.0);
    }
}
