//! Panel light levels
//!
//! Purely observational: the sequencer writes these every sample and never
//! reads them back into a decision.

use crate::grid::NUM_CELLS;

/// Exponential decay of a light level toward zero, independent of sample rate.
#[inline]
pub fn decay(level: f64, lambda: f64, sample_rate: f64) -> f64 {
    (level - level / lambda / sample_rate).max(0.0)
}

/// All light levels of the sequencer panel, each in `[0, 1]`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Lights {
    pub running: f64,
    pub reset: f64,
    /// Per cell: lit while gated, dimmed by a recent step
    pub gates: [f64; NUM_CELLS],
    /// Per cell: flashes when the cell is stepped onto
    pub steps: [f64; NUM_CELLS],
}

/// Blend a cell's gate light from its gate flag and step flash
#[inline]
pub fn gate_level(gate_enabled: bool, step_level: f64) -> f64 {
    if gate_enabled {
        1.0 - step_level
    } else {
        step_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_decay_time_constant() {
        // One second of decay with a one-second time constant lands near 1/e
        for sample_rate in [1000.0, 48000.0] {
            let mut level = 1.0;
            for _ in 0..sample_rate as usize {
                level = decay(level, 1.0, sample_rate);
            }
            assert_relative_eq!(level, (-1.0f64).exp(), epsilon = 0.01);
        }
    }

    #[test]
    fn test_decay_never_negative() {
        assert_eq!(decay(1.0, 0.001, 100.0), 0.0);
        assert_eq!(decay(0.0, 0.05, 44100.0), 0.0);
    }

    #[test]
    fn test_default_lights_are_dark() {
        let lights = Lights::default();
        assert_eq!(lights.running, 0.0);
        assert!(lights.gates.iter().chain(lights.steps.iter()).all(|&v| v == 0.0));
    }

    #[test]
    fn test_gate_level_blend() {
        assert_relative_eq!(gate_level(true, 0.0), 1.0);
        assert_relative_eq!(gate_level(true, 1.0), 0.0);
        assert_relative_eq!(gate_level(false, 0.25), 0.25);
    }
}
