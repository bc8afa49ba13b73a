//! Gate Modes
//!
//! Decides whether the gate output is high for a sample from the cell's gate
//! flag, the run state and the phase of the step pulse.

use serde::{Deserialize, Serialize};

/// How the step pulse shapes the gate output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GateMode {
    /// Short pulse at the moment a gated cell is entered
    #[default]
    Trigger,
    /// Held high, dropping for the length of the pulse on every step
    Retrigger,
    /// Held high for the whole dwell on a gated cell
    Continuous,
}

impl GateMode {
    pub const ALL: [GateMode; 3] = [GateMode::Trigger, GateMode::Retrigger, GateMode::Continuous];

    /// Persisted integer to mode. Unknown values yield `None`.
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(GateMode::Trigger),
            1 => Some(GateMode::Retrigger),
            2 => Some(GateMode::Continuous),
            _ => None,
        }
    }

    pub fn index(&self) -> i64 {
        *self as i64
    }

    pub fn name(&self) -> &'static str {
        match self {
            GateMode::Trigger => "Trigger",
            GateMode::Retrigger => "Retrigger",
            GateMode::Continuous => "Continuous",
        }
    }
}

/// Gate level for one cell on one sample.
#[inline]
pub fn resolve(
    gate_enabled: bool,
    is_current: bool,
    running: bool,
    pulse_active: bool,
    mode: GateMode,
) -> bool {
    let base = running && is_current && gate_enabled;
    match mode {
        GateMode::Trigger => base && pulse_active,
        GateMode::Retrigger => base && !pulse_active,
        GateMode::Continuous => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truth_table() {
        for mode in GateMode::ALL {
            for bits in 0..8u8 {
                let gate_enabled = bits & 1 != 0;
                let is_current = bits & 2 != 0;
                let pulse = bits & 4 != 0;

                let base = gate_enabled && is_current;
                let expected = match mode {
                    GateMode::Trigger => base && pulse,
                    GateMode::Retrigger => base && !pulse,
                    GateMode::Continuous => base,
                };

                assert_eq!(
                    resolve(gate_enabled, is_current, true, pulse, mode),
                    expected,
                    "{:?} gate={} current={} pulse={}",
                    mode,
                    gate_enabled,
                    is_current,
                    pulse
                );
            }
        }
    }

    #[test]
    fn test_stopped_is_always_low() {
        for mode in GateMode::ALL {
            for pulse in [false, true] {
                assert!(!resolve(true, true, false, pulse, mode));
            }
        }
    }

    #[test]
    fn test_concrete_cases() {
        assert!(resolve(true, true, true, true, GateMode::Trigger));
        assert!(!resolve(true, true, true, false, GateMode::Trigger));
        assert!(!resolve(true, true, true, true, GateMode::Retrigger));
        assert!(resolve(true, true, true, false, GateMode::Retrigger));
        assert!(resolve(true, true, true, false, GateMode::Continuous));
        assert!(!resolve(false, true, true, true, GateMode::Continuous));
        assert!(!resolve(true, false, true, true, GateMode::Continuous));
    }

    #[test]
    fn test_index_round_trip_and_unknown() {
        for mode in GateMode::ALL {
            assert_eq!(GateMode::from_index(mode.index()), Some(mode));
        }
        assert_eq!(GateMode::from_index(3), None);
        assert_eq!(GateMode::from_index(-1), None);
        assert_eq!(GateMode::default(), GateMode::Trigger);
    }
}
