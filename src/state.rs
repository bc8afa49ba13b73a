//! Persistence
//!
//! The sequencer saves a flat document of named fields:
//!
//! ```text
//! { "running": true, "ignoreGateOnPitchOut": false,
//!   "gates": [1, 1, 0, ...], "gateMode": 0 }
//! ```
//!
//! Loading is lenient. Every field is optional, a missing field leaves the
//! current value alone, and a malformed field is skipped with a warning.

use crate::gate::GateMode;
use crate::grid::NUM_CELLS;
use serde_json::{json, Map, Value};

/// Error types for state documents
#[derive(Debug, Clone, PartialEq)]
pub enum StateError {
    /// Text was not valid JSON
    Json(String),
    /// Document root was not a JSON object
    NotAnObject,
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateError::Json(msg) => write!(f, "Invalid state JSON: {}", msg),
            StateError::NotAnObject => write!(f, "State document is not an object"),
        }
    }
}

impl std::error::Error for StateError {}

impl From<serde_json::Error> for StateError {
    fn from(err: serde_json::Error) -> Self {
        StateError::Json(err.to_string())
    }
}

/// The discrete state that survives a save/load cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistedState {
    pub running: bool,
    pub ignore_gate_on_pitch_out: bool,
    pub gates: [bool; NUM_CELLS],
    pub gate_mode: GateMode,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            running: true,
            ignore_gate_on_pitch_out: false,
            gates: [true; NUM_CELLS],
            gate_mode: GateMode::Trigger,
        }
    }
}

impl PersistedState {
    pub fn to_value(&self) -> Value {
        let gates: Vec<i64> = self.gates.iter().map(|&g| g as i64).collect();
        json!({
            "running": self.running,
            "ignoreGateOnPitchOut": self.ignore_gate_on_pitch_out,
            "gates": gates,
            "gateMode": self.gate_mode.index(),
        })
    }

    pub fn to_json(&self) -> Result<String, StateError> {
        Ok(serde_json::to_string_pretty(&self.to_value())?)
    }

    /// Overlay the fields present in `value` onto this state
    pub fn merge(&mut self, value: &Value) -> Result<(), StateError> {
        StatePatch::from_value(value)?.apply(self);
        Ok(())
    }

    pub fn merge_json(&mut self, json: &str) -> Result<(), StateError> {
        let value: Value = serde_json::from_str(json)?;
        self.merge(&value)
    }
}

/// Fields recovered from a document, `None` where absent or malformed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatePatch {
    pub running: Option<bool>,
    pub ignore_gate_on_pitch_out: Option<bool>,
    pub gates: [Option<bool>; NUM_CELLS],
    pub gate_mode: Option<GateMode>,
}

impl StatePatch {
    pub fn from_value(value: &Value) -> Result<Self, StateError> {
        let root = value.as_object().ok_or(StateError::NotAnObject)?;

        Ok(Self {
            running: read_bool(root, "running"),
            ignore_gate_on_pitch_out: read_bool(root, "ignoreGateOnPitchOut"),
            gates: read_gates(root),
            gate_mode: read_gate_mode(root),
        })
    }

    pub fn apply(&self, state: &mut PersistedState) {
        if let Some(running) = self.running {
            state.running = running;
        }
        if let Some(ignore) = self.ignore_gate_on_pitch_out {
            state.ignore_gate_on_pitch_out = ignore;
        }
        for (gate, patch) in state.gates.iter_mut().zip(self.gates.iter()) {
            if let Some(value) = patch {
                *gate = *value;
            }
        }
        if let Some(mode) = self.gate_mode {
            state.gate_mode = mode;
        }
    }
}

fn read_bool(root: &Map<String, Value>, key: &str) -> Option<bool> {
    let value = root.get(key)?;
    let parsed = value.as_bool();
    if parsed.is_none() {
        log::warn!("ignoring malformed '{}' in sequencer state: {}", key, value);
    }
    parsed
}

fn read_gates(root: &Map<String, Value>) -> [Option<bool>; NUM_CELLS] {
    let mut gates = [None; NUM_CELLS];

    let Some(value) = root.get("gates") else {
        return gates;
    };
    let Some(items) = value.as_array() else {
        log::warn!("ignoring malformed 'gates' in sequencer state: {}", value);
        return gates;
    };

    if items.len() != NUM_CELLS {
        log::warn!(
            "sequencer state has {} gates, expected {}",
            items.len(),
            NUM_CELLS
        );
    }

    for (slot, item) in gates.iter_mut().zip(items.iter()) {
        *slot = match item {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_i64().map(|i| i != 0),
            _ => None,
        };
        if slot.is_none() {
            log::warn!("ignoring malformed gate entry in sequencer state: {}", item);
        }
    }

    gates
}

fn read_gate_mode(root: &Map<String, Value>) -> Option<GateMode> {
    let value = root.get("gateMode")?;
    let mode = value.as_i64().and_then(GateMode::from_index);
    if mode.is_none() {
        log::warn!("ignoring unknown 'gateMode' in sequencer state: {}", value);
    }
    mode
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alternating() -> PersistedState {
        let mut gates = [false; NUM_CELLS];
        for (i, gate) in gates.iter_mut().enumerate() {
            *gate = i % 2 == 0;
        }
        PersistedState {
            running: false,
            ignore_gate_on_pitch_out: true,
            gates,
            gate_mode: GateMode::Retrigger,
        }
    }

    #[test]
    fn test_document_shape() {
        let value = alternating().to_value();
        assert_eq!(value["running"], json!(false));
        assert_eq!(value["ignoreGateOnPitchOut"], json!(true));
        assert_eq!(value["gateMode"], json!(1));
        assert_eq!(value["gates"][0], json!(1));
        assert_eq!(value["gates"][1], json!(0));
        assert_eq!(value["gates"].as_array().map(|a| a.len()), Some(16));
    }

    #[test]
    fn test_round_trip() {
        let saved = alternating();
        let json = saved.to_json().unwrap();

        let mut loaded = PersistedState::default();
        loaded.merge_json(&json).unwrap();
        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_missing_gates_left_untouched() {
        let mut state = alternating();
        let before = state.gates;

        state
            .merge(&json!({ "running": true, "gateMode": 2 }))
            .unwrap();

        assert_eq!(state.gates, before);
        assert!(state.running);
        assert_eq!(state.gate_mode, GateMode::Continuous);
        assert!(state.ignore_gate_on_pitch_out);
    }

    #[test]
    fn test_unknown_gate_mode_ignored() {
        let mut state = alternating();
        state.merge(&json!({ "gateMode": 7 })).unwrap();
        assert_eq!(state.gate_mode, GateMode::Retrigger);

        state.merge(&json!({ "gateMode": "continuous" })).unwrap();
        assert_eq!(state.gate_mode, GateMode::Retrigger);
    }

    #[test]
    fn test_malformed_fields_skipped() {
        let mut state = PersistedState::default();
        state
            .merge(&json!({
                "running": "yes",
                "ignoreGateOnPitchOut": 1,
                "gates": "all",
            }))
            .unwrap();
        assert_eq!(state, PersistedState::default());
    }

    #[test]
    fn test_short_and_mixed_gate_arrays() {
        let mut state = PersistedState::default();
        state
            .merge(&json!({ "gates": [0, false, "x", 5] }))
            .unwrap();

        assert!(!state.gates[0]);
        assert!(!state.gates[1]);
        assert!(state.gates[2]);
        assert!(state.gates[3]);
        assert!(state.gates[4..].iter().all(|&g| g));
    }

    #[test]
    fn test_non_object_rejected() {
        let mut state = PersistedState::default();
        assert_eq!(state.merge(&json!([1, 2])), Err(StateError::NotAnObject));
        assert!(matches!(state.merge_json("{"), Err(StateError::Json(_))));
        assert_eq!(state, PersistedState::default());
    }
}
