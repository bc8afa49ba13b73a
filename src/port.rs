//! Signal Conventions and Port System
//!
//! This module defines the signal types, port and parameter definitions, and the
//! type-erased interface a host uses to drive the sequencer alongside other modules.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique identifier for a port within a module
pub type PortId = u32;

/// Unique identifier for a parameter within a module
pub type ParamId = u32;

/// Semantic signal classification following hardware modular conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    /// Unipolar control voltage, 0–10V (voltage range modulation)
    CvUnipolar,

    /// Pitch CV following 1V/octave standard
    VoltPerOctave,

    /// Gate signal, binary state: 0V (low) or +10V (high)
    Gate,

    /// Trigger signal, short pulse used for instantaneous events
    /// (step, reset, randomize)
    Trigger,
}

/// Definition of a single port (input or output)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortDef {
    /// Unique identifier within the module
    pub id: PortId,

    /// Human-readable name (e.g., "reset", "right", "voct")
    pub name: String,

    /// Signal type for validation and UI hints
    pub kind: SignalKind,

    /// Default value when no cable connected
    pub default: f64,
}

impl PortDef {
    pub fn new(id: PortId, name: impl Into<String>, kind: SignalKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            default: 0.0,
        }
    }
}

/// Specification of all ports for a module
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortSpec {
    pub inputs: Vec<PortDef>,
    pub outputs: Vec<PortDef>,
}

impl PortSpec {
    pub fn input_by_name(&self, name: &str) -> Option<&PortDef> {
        self.inputs.iter().find(|p| p.name == name)
    }

    pub fn output_by_name(&self, name: &str) -> Option<&PortDef> {
        self.outputs.iter().find(|p| p.name == name)
    }

    pub fn input_by_id(&self, id: PortId) -> Option<&PortDef> {
        self.inputs.iter().find(|p| p.id == id)
    }
}

/// Runtime port values container
#[derive(Debug, Clone, Default)]
pub struct PortValues {
    pub values: HashMap<PortId, f64>,
}

impl PortValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: PortId) -> Option<f64> {
        self.values.get(&id).copied()
    }

    pub fn get_or(&self, id: PortId, default: f64) -> f64 {
        self.values.get(&id).copied().unwrap_or(default)
    }

    pub fn set(&mut self, id: PortId, value: f64) {
        self.values.insert(id, value);
    }
}

/// Value range of a panel control
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ParamRange {
    /// Continuous knob between (min, max)
    Linear { min: f64, max: f64 },

    /// Snapping selector over `count` discrete positions starting at 0
    Stepped { count: u32 },

    /// Momentary button, 0.0 released, 1.0 pressed
    Button,
}

impl ParamRange {
    /// Clamp a raw value into this range, snapping selectors to integers
    pub fn clamp(&self, value: f64) -> f64 {
        match *self {
            ParamRange::Linear { min, max } => value.clamp(min, max),
            ParamRange::Stepped { count } => {
                let top = count.saturating_sub(1) as f64;
                libm::round(value).clamp(0.0, top)
            }
            ParamRange::Button => value.clamp(0.0, 1.0),
        }
    }
}

/// Parameter definition for UI binding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamDef {
    pub id: ParamId,
    pub name: String,
    pub default: f64,
    pub range: ParamRange,
}

impl ParamDef {
    pub fn new(id: ParamId, name: impl Into<String>, default: f64, range: ParamRange) -> Self {
        Self {
            id,
            name: name.into(),
            default,
            range,
        }
    }

    pub fn button(id: ParamId, name: impl Into<String>) -> Self {
        Self::new(id, name, 0.0, ParamRange::Button)
    }
}

/// Type-erased module interface for host patching
pub trait GraphModule: Send + Sync {
    /// Returns the module's port specification
    fn port_spec(&self) -> &PortSpec;

    /// Process one sample given port values
    fn tick(&mut self, inputs: &PortValues, outputs: &mut PortValues);

    /// Reset internal state
    fn reset(&mut self);

    /// Set sample rate
    fn set_sample_rate(&mut self, sample_rate: f64);

    /// Get parameter definitions for UI binding
    fn params(&self) -> &[ParamDef] {
        &[]
    }

    /// Get a parameter value
    fn get_param(&self, _id: ParamId) -> Option<f64> {
        None
    }

    /// Set a parameter value
    fn set_param(&mut self, _id: ParamId, _value: f64) {}

    /// Get module type identifier for serialization
    fn type_id(&self) -> &'static str {
        "unknown"
    }

    /// Serialize module state
    fn serialize_state(&self) -> Option<serde_json::Value> {
        None
    }

    /// Deserialize module state
    fn deserialize_state(&mut self, _state: &serde_json::Value) -> Result<(), String> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_values() {
        let mut values = PortValues::new();
        values.set(0, 1.5);
        assert_eq!(values.get(0), Some(1.5));
        assert_eq!(values.get_or(1, 2.0), 2.0);
    }

    #[test]
    fn test_param_range_clamp() {
        let knob = ParamRange::Linear { min: 0.0, max: 10.0 };
        assert_eq!(knob.clamp(12.0), 10.0);
        assert_eq!(knob.clamp(-1.0), 0.0);

        let selector = ParamRange::Stepped { count: 12 };
        assert_eq!(selector.clamp(3.4), 3.0);
        assert_eq!(selector.clamp(40.0), 11.0);
        assert_eq!(selector.clamp(-2.0), 0.0);

        assert_eq!(ParamRange::Button.clamp(5.0), 1.0);
    }

    #[test]
    fn test_port_spec_lookup() {
        let spec = PortSpec {
            inputs: vec![PortDef::new(0, "reset", SignalKind::Trigger)],
            outputs: vec![PortDef::new(10, "gate", SignalKind::Gate)],
        };

        assert_eq!(spec.input_by_name("reset").map(|p| p.id), Some(0));
        assert_eq!(spec.output_by_name("gate").map(|p| p.id), Some(10));
        assert!(spec.input_by_id(5).is_none());
    }
}
