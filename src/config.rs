//! Engine configuration
//!
//! Constants that shape timing and ranges. Loadable from JSON; every field is
//! optional and falls back to its default.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequencerConfig {
    /// Upper bound of the per-cell note knobs
    #[serde(default = "SequencerConfig::default_note_max")]
    pub note_max: f64,

    /// Length of the step pulse in seconds
    #[serde(default = "SequencerConfig::default_pulse_duration")]
    pub pulse_duration: f64,

    /// Time constant of the light decay in seconds
    #[serde(default = "SequencerConfig::default_light_lambda")]
    pub light_lambda: f64,

    /// Initial sample rate in Hz, hosts refresh it with `set_sample_rate`
    #[serde(default = "SequencerConfig::default_sample_rate")]
    pub sample_rate: f64,
}

impl SequencerConfig {
    fn default_note_max() -> f64 {
        10.0
    }
    fn default_pulse_duration() -> f64 {
        1e-3
    }
    fn default_light_lambda() -> f64 {
        0.05
    }
    fn default_sample_rate() -> f64 {
        44100.0
    }

    pub fn with_sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Replace non-finite or non-positive values with their defaults
    pub fn sanitized(self) -> Self {
        fn positive_or(value: f64, fallback: f64) -> f64 {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                fallback
            }
        }

        Self {
            note_max: positive_or(self.note_max, Self::default_note_max()),
            pulse_duration: positive_or(self.pulse_duration, Self::default_pulse_duration()),
            light_lambda: positive_or(self.light_lambda, Self::default_light_lambda()),
            sample_rate: positive_or(self.sample_rate, Self::default_sample_rate()),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            note_max: Self::default_note_max(),
            pulse_duration: Self::default_pulse_duration(),
            light_lambda: Self::default_light_lambda(),
            sample_rate: Self::default_sample_rate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SequencerConfig::default();
        assert_eq!(config.note_max, 10.0);
        assert_eq!(config.pulse_duration, 1e-3);
        assert_eq!(config.light_lambda, 0.05);
        assert_eq!(config.sample_rate, 44100.0);
    }

    #[test]
    fn test_partial_json() {
        let config = SequencerConfig::from_json(r#"{ "sampleRate": 48000.0 }"#).unwrap();
        assert_eq!(config.sample_rate, 48000.0);
        assert_eq!(config.note_max, 10.0);

        let config = SequencerConfig::from_json("{}").unwrap();
        assert_eq!(config, SequencerConfig::default());
    }

    #[test]
    fn test_sanitize_rejects_bad_values() {
        let config = SequencerConfig::from_json(r#"{ "pulseDuration": -1.0, "noteMax": 0.0 }"#)
            .unwrap();
        assert_eq!(config.pulse_duration, 1e-3);
        assert_eq!(config.note_max, 10.0);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(SequencerConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let config = SequencerConfig::default().with_sample_rate(96000.0);
        let json = config.to_json().unwrap();
        assert_eq!(SequencerConfig::from_json(&json).unwrap(), config);
    }
}
