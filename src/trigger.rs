//! Edge Detection and Pulse Timing
//!
//! [`SchmittTrigger`] turns a continuous control signal into one-shot rising
//! edges with hysteresis. [`PulseGenerator`] holds a boolean high for a fixed
//! wall-clock duration, so the number of samples it spans follows the sample
//! rate automatically.

/// Input level at or above which a low trigger goes high
pub const HIGH_THRESHOLD: f64 = 1.0;

/// Input level at or below which a high trigger goes low
pub const LOW_THRESHOLD: f64 = 0.1;

/// Rising-edge detector with hysteresis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchmittTrigger {
    high: bool,
}

impl SchmittTrigger {
    pub const fn new() -> Self {
        Self { high: false }
    }

    /// Feed one sample. Returns true only on the sample where the input
    /// crosses the high threshold from the low state.
    #[inline]
    pub fn process(&mut self, signal: f64) -> bool {
        if self.high {
            if signal <= LOW_THRESHOLD {
                self.high = false;
            }
            false
        } else if signal >= HIGH_THRESHOLD {
            self.high = true;
            true
        } else {
            false
        }
    }

    pub fn is_high(&self) -> bool {
        self.high
    }

    pub fn reset(&mut self) {
        self.high = false;
    }
}

/// Fixed-duration pulse timer measured in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PulseGenerator {
    remaining: f64,
}

impl PulseGenerator {
    pub const fn new() -> Self {
        Self { remaining: 0.0 }
    }

    /// Arm (or re-arm) the pulse. The last trigger wins.
    #[inline]
    pub fn trigger(&mut self, duration: f64) {
        self.remaining = duration.max(0.0);
    }

    /// Advance by `dt` seconds. Reports whether the pulse was active at the
    /// start of this sample.
    #[inline]
    pub fn process(&mut self, dt: f64) -> bool {
        let active = self.remaining > 0.0;
        self.remaining = (self.remaining - dt).max(0.0);
        active
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    pub fn reset(&mut self) {
        self.remaining = 0.0;
    }
}
