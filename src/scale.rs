//! Scale Quantization
//!
//! Snaps a 1V/octave voltage to the nearest pitch of a musical scale rooted at
//! a chosen note. Twelve semitones per volt.

use serde::{Deserialize, Serialize};

/// Root note selector, C through B
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Note {
    #[default]
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl Note {
    pub const COUNT: usize = 12;

    pub const ALL: [Note; Note::COUNT] = [
        Note::C,
        Note::CSharp,
        Note::D,
        Note::DSharp,
        Note::E,
        Note::F,
        Note::FSharp,
        Note::G,
        Note::GSharp,
        Note::A,
        Note::ASharp,
        Note::B,
    ];

    /// Selector position to note, clamping out-of-range positions
    pub fn from_index(index: i64) -> Self {
        Self::ALL[index.clamp(0, Self::COUNT as i64 - 1) as usize]
    }

    /// Semitone offset above C
    pub fn semitone(&self) -> i32 {
        *self as i32
    }

    pub fn name(&self) -> &'static str {
        match self {
            Note::C => "C",
            Note::CSharp => "C#",
            Note::D => "D",
            Note::DSharp => "D#",
            Note::E => "E",
            Note::F => "F",
            Note::FSharp => "F#",
            Note::G => "G",
            Note::GSharp => "G#",
            Note::A => "A",
            Note::ASharp => "A#",
            Note::B => "B",
        }
    }
}

/// Musical scales for quantization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Scale {
    Aeolian,
    Blues,
    Chromatic,
    DiatonicMinor,
    Dorian,
    HarmonicMinor,
    Indian,
    Locrian,
    Lydian,
    Major,
    MelodicMinor,
    #[default]
    Minor,
    Mixolydian,
    NaturalMinor,
    Pentatonic,
    Phrygian,
    Turkish,
}

impl Scale {
    pub const COUNT: usize = 17;

    pub const ALL: [Scale; Scale::COUNT] = [
        Scale::Aeolian,
        Scale::Blues,
        Scale::Chromatic,
        Scale::DiatonicMinor,
        Scale::Dorian,
        Scale::HarmonicMinor,
        Scale::Indian,
        Scale::Locrian,
        Scale::Lydian,
        Scale::Major,
        Scale::MelodicMinor,
        Scale::Minor,
        Scale::Mixolydian,
        Scale::NaturalMinor,
        Scale::Pentatonic,
        Scale::Phrygian,
        Scale::Turkish,
    ];

    /// Selector position to scale, clamping out-of-range positions
    pub fn from_index(index: i64) -> Self {
        Self::ALL[index.clamp(0, Self::COUNT as i64 - 1) as usize]
    }

    /// Returns the semitone offsets for this scale (relative to root)
    pub fn semitones(&self) -> &'static [i32] {
        match self {
            Scale::Aeolian => &[0, 2, 3, 5, 7, 8, 10],
            Scale::Blues => &[0, 3, 5, 6, 7, 10],
            Scale::Chromatic => &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
            Scale::DiatonicMinor => &[0, 2, 3, 5, 7, 8, 10],
            Scale::Dorian => &[0, 2, 3, 5, 7, 9, 10],
            Scale::HarmonicMinor => &[0, 2, 3, 5, 7, 8, 11],
            Scale::Indian => &[0, 1, 4, 5, 8, 10],
            Scale::Locrian => &[0, 1, 3, 5, 6, 8, 10],
            Scale::Lydian => &[0, 2, 4, 6, 7, 9, 10],
            Scale::Major => &[0, 2, 4, 5, 7, 9, 11],
            Scale::MelodicMinor => &[0, 2, 3, 5, 7, 9, 11],
            Scale::Minor => &[0, 2, 3, 5, 7, 8, 10],
            Scale::Mixolydian => &[0, 2, 4, 5, 7, 9, 10],
            Scale::NaturalMinor => &[0, 2, 3, 5, 7, 8, 10],
            Scale::Pentatonic => &[0, 2, 4, 7, 9],
            Scale::Phrygian => &[0, 1, 3, 5, 7, 8, 10],
            Scale::Turkish => &[0, 1, 3, 5, 7, 10, 11],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Scale::Aeolian => "Aeolian",
            Scale::Blues => "Blues",
            Scale::Chromatic => "Chromatic",
            Scale::DiatonicMinor => "Diatonic Minor",
            Scale::Dorian => "Dorian",
            Scale::HarmonicMinor => "Harmonic Minor",
            Scale::Indian => "Indian",
            Scale::Locrian => "Locrian",
            Scale::Lydian => "Lydian",
            Scale::Major => "Major",
            Scale::MelodicMinor => "Melodic Minor",
            Scale::Minor => "Minor",
            Scale::Mixolydian => "Mixolydian",
            Scale::NaturalMinor => "Natural Minor",
            Scale::Pentatonic => "Pentatonic",
            Scale::Phrygian => "Phrygian",
            Scale::Turkish => "Turkish",
        }
    }
}

/// Distances closer than this are treated as a tie
const TIE_EPSILON: f64 = 1e-9;

/// Nearest voltage whose pitch class is `root + degree` for some scale degree.
///
/// Ties go to the lower voltage.
pub fn closest_voltage_in_scale(voltage: f64, root: Note, scale: Scale) -> f64 {
    let octave = libm::floor(voltage);

    let mut closest = voltage;
    let mut closest_dist = f64::INFINITY;

    for k in -1..=1 {
        let base = octave + k as f64;
        for &degree in scale.semitones() {
            let pitch_class = (root.semitone() + degree).rem_euclid(12);
            let candidate = base + pitch_class as f64 / 12.0;
            let dist = (voltage - candidate).abs();
            let tie = (dist - closest_dist).abs() <= TIE_EPSILON;
            if (dist < closest_dist && !tie) || (tie && candidate < closest) {
                closest = candidate;
                closest_dist = dist;
            }
        }
    }

    closest
}

/// Linear map of `x` from `[in_min, in_max]` onto `[out_min, out_max]`
#[inline]
pub fn rescale(x: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    if in_max == in_min {
        return out_min;
    }
    out_min + (x - in_min) / (in_max - in_min) * (out_max - out_min)
}
