//! # gridseq: 4×4 Grid Step Sequencer
//!
//! `gridseq` is the per-sample engine of a modular step sequencer. A cursor walks
//! a 4×4 toroidal grid of cells under direction, repeat and random triggers; the
//! active cell drives a scale-quantized 1V/octave pitch output and a gate output
//! shaped by one of three gate modes.
//!
//! ## Architecture
//!
//! - **Edge detection and pulses** - [`trigger`] turns control voltages into
//!   one-shot edges and times the step pulse in seconds
//! - **Quantization** - [`scale`] snaps voltages to a scale rooted at any note
//! - **Navigation** - [`grid`] wraps the cursor on every axis
//! - **Gate modes** - [`gate`] combines the cell's gate flag with the pulse phase
//! - **Engine** - [`sequencer`] runs the above once per sample and exposes the
//!   same engine as a [`GraphModule`] for hosts that patch modules by port
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gridseq::prelude::*;
//!
//! let mut seq = GridSequencer::with_rng(
//!     SequencerConfig::default().with_sample_rate(48000.0),
//!     Rng::from_seed(7),
//! );
//! seq.set_scale(Scale::Dorian);
//! seq.set_gate_mode(GateMode::Continuous);
//!
//! // Step right on a rising edge
//! let out = seq.process(&Frame { right_cv: 5.0, ..Frame::default() });
//! assert_eq!(out.gate, 10.0);
//! ```

pub mod config;
pub mod gate;
pub mod grid;
pub mod light;
pub mod port;
pub mod rng;
pub mod scale;
pub mod sequencer;
pub mod state;
pub mod trigger;

/// Prelude module for convenient imports
pub mod prelude {
    // Host interface
    pub use crate::port::{
        GraphModule, ParamDef, ParamId, ParamRange, PortDef, PortId, PortSpec, PortValues,
        SignalKind,
    };

    // Building blocks
    pub use crate::gate::{resolve, GateMode};
    pub use crate::grid::{Cursor, Direction, GRID_SIZE, NUM_CELLS};
    pub use crate::light::Lights;
    pub use crate::scale::{closest_voltage_in_scale, rescale, Note, Scale};
    pub use crate::trigger::{PulseGenerator, SchmittTrigger};

    // Randomness
    #[cfg(feature = "std")]
    pub use crate::rng::ThreadRandom;
    pub use crate::rng::{RandomSource, Rng, SequenceRandom};

    // Engine
    pub use crate::config::SequencerConfig;
    pub use crate::sequencer::{
        input_ids, output_ids, param_ids, Frame, GridSequencer, Outputs, GATE_HIGH,
    };
    pub use crate::state::{PersistedState, StateError, StatePatch};
}

// Re-export key types at crate root for convenience
pub use prelude::*;
