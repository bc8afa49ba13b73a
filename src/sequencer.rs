//! Grid Sequencer
//!
//! A 16-cell step sequencer laid out as a 4×4 torus. Direction, repeat and
//! random-direction triggers move a cursor between cells; every step fires a
//! short pulse that the gate mode shapes into the gate output, and the active
//! cell's note is quantized to a scale for the pitch output.
//!
//! Several triggers may fire in the same sample. They are applied in a fixed
//! order (repeat, random, right, left, down, up) and compose, so right and down
//! together move the cursor diagonally.

use crate::config::SequencerConfig;
use crate::gate::{self, GateMode};
use crate::grid::{Cursor, Direction, NUM_CELLS};
use crate::light::{self, Lights};
use crate::port::{
    GraphModule, ParamDef, ParamId, ParamRange, PortDef, PortId, PortSpec, PortValues, SignalKind,
};
use crate::rng::{RandomSource, Rng};
use crate::scale::{self, Note, Scale};
use crate::state::{PersistedState, StateError};
use crate::trigger::{PulseGenerator, SchmittTrigger};

/// Gate output level while high
pub const GATE_HIGH: f64 = 10.0;

/// Upper bound of the output voltage range
pub const VOLT_MAX_LIMIT: f64 = 10.0;

/// Default position of the per-cell note knobs
pub const DEFAULT_NOTE: f64 = 3.0;

/// Default position of the voltage range knob
pub const DEFAULT_VOLT_MAX: f64 = 5.0;

/// Input jack identifiers
pub mod input_ids {
    use crate::port::PortId;

    pub const RESET: PortId = 0;
    pub const RIGHT: PortId = 1;
    pub const LEFT: PortId = 2;
    pub const DOWN: PortId = 3;
    pub const UP: PortId = 4;
    pub const REPEAT: PortId = 5;
    pub const RANDOM: PortId = 6;
    pub const RANDOMIZE_NOTES: PortId = 7;
    pub const RANDOMIZE_GATES: PortId = 8;
    pub const VOLT_MAX: PortId = 9;
}

/// Output jack identifiers
pub mod output_ids {
    use crate::port::PortId;

    pub const GATE: PortId = 10;
    pub const VOCT: PortId = 11;
}

/// Panel control identifiers
pub mod param_ids {
    use crate::grid::NUM_CELLS;
    use crate::port::ParamId;

    /// First of 16 note knobs
    pub const CELL_NOTE: ParamId = 0;
    /// First of 16 gate buttons
    pub const CELL_GATE: ParamId = CELL_NOTE + NUM_CELLS as ParamId;
    pub const ROOT_NOTE: ParamId = CELL_GATE + NUM_CELLS as ParamId;
    pub const SCALE: ParamId = ROOT_NOTE + 1;
    pub const VOLT_MAX: ParamId = SCALE + 1;
    pub const RUN: ParamId = VOLT_MAX + 1;
    pub const RESET: ParamId = RUN + 1;
    pub const RIGHT: ParamId = RESET + 1;
    pub const LEFT: ParamId = RIGHT + 1;
    pub const DOWN: ParamId = LEFT + 1;
    pub const UP: ParamId = DOWN + 1;
    pub const RANDOM: ParamId = UP + 1;
    pub const REPEAT: ParamId = RANDOM + 1;
    pub const COUNT: usize = REPEAT as usize + 1;
}

/// Raw control levels for one sample.
///
/// Buttons read 0.0 released and 1.0 pressed. Each button is summed with its
/// matching CV jack before edge detection.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Frame {
    pub run_button: f64,
    pub reset_button: f64,
    pub reset_cv: f64,
    pub right_button: f64,
    pub right_cv: f64,
    pub left_button: f64,
    pub left_cv: f64,
    pub down_button: f64,
    pub down_cv: f64,
    pub up_button: f64,
    pub up_cv: f64,
    pub repeat_button: f64,
    pub repeat_cv: f64,
    pub random_button: f64,
    pub random_cv: f64,
    pub randomize_notes_cv: f64,
    pub randomize_gates_cv: f64,
    pub volt_max_cv: f64,
    pub gate_buttons: [f64; NUM_CELLS],
}

impl Frame {
    /// Summed button and CV level for a direction
    pub fn direction(&self, direction: Direction) -> f64 {
        match direction {
            Direction::Right => self.right_button + self.right_cv,
            Direction::Left => self.left_button + self.left_cv,
            Direction::Down => self.down_button + self.down_cv,
            Direction::Up => self.up_button + self.up_cv,
        }
    }

    fn direction_button_mut(&mut self, direction: Direction) -> &mut f64 {
        match direction {
            Direction::Right => &mut self.right_button,
            Direction::Left => &mut self.left_button,
            Direction::Down => &mut self.down_button,
            Direction::Up => &mut self.up_button,
        }
    }
}

/// Output voltages for one sample
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Outputs {
    /// 1V/octave pitch, held while the gate is low
    pub pitch: f64,
    /// 0V or 10V
    pub gate: f64,
}

#[derive(Debug, Clone, Copy, Default)]
struct Triggers {
    run: SchmittTrigger,
    reset: SchmittTrigger,
    randomize_notes: SchmittTrigger,
    randomize_gates: SchmittTrigger,
    repeat: SchmittTrigger,
    random: SchmittTrigger,
    /// Indexed in `Direction::ALL` order
    directions: [SchmittTrigger; 4],
    gates: [SchmittTrigger; NUM_CELLS],
}

/// 4×4 grid step sequencer engine
pub struct GridSequencer<R = Rng> {
    config: SequencerConfig,
    sample_rate: f64,

    notes: [f64; NUM_CELLS],
    gates: [bool; NUM_CELLS],
    cursor: Cursor,
    active_index: usize,

    running: bool,
    ignore_gate_on_pitch_out: bool,
    gate_mode: GateMode,

    root_note: Note,
    scale: Scale,
    volt_max: f64,

    pulse: PulseGenerator,
    triggers: Triggers,
    lights: Lights,
    outputs: Outputs,
    rng: R,

    // Button positions held for graph hosting
    panel: Frame,
    spec: PortSpec,
    param_defs: Vec<ParamDef>,
}

impl GridSequencer<Rng> {
    /// Create a sequencer with default configuration and a time-seeded RNG
    pub fn new(sample_rate: f64) -> Self {
        Self::with_rng(
            SequencerConfig::default().with_sample_rate(sample_rate),
            Rng::default(),
        )
    }
}

impl Default for GridSequencer<Rng> {
    fn default() -> Self {
        Self::new(44100.0)
    }
}

impl<R: RandomSource> GridSequencer<R> {
    pub fn with_rng(config: SequencerConfig, rng: R) -> Self {
        let config = config.sanitized();
        Self {
            config,
            sample_rate: config.sample_rate,
            notes: [DEFAULT_NOTE.min(config.note_max); NUM_CELLS],
            gates: [true; NUM_CELLS],
            cursor: Cursor::default(),
            active_index: 0,
            running: true,
            ignore_gate_on_pitch_out: false,
            gate_mode: GateMode::default(),
            root_note: Note::default(),
            scale: Scale::default(),
            volt_max: DEFAULT_VOLT_MAX,
            pulse: PulseGenerator::new(),
            triggers: Triggers::default(),
            lights: Lights::default(),
            outputs: Outputs::default(),
            rng,
            panel: Frame::default(),
            spec: Self::port_spec_def(),
            param_defs: Self::param_defs(config.note_max),
        }
    }

    fn port_spec_def() -> PortSpec {
        PortSpec {
            inputs: vec![
                PortDef::new(input_ids::RESET, "reset", SignalKind::Trigger),
                PortDef::new(input_ids::RIGHT, "right", SignalKind::Trigger),
                PortDef::new(input_ids::LEFT, "left", SignalKind::Trigger),
                PortDef::new(input_ids::DOWN, "down", SignalKind::Trigger),
                PortDef::new(input_ids::UP, "up", SignalKind::Trigger),
                PortDef::new(input_ids::REPEAT, "repeat", SignalKind::Trigger),
                PortDef::new(input_ids::RANDOM, "random", SignalKind::Trigger),
                PortDef::new(input_ids::RANDOMIZE_NOTES, "rnd_notes", SignalKind::Trigger),
                PortDef::new(input_ids::RANDOMIZE_GATES, "rnd_gates", SignalKind::Trigger),
                PortDef::new(input_ids::VOLT_MAX, "volt_max", SignalKind::CvUnipolar),
            ],
            outputs: vec![
                PortDef::new(output_ids::GATE, "gate", SignalKind::Gate),
                PortDef::new(output_ids::VOCT, "voct", SignalKind::VoltPerOctave),
            ],
        }
    }

    fn param_defs(note_max: f64) -> Vec<ParamDef> {
        let mut defs = Vec::with_capacity(param_ids::COUNT);
        for i in 0..NUM_CELLS {
            defs.push(ParamDef::new(
                param_ids::CELL_NOTE + i as ParamId,
                format!("note_{}", i),
                DEFAULT_NOTE.min(note_max),
                ParamRange::Linear {
                    min: 0.0,
                    max: note_max,
                },
            ));
        }
        for i in 0..NUM_CELLS {
            defs.push(ParamDef::button(
                param_ids::CELL_GATE + i as ParamId,
                format!("gate_{}", i),
            ));
        }
        defs.push(ParamDef::new(
            param_ids::ROOT_NOTE,
            "root_note",
            Note::default() as u32 as f64,
            ParamRange::Stepped {
                count: Note::COUNT as u32,
            },
        ));
        defs.push(ParamDef::new(
            param_ids::SCALE,
            "scale",
            Scale::default() as u32 as f64,
            ParamRange::Stepped {
                count: Scale::COUNT as u32,
            },
        ));
        defs.push(ParamDef::new(
            param_ids::VOLT_MAX,
            "volt_max",
            DEFAULT_VOLT_MAX,
            ParamRange::Linear {
                min: 0.0,
                max: VOLT_MAX_LIMIT,
            },
        ));
        defs.push(ParamDef::button(param_ids::RUN, "run"));
        defs.push(ParamDef::button(param_ids::RESET, "reset"));
        defs.push(ParamDef::button(param_ids::RIGHT, "right"));
        defs.push(ParamDef::button(param_ids::LEFT, "left"));
        defs.push(ParamDef::button(param_ids::DOWN, "down"));
        defs.push(ParamDef::button(param_ids::UP, "up"));
        defs.push(ParamDef::button(param_ids::RANDOM, "random"));
        defs.push(ParamDef::button(param_ids::REPEAT, "repeat"));
        defs
    }

    /// Advance one sample.
    pub fn process(&mut self, frame: &Frame) -> Outputs {
        if self.triggers.run.process(frame.run_button) {
            self.running = !self.running;
        }
        self.lights.running = if self.running { 1.0 } else { 0.0 };

        let mut next_step = false;
        if self
            .triggers
            .reset
            .process(frame.reset_button + frame.reset_cv)
        {
            self.cursor.reset();
            self.active_index = 0;
            next_step = true;
            self.lights.reset = 1.0;
        }

        if self.running {
            if self
                .triggers
                .randomize_notes
                .process(frame.randomize_notes_cv)
            {
                self.randomize_notes();
            }

            if self
                .triggers
                .randomize_gates
                .process(frame.randomize_gates_cv)
            {
                self.randomize_gates();
            }

            if self
                .triggers
                .repeat
                .process(frame.repeat_button + frame.repeat_cv)
            {
                next_step = true;
            }

            if self
                .triggers
                .random
                .process(frame.random_button + frame.random_cv)
            {
                next_step = true;
                let direction = Direction::random(&mut self.rng);
                self.cursor.step(direction);
            }

            for (trigger, direction) in self
                .triggers
                .directions
                .iter_mut()
                .zip(Direction::ALL)
            {
                if trigger.process(frame.direction(direction)) {
                    next_step = true;
                    self.cursor.step(direction);
                }
            }
        }

        if next_step {
            self.active_index = self.cursor.index();
            self.lights.steps[self.active_index] = 1.0;
            self.pulse.trigger(self.config.pulse_duration);
        }

        let lambda = self.config.light_lambda;
        self.lights.reset = light::decay(self.lights.reset, lambda, self.sample_rate);
        let pulse = self.pulse.process(1.0 / self.sample_rate);

        let mut gates_on = false;
        for i in 0..NUM_CELLS {
            if self.triggers.gates[i].process(frame.gate_buttons[i]) {
                self.gates[i] = !self.gates[i];
            }

            let is_current = i == self.active_index;
            let gate_on = gate::resolve(
                self.gates[i],
                is_current,
                self.running,
                pulse,
                self.gate_mode,
            );
            if is_current {
                gates_on = gate_on;
            }

            if self.lights.steps[i] > 0.0 {
                self.lights.steps[i] = light::decay(self.lights.steps[i], lambda, self.sample_rate);
            }
            self.lights.gates[i] = light::gate_level(self.gates[i], self.lights.steps[i]);
        }

        if gates_on || self.ignore_gate_on_pitch_out {
            let note = self.notes[self.active_index];
            self.outputs.pitch = self.quantize_note(note, frame.volt_max_cv);
        }
        self.outputs.gate = if gates_on { GATE_HIGH } else { 0.0 };

        self.outputs
    }

    /// Quantized output voltage for a cell's note, `None` past the last cell
    pub fn quantized_pitch(&self, index: usize, volt_max_cv: f64) -> Option<f64> {
        let note = self.notes.get(index).copied()?;
        Some(self.quantize_note(note, volt_max_cv))
    }

    fn quantize_note(&self, note: f64, volt_max_cv: f64) -> f64 {
        let total_max = (self.volt_max + volt_max_cv).clamp(0.0, VOLT_MAX_LIMIT);
        let scaled = scale::rescale(note, 0.0, self.config.note_max, 0.0, total_max);
        scale::closest_voltage_in_scale(scaled, self.root_note, self.scale)
    }

    /// A fresh uniform note in `[0, note_max)`
    pub fn random_note(&mut self) -> f64 {
        self.rng.uniform() * self.config.note_max
    }

    /// Replace every cell's note with a random one
    pub fn randomize_notes(&mut self) {
        for i in 0..NUM_CELLS {
            self.notes[i] = self.random_note();
        }
    }

    /// Replace every cell's gate with a coin flip
    pub fn randomize_gates(&mut self) {
        for gate in self.gates.iter_mut() {
            *gate = self.rng.coin();
        }
    }

    /// Host "randomize" action
    pub fn randomize(&mut self) {
        self.randomize_gates();
    }

    /// Host "initialize" action: every cell gated
    pub fn initialize(&mut self) {
        self.gates = [true; NUM_CELLS];
    }

    /// Return transport state to power-on: cursor home, pulse and lights
    /// cleared, outputs at zero.
    ///
    /// Edge detectors keep their state, so an input held high across the
    /// reset does not fire again.
    pub fn reset_transport(&mut self) {
        self.cursor.reset();
        self.active_index = 0;
        self.pulse.reset();
        self.lights = Lights::default();
        self.outputs = Outputs::default();
        self.panel = Frame::default();
    }

    pub fn set_gate_mode(&mut self, mode: GateMode) {
        log::debug!("gate mode set to {}", mode.name());
        self.gate_mode = mode;
    }

    pub fn gate_mode(&self) -> GateMode {
        self.gate_mode
    }

    pub fn set_ignore_gate_on_pitch_out(&mut self, ignore: bool) {
        log::debug!("ignore gate on pitch out: {}", ignore);
        self.ignore_gate_on_pitch_out = ignore;
    }

    pub fn ignore_gate_on_pitch_out(&self) -> bool {
        self.ignore_gate_on_pitch_out
    }

    pub fn set_root_note(&mut self, root: Note) {
        self.root_note = root;
    }

    pub fn root_note(&self) -> Note {
        self.root_note
    }

    pub fn set_scale(&mut self, scale: Scale) {
        self.scale = scale;
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// Voltage range knob, clamped to `[0, 10]`
    pub fn set_volt_max(&mut self, volt_max: f64) {
        self.volt_max = volt_max.clamp(0.0, VOLT_MAX_LIMIT);
    }

    pub fn volt_max(&self) -> f64 {
        self.volt_max
    }

    /// Note knob edit, clamped to `[0, note_max]`
    pub fn set_note(&mut self, index: usize, value: f64) {
        if index < NUM_CELLS {
            self.notes[index] = value.clamp(0.0, self.config.note_max);
        }
    }

    pub fn note(&self, index: usize) -> Option<f64> {
        self.notes.get(index).copied()
    }

    pub fn notes(&self) -> &[f64; NUM_CELLS] {
        &self.notes
    }

    pub fn set_gate(&mut self, index: usize, enabled: bool) {
        if index < NUM_CELLS {
            self.gates[index] = enabled;
        }
    }

    pub fn gate(&self, index: usize) -> Option<bool> {
        self.gates.get(index).copied()
    }

    pub fn gates(&self) -> &[bool; NUM_CELLS] {
        &self.gates
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn lights(&self) -> &Lights {
        &self.lights
    }

    pub fn outputs(&self) -> Outputs {
        self.outputs
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Snapshot of the fields that persist across sessions
    pub fn persisted_state(&self) -> PersistedState {
        PersistedState {
            running: self.running,
            ignore_gate_on_pitch_out: self.ignore_gate_on_pitch_out,
            gates: self.gates,
            gate_mode: self.gate_mode,
        }
    }

    pub fn apply_persisted_state(&mut self, state: PersistedState) {
        self.running = state.running;
        self.ignore_gate_on_pitch_out = state.ignore_gate_on_pitch_out;
        self.gates = state.gates;
        self.gate_mode = state.gate_mode;
    }

    /// Restore from a saved document. Absent or malformed fields keep their
    /// current values.
    pub fn load_state(&mut self, value: &serde_json::Value) -> Result<(), StateError> {
        let mut state = self.persisted_state();
        state.merge(value)?;
        self.apply_persisted_state(state);
        Ok(())
    }

    pub fn save_json(&self) -> Result<String, StateError> {
        self.persisted_state().to_json()
    }

    pub fn load_json(&mut self, json: &str) -> Result<(), StateError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        self.load_state(&value)
    }

    fn direction_param(id: ParamId) -> Option<Direction> {
        match id {
            param_ids::RIGHT => Some(Direction::Right),
            param_ids::LEFT => Some(Direction::Left),
            param_ids::DOWN => Some(Direction::Down),
            param_ids::UP => Some(Direction::Up),
            _ => None,
        }
    }

    fn frame_from_ports(&self, inputs: &PortValues) -> Frame {
        let cv = |id: PortId| {
            let default = self.spec.input_by_id(id).map_or(0.0, |port| port.default);
            inputs.get_or(id, default)
        };
        Frame {
            reset_cv: cv(input_ids::RESET),
            right_cv: cv(input_ids::RIGHT),
            left_cv: cv(input_ids::LEFT),
            down_cv: cv(input_ids::DOWN),
            up_cv: cv(input_ids::UP),
            repeat_cv: cv(input_ids::REPEAT),
            random_cv: cv(input_ids::RANDOM),
            randomize_notes_cv: cv(input_ids::RANDOMIZE_NOTES),
            randomize_gates_cv: cv(input_ids::RANDOMIZE_GATES),
            volt_max_cv: cv(input_ids::VOLT_MAX),
            ..self.panel
        }
    }
}

impl<R: RandomSource + Send + Sync> GraphModule for GridSequencer<R> {
    fn port_spec(&self) -> &PortSpec {
        &self.spec
    }

    fn tick(&mut self, inputs: &PortValues, outputs: &mut PortValues) {
        let frame = self.frame_from_ports(inputs);
        let out = self.process(&frame);

        outputs.set(output_ids::GATE, out.gate);
        outputs.set(output_ids::VOCT, out.pitch);
    }

    fn reset(&mut self) {
        self.reset_transport();
    }

    fn set_sample_rate(&mut self, sample_rate: f64) {
        if sample_rate.is_finite() && sample_rate > 0.0 {
            self.sample_rate = sample_rate;
        } else {
            log::warn!("ignoring invalid sample rate {}", sample_rate);
        }
    }

    fn params(&self) -> &[ParamDef] {
        &self.param_defs
    }

    fn get_param(&self, id: ParamId) -> Option<f64> {
        match id {
            _ if id < param_ids::CELL_GATE => {
                self.notes.get((id - param_ids::CELL_NOTE) as usize).copied()
            }
            _ if id < param_ids::ROOT_NOTE => self
                .panel
                .gate_buttons
                .get((id - param_ids::CELL_GATE) as usize)
                .copied(),
            param_ids::ROOT_NOTE => Some(self.root_note.semitone() as f64),
            param_ids::SCALE => Some(self.scale as u32 as f64),
            param_ids::VOLT_MAX => Some(self.volt_max),
            param_ids::RUN => Some(self.panel.run_button),
            param_ids::RESET => Some(self.panel.reset_button),
            param_ids::RANDOM => Some(self.panel.random_button),
            param_ids::REPEAT => Some(self.panel.repeat_button),
            _ => {
                let direction = Self::direction_param(id)?;
                Some(match direction {
                    Direction::Right => self.panel.right_button,
                    Direction::Left => self.panel.left_button,
                    Direction::Down => self.panel.down_button,
                    Direction::Up => self.panel.up_button,
                })
            }
        }
    }

    fn set_param(&mut self, id: ParamId, value: f64) {
        let Some(range) = self.param_defs.get(id as usize).map(|def| def.range) else {
            return;
        };
        let value = range.clamp(value);

        match id {
            _ if id < param_ids::CELL_GATE => self.set_note((id - param_ids::CELL_NOTE) as usize, value),
            _ if id < param_ids::ROOT_NOTE => {
                self.panel.gate_buttons[(id - param_ids::CELL_GATE) as usize] = value
            }
            param_ids::ROOT_NOTE => self.root_note = Note::from_index(value as i64),
            param_ids::SCALE => self.scale = Scale::from_index(value as i64),
            param_ids::VOLT_MAX => self.set_volt_max(value),
            param_ids::RUN => self.panel.run_button = value,
            param_ids::RESET => self.panel.reset_button = value,
            param_ids::RANDOM => self.panel.random_button = value,
            param_ids::REPEAT => self.panel.repeat_button = value,
            _ => {
                if let Some(direction) = Self::direction_param(id) {
                    *self.panel.direction_button_mut(direction) = value;
                }
            }
        }
    }

    fn type_id(&self) -> &'static str {
        "grid_sequencer"
    }

    fn serialize_state(&self) -> Option<serde_json::Value> {
        Some(self.persisted_state().to_value())
    }

    fn deserialize_state(&mut self, state: &serde_json::Value) -> Result<(), String> {
        self.load_state(state).map_err(|e| e.to_string())
    }
}
