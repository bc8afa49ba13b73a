//! Walking the Grid
//!
//! Clocks a right step every quarter second and a down step every second,
//! printing each step's cell, pitch, and gate in retrigger mode, then saves
//! and restores the discrete state.
//!
//! Run with: cargo run --example grid_walk

use gridseq::prelude::*;

fn main() {
    let sample_rate = 1000.0;
    let mut seq = GridSequencer::with_rng(
        SequencerConfig::default().with_sample_rate(sample_rate),
        Rng::from_seed(2024),
    );

    // A rising line across the first two rows
    for (i, note) in [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0].iter().enumerate() {
        seq.set_note(i, *note);
    }
    seq.set_root_note(Note::A);
    seq.set_scale(Scale::Minor);
    seq.set_volt_max(2.0);
    seq.set_gate_mode(GateMode::Retrigger);

    // Mute the last cell of each row
    for row in 0..GRID_SIZE {
        seq.set_gate(row * GRID_SIZE + GRID_SIZE - 1, false);
    }

    println!("=== Grid Walk ===\n");
    println!("{:>6}  {:>4}  {:>7}  {:>5}", "time", "cell", "pitch", "gate");

    let quarter = (sample_rate * 0.25) as usize;
    let mut last_index = usize::MAX;

    for n in 0..(sample_rate as usize * 4) {
        let clock = |period: usize| if n % period < period / 2 { 5.0 } else { 0.0 };
        let frame = Frame {
            right_cv: clock(quarter),
            down_cv: clock(quarter * 4),
            ..Frame::default()
        };
        seq.process(&frame);

        // Report one sample after each step, once the pulse has passed
        if seq.active_index() != last_index && n % quarter == 1 {
            let out = seq.outputs();
            println!(
                "{:>5.2}s  {:>4}  {:>6.3}V  {:>5}",
                n as f64 / sample_rate,
                seq.active_index(),
                out.pitch,
                if out.gate > 0.0 { "high" } else { "low" }
            );
            last_index = seq.active_index();
        }
    }

    println!("\n=== Saved State ===\n");
    match seq.save_json() {
        Ok(json) => {
            println!("{}", json);

            let mut restored = GridSequencer::new(sample_rate);
            if let Err(err) = restored.load_json(&json) {
                eprintln!("restore failed: {}", err);
                return;
            }
            println!(
                "\nrestored gate mode: {}, muted cells: {:?}",
                restored.gate_mode().name(),
                (0..NUM_CELLS)
                    .filter(|&i| restored.gate(i) == Some(false))
                    .collect::<Vec<_>>()
            );
        }
        Err(err) => eprintln!("save failed: {}", err),
    }
}
