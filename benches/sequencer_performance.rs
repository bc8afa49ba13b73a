//! Sequencer Performance Benchmarks
//!
//! The engine runs once per sample, so a buffer of `N` samples must finish well
//! inside `N / sample_rate` seconds:
//!
//! | Sample Rate | Buffer 64  | Buffer 256 |
//! |-------------|------------|------------|
//! | 44.1 kHz    | 1.45 ms    | 5.80 ms    |
//! | 48 kHz      | 1.33 ms    | 5.33 ms    |
//! | 96 kHz      | 0.67 ms    | 2.67 ms    |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gridseq::prelude::*;

const SAMPLE_RATES: [f64; 3] = [44100.0, 48000.0, 96000.0];
const BUFFER_SIZES: [usize; 2] = [64, 256];

fn sequencer(sample_rate: f64) -> GridSequencer<Rng> {
    GridSequencer::with_rng(
        SequencerConfig::default().with_sample_rate(sample_rate),
        Rng::from_seed(42),
    )
}

/// Clock the cursor right every `period` samples and down every `3 * period`
fn clocked_frame(n: usize, period: usize) -> Frame {
    let high = |p: usize| if n % p < p / 2 { 5.0 } else { 0.0 };
    Frame {
        right_cv: high(period),
        down_cv: high(period * 3),
        ..Frame::default()
    }
}

fn bench_idle(c: &mut Criterion) {
    let mut group = c.benchmark_group("idle");

    for sample_rate in SAMPLE_RATES {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::from_parameter(sample_rate as u32),
            &sample_rate,
            |b, &sr| {
                let mut seq = sequencer(sr);
                let frame = Frame::default();
                b.iter(|| black_box(seq.process(black_box(&frame))));
            },
        );
    }

    group.finish();
}

fn bench_clocked_buffers(c: &mut Criterion) {
    let mut group = c.benchmark_group("clocked_buffers");

    for sample_rate in SAMPLE_RATES {
        for buffer_size in BUFFER_SIZES {
            let name = format!("{}Hz/{}", sample_rate as u32, buffer_size);
            let frames: Vec<Frame> = (0..buffer_size).map(|n| clocked_frame(n, 16)).collect();

            group.throughput(Throughput::Elements(buffer_size as u64));
            group.bench_with_input(BenchmarkId::new("steps", name), &frames, |b, frames| {
                let mut seq = sequencer(sample_rate);
                seq.set_scale(Scale::Major);
                b.iter(|| {
                    for frame in frames {
                        black_box(seq.process(frame));
                    }
                });
            });
        }
    }

    group.finish();
}

fn bench_randomize(c: &mut Criterion) {
    let mut group = c.benchmark_group("randomize");

    group.bench_function("notes_and_gates", |b| {
        let mut seq = sequencer(48000.0);
        let on = Frame {
            randomize_notes_cv: 10.0,
            randomize_gates_cv: 10.0,
            random_cv: 10.0,
            ..Frame::default()
        };
        let off = Frame::default();
        b.iter(|| {
            black_box(seq.process(&on));
            black_box(seq.process(&off));
        });
    });

    group.finish();
}

fn bench_quantizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("quantizer");

    for scale in [Scale::Chromatic, Scale::Major, Scale::Pentatonic] {
        group.bench_with_input(
            BenchmarkId::from_parameter(scale.name()),
            &scale,
            |b, &scale| {
                let mut v = 0.0;
                b.iter(|| {
                    v = (v + 0.013) % 10.0;
                    black_box(closest_voltage_in_scale(black_box(v), Note::A, scale))
                });
            },
        );
    }

    group.finish();
}

fn bench_graph_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_tick");

    group.bench_function("port_values", |b| {
        let mut seq = sequencer(48000.0);
        let mut inputs = PortValues::new();
        let mut outputs = PortValues::new();
        let mut n = 0usize;
        b.iter(|| {
            n += 1;
            inputs.set(input_ids::RIGHT, clocked_frame(n, 32).right_cv);
            seq.tick(&inputs, &mut outputs);
            black_box(outputs.get(output_ids::VOCT))
        });
    });

    group.finish();
}

criterion_group!(
    sequencer_benches,
    bench_idle,
    bench_clocked_buffers,
    bench_randomize,
);

criterion_group!(component_benches, bench_quantizer, bench_graph_tick);

criterion_main!(sequencer_benches, component_benches);
