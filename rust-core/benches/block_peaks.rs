//! Performance benchmarks for block peak analysis

use block_spectrum::spectrum::{fft_in_place, FftEngine};
use block_spectrum::{block_peaks, AnalysisConfig, BLOCK_SIZE};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use num_complex::Complex;

fn synthetic_waveform(len: usize) -> Vec<i16> {
    (0..len)
        .map(|i| ((i as f64 * 440.0 * 2.0 * std::f64::consts::PI / 44_100.0).sin() * 16_000.0) as i16)
        .collect()
}

fn bench_fft(c: &mut Criterion) {
    let input: Vec<Complex<f64>> = (0..BLOCK_SIZE)
        .map(|i| Complex::new((i as f64 * 0.01).sin(), 0.0))
        .collect();
    let engine = FftEngine::new(BLOCK_SIZE).unwrap();

    c.bench_function("fft_in_place_4096", |b| {
        b.iter(|| {
            let mut buffer = input.clone();
            fft_in_place(black_box(&mut buffer));
            buffer
        });
    });

    c.bench_function("fft_engine_4096", |b| {
        b.iter(|| {
            let mut buffer = input.clone();
            engine.process(black_box(&mut buffer));
            buffer
        });
    });
}

fn bench_block_peaks(c: &mut Criterion) {
    // 30 seconds at 44.1 kHz
    let samples = synthetic_waveform(44_100 * 30);
    let sequential = AnalysisConfig::default();
    let parallel = AnalysisConfig::default().with_parallel(true);

    c.bench_function("block_peaks_30s", |b| {
        b.iter(|| block_peaks(black_box(&samples), black_box(&sequential)));
    });

    c.bench_function("block_peaks_30s_parallel", |b| {
        b.iter(|| block_peaks(black_box(&samples), black_box(&parallel)));
    });
}

criterion_group!(benches, bench_fft, bench_block_peaks);
criterion_main!(benches);
