//! Benchmarks for posterior feature correction

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use echolink_core::{LinkConfig, Spectrogram};
use echolink_pfc::{decode_energy_floor, PosteriorCorrector};

fn floor_bytes() -> Vec<u8> {
    (0..32).map(|i| if i % 4 == 0 { 0 } else { (i * 8) as u8 }).collect()
}

fn bench_decode_energy_floor(c: &mut Criterion) {
    let bytes = floor_bytes();

    c.bench_function("decode_energy_floor_100", |b| {
        b.iter(|| decode_energy_floor(black_box(&bytes), 32, 100))
    });

    c.bench_function("decode_energy_floor_1000", |b| {
        b.iter(|| decode_energy_floor(black_box(&bytes), 32, 1000))
    });
}

fn bench_apply_correction(c: &mut Criterion) {
    let corrector = PosteriorCorrector::new(LinkConfig::default()).unwrap();
    let bytes = floor_bytes();
    let spec = Spectrogram::filled(100, 80, 0.5);

    c.bench_function("apply_correction_100x80", |b| {
        b.iter(|| corrector.apply_correction(black_box(&spec), black_box(&bytes), 0.1))
    });
}

fn bench_apply_correction_in_place(c: &mut Criterion) {
    let corrector = PosteriorCorrector::new(LinkConfig::default()).unwrap();
    let bytes = floor_bytes();
    let mut spec = Spectrogram::filled(100, 80, 0.5);

    c.bench_function("apply_correction_in_place_100x80", |b| {
        b.iter(|| corrector.apply_correction_in_place(black_box(&mut spec), black_box(&bytes), 0.1))
    });
}

criterion_group!(
    benches,
    bench_decode_energy_floor,
    bench_apply_correction,
    bench_apply_correction_in_place
);
criterion_main!(benches);
