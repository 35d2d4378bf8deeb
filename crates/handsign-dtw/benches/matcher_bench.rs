//! Criterion benchmarks for handsign-dtw: raw alignment and full-store recognition.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use handsign_dtw::{Matcher, MatcherConfig, RecognizeOptions, Sequence, SlopeDtw};

/// Six tracked joints, x and y each.
const DIM: usize = 12;

fn make_gesture(rng: &mut ChaCha8Rng, len: usize, phase: f64) -> Sequence {
    let rows = (0..len)
        .map(|t| {
            (0..DIM)
                .map(|d| (t as f64 * 0.15 + d as f64 + phase).sin() + rng.gen_range(-0.05..0.05))
                .collect()
        })
        .collect();
    Sequence::from_rows(rows).unwrap()
}

fn bench_align(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut group = c.benchmark_group("slope_dtw_align");

    for &len in &[32usize, 64, 128] {
        let a = make_gesture(&mut rng, len, 0.0);
        let b = make_gesture(&mut rng, len, 0.1);
        let dtw = SlopeDtw::new(2);
        group.bench_with_input(BenchmarkId::from_parameter(len), &(a, b), |bencher, (a, b)| {
            bencher.iter(|| dtw.align(a, b).unwrap());
        });
    }

    group.finish();
}

fn bench_recognize(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let config = MatcherConfig::for_dimension(DIM).unwrap();
    let mut matcher = Matcher::new(config);
    for i in 0..200 {
        let phase = (i % 20) as f64 * 0.3;
        let gesture = make_gesture(&mut rng, 60, phase);
        matcher.add(gesture, format!("gesture-{}", i % 20)).unwrap();
    }
    let query = make_gesture(&mut rng, 60, 0.9);

    let mut group = c.benchmark_group("recognize_200x60");
    for (label, parallel) in [("serial", false), ("parallel", true)] {
        let options = RecognizeOptions::new().with_parallel(parallel);
        group.bench_function(label, |b| {
            b.iter(|| matcher.recognize_with(&query, &options).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_align, bench_recognize);
criterion_main!(benches);
