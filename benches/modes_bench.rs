use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use matview::{get_modes, get_modes_and_gaps, ModeParams};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn histogram(len: usize, rng: &mut StdRng) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let x = i as f64 / len as f64;
            let peak = 200.0 * (-((x - 0.3) * 12.0).powi(2)).exp();
            peak + rng.gen_range(0.0..10.0)
        })
        .collect()
}

fn bench_modes(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let mut group = c.benchmark_group("get_modes");
    for len in [16usize, 64, 256] {
        let hist = histogram(len, &mut rng);
        let linear = ModeParams::default();
        let circular = ModeParams::default().with_circular(true);

        group.bench_with_input(BenchmarkId::new("linear", len), &len, |b, _| {
            b.iter(|| get_modes(black_box(&hist), &linear).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("circular", len), &len, |b, _| {
            b.iter(|| get_modes(black_box(&hist), &circular).unwrap())
        });
    }
    group.finish();
}

fn bench_modes_and_gaps_gaussian(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(2);
    let hist = histogram(128, &mut rng);
    let params = ModeParams::default().with_gaussian(1.0, 0.5).with_eps(1.0);
    c.bench_function("get_modes_and_gaps_gaussian_128", |b| {
        b.iter(|| get_modes_and_gaps(black_box(&hist), &params).unwrap())
    });
}

criterion_group!(benches, bench_modes, bench_modes_and_gaps_gaussian);
criterion_main!(benches);
