use criterion::{criterion_group, criterion_main, Criterion};
use sim_ai::{run_autoplay, Autoplayer};
use sim_core::{Catalog, FarmConfig};
use sim_runtime::Farm;
use std::hint::black_box;

fn bench_autoplay(c: &mut Criterion) {
    let cfg = FarmConfig {
        rows: 16,
        columns: 16,
        starting_balance: 50_000,
        ..FarmConfig::default()
    };
    let farm0 = Farm::new(&cfg).unwrap();
    let player0 = Autoplayer::new(Catalog::with_defaults(), 42);
    c.bench_function("autoplay 16x16 x 1y", |b| {
        b.iter(|| {
            let mut farm = farm0.clone();
            let mut player = player0.clone();
            black_box(run_autoplay(&mut farm, &mut player, 365).unwrap())
        })
    });
}

criterion_group!(benches, bench_autoplay);
criterion_main!(benches);
