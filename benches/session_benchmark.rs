//! Benchmarks for the session hot paths.
//!
//! Covers the per-frame reel tick, a full scripted session and a small
//! parallel batch, which is what `slots simulate` spends its time on.

#![allow(missing_docs)]

use std::hint::black_box;
use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};
use slots::sim::{SimConfig, Strategy, run_batch, run_session};
use slots::{ReelBank, SeededRandom};

fn bench_reel_spin(c: &mut Criterion) {
    let frame = Duration::from_millis(16);

    c.bench_function("reel_spin_to_rest", |b| {
        let mut rng = SeededRandom::new(Some(42));
        b.iter(|| {
            let mut bank = ReelBank::default();
            let mut now = Duration::ZERO;
            bank.spin(now);
            while bank.is_spinning() {
                now += frame;
                bank.tick(now, &mut rng);
            }
            black_box(bank.is_winning_round())
        });
    });
}

fn bench_single_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_session");
    for strategy in [Strategy::Spin, Strategy::Nudge, Strategy::Hold] {
        let config = SimConfig {
            strategy,
            ..SimConfig::default()
        };
        group.bench_function(format!("{strategy:?}").to_lowercase(), |b| {
            b.iter(|| run_session(black_box(42), black_box(&config)));
        });
    }
    group.finish();
}

fn bench_session_batch(c: &mut Criterion) {
    let config = SimConfig::default();

    c.bench_function("100_sessions_parallel", |b| {
        b.iter(|| {
            let summary = run_batch(black_box(0), 100, &config, || {});
            black_box(summary)
        });
    });
}

criterion_group!(benches, bench_reel_spin, bench_single_session, bench_session_batch);
criterion_main!(benches);
