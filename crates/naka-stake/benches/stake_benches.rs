//! Criterion benchmarks for naka-stake critical operations.
//!
//! Covers: coefficient computation over large validator sets and decimal
//! weight normalization.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use naka_core::network::NetworkId;
use naka_core::types::{StakeDistribution, Threshold, Weight};
use naka_stake::{coefficient, collect_distribution, normalize_decimal};

fn flat_distribution(validators: u64) -> StakeDistribution {
    // 18-decimal token amounts, the common case for EVM-style chains.
    let unit = Weight::from(10u64).pow(18);
    StakeDistribution::from_weights((1..=validators).map(|i| &unit * i))
}

fn bench_coefficient(c: &mut Criterion) {
    let dist = flat_distribution(1_000);
    let threshold = Threshold::default();

    c.bench_function("coefficient_1000_validators", |b| {
        b.iter(|| coefficient(black_box(&dist), black_box(threshold)))
    });
}

fn bench_normalize(c: &mut Criterion) {
    let raws: Vec<String> = (0..1_000u64)
        .map(|i| format!("{}000000000000000000", i + 1))
        .collect();

    c.bench_function("collect_distribution_1000_decimal", |b| {
        b.iter(|| {
            collect_distribution(
                NetworkId::Nam,
                black_box(&raws).iter().map(String::as_str),
                normalize_decimal,
            )
        })
    });
}

criterion_group!(benches, bench_coefficient, bench_normalize);
criterion_main!(benches);
