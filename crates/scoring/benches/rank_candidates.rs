//! Benchmarks for candidate ranking
//!
//! Run with: cargo bench --package scoring
//!
//! Scoring runs once per window close, so the interesting size is a few
//! hundred candidates against one aggregate.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use events::{AggregatedPreference, CandidateRestaurant};
use scoring::rank;
use std::collections::BTreeSet;

fn build_aggregate() -> AggregatedPreference {
    AggregatedPreference {
        top_cuisines: vec![
            "mexican".to_string(),
            "thai".to_string(),
            "korean".to_string(),
        ],
        dietary_restrictions: ["vegan", "gluten-free"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        budget_level: 2,
    }
}

fn build_candidates(count: usize) -> Vec<CandidateRestaurant> {
    let pools: [&[&str]; 4] = [
        &["mexican", "tacos"],
        &["thai"],
        &["korean", "kbbq"],
        &["diners", "burgers"],
    ];
    let flags: [&[&str]; 3] = [&[], &["vegan"], &["vegan", "gluten-free", "kosher"]];

    (0..count)
        .map(|i| CandidateRestaurant {
            id: format!("r{}", i),
            name: Some(format!("Restaurant {}", i)),
            categories: pools[i % pools.len()].iter().map(|s| s.to_string()).collect(),
            price_level: Some((i % 3 + 1) as u8),
            dietary_flags: flags[i % flags.len()]
                .iter()
                .map(|s| s.to_string())
                .collect::<BTreeSet<String>>(),
            rating: None,
            address: None,
        })
        .collect()
}

fn bench_rank_200(c: &mut Criterion) {
    let aggregate = build_aggregate();
    let candidates = build_candidates(200);

    c.bench_function("rank_200_candidates", |b| {
        b.iter(|| {
            let ranked = rank(black_box(&aggregate), black_box(candidates.clone()), 10);
            black_box(ranked)
        })
    });
}

fn bench_rank_2000(c: &mut Criterion) {
    let aggregate = build_aggregate();
    let candidates = build_candidates(2_000);

    c.bench_function("rank_2000_candidates", |b| {
        b.iter(|| {
            let ranked = rank(black_box(&aggregate), black_box(candidates.clone()), 10);
            black_box(ranked)
        })
    });
}

criterion_group!(benches, bench_rank_200, bench_rank_2000);
criterion_main!(benches);
