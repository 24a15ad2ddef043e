//! Resolver throughput.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use para_consensus::ConsensusResolver;
use para_core::models::{CategoryScore, CategoryVote};
use para_core::{
    Category, FeatureSummary, GenerativeResult, GenerativeSignal, SemanticSignal, WeightVector,
};

fn bench_resolve(c: &mut Criterion) {
    let resolver = ConsensusResolver::default();
    let weights = WeightVector::default();
    let features = FeatureSummary::default();
    let semantic = SemanticSignal::available(CategoryScore {
        votes: [("Projects", 0.3), ("Areas", 0.25), ("Resources", 0.2)]
            .into_iter()
            .map(|(c, s)| (Category::new(c), CategoryVote { score: s, neighbors: 3 }))
            .collect(),
        neighbors_considered: 10,
    });
    let generative = GenerativeSignal::available(GenerativeResult::new("Areas", 0.8));

    c.bench_function("resolve_consensus", |b| {
        b.iter(|| {
            resolver.resolve(
                black_box("note"),
                &features,
                semantic.clone(),
                generative.clone(),
                &weights,
            )
        })
    });
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
