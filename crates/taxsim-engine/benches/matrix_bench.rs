//! Matrix engine benchmark suite.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use taxsim_core::config::{
    ConceptMatrixConfig, CsMode, IcMode, SetMatrixConfig, SetSimMode, WorkerCount,
};
use taxsim_core::taxonomy::Taxonomy;
use taxsim_engine::{concept_similarity_matrix, set_similarity_matrix};

/// Three-level tree with `fanout` children per node.
fn synthetic_taxonomy(fanout: usize) -> Taxonomy {
    let mut tax = Taxonomy::new("root");
    for a in 0..fanout {
        let first = format!("n{a}");
        tax.add_concept(first.clone(), "root").unwrap();
        for b in 0..fanout {
            let second = format!("n{a}-{b}");
            tax.add_concept(second.clone(), &first).unwrap();
            for c in 0..fanout {
                tax.add_concept(format!("n{a}-{b}-{c}"), &second).unwrap();
            }
        }
    }
    tax
}

fn matrix_benchmarks(c: &mut Criterion) {
    // 8 + 64 + 512 concepts below the root.
    let tax = synthetic_taxonomy(8);
    let codes = tax.sample_concepts(100, 42);

    let mut sequential = ConceptMatrixConfig::new(IcMode::Levels, CsMode::WuPalmer);
    sequential.workers = WorkerCount::Fixed(1);
    c.bench_function("concept_matrix_100_sequential", |b| {
        b.iter(|| concept_similarity_matrix(black_box(&tax), black_box(&codes), &sequential))
    });

    let parallel = ConceptMatrixConfig::new(IcMode::Levels, CsMode::WuPalmer);
    c.bench_function("concept_matrix_100_auto_workers", |b| {
        b.iter(|| concept_similarity_matrix(black_box(&tax), black_box(&codes), &parallel))
    });

    let content = ConceptMatrixConfig::new(IcMode::ContentBased, CsMode::LeacockChodorow);
    c.bench_function("concept_matrix_100_content_based", |b| {
        b.iter(|| concept_similarity_matrix(black_box(&tax), black_box(&codes), &content))
    });

    let sets: Vec<Vec<String>> = (0..20)
        .map(|seed| tax.sample_concepts(6, seed as u64))
        .collect();
    let bipartite =
        SetMatrixConfig::new(IcMode::Levels, CsMode::WuPalmer, SetSimMode::BipartiteMatching);
    c.bench_function("set_matrix_20x6_bipartite", |b| {
        b.iter(|| set_similarity_matrix(black_box(&tax), black_box(&sets), &bipartite))
    });
}

criterion_group!(benches, matrix_benchmarks);
criterion_main!(benches);
