//! Performance benchmarks for Arbor tree algorithms
//!
//! Run with: `cargo bench -p arbor-core`
//!
//! These benchmarks measure the in-memory hot paths over large snapshots:
//! - Forest assembly (wide and deep shapes)
//! - Subtree collection for cascading deletes
//! - Ancestry checks used by move validation

use arbor_core::models::{Node, NodeId};
use arbor_core::tree::{assemble_forest, collect_subtree, is_self_or_ancestor};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Balanced forest: every node has `fanout` children, ids assigned breadth-first
fn generate_wide_forest(node_count: usize, fanout: usize) -> Vec<Node> {
    (1..=node_count as NodeId)
        .map(|id| {
            let parent_id = (id > 1).then(|| (id - 2) / fanout as NodeId + 1);
            Node::new_with_id(id, parent_id, format!("Node {}", id))
        })
        .collect()
}

/// Single chain: node `n` is the parent of node `n + 1`
fn generate_chain(node_count: usize) -> Vec<Node> {
    (1..=node_count as NodeId)
        .map(|id| {
            let parent_id = (id > 1).then(|| id - 1);
            Node::new_with_id(id, parent_id, format!("Node {}", id))
        })
        .collect()
}

fn bench_assemble_forest(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble_forest");

    for size in [1_000usize, 10_000, 100_000] {
        let wide = generate_wide_forest(size, 8);
        group.bench_with_input(BenchmarkId::new("wide", size), &wide, |b, nodes| {
            b.iter(|| assemble_forest(black_box(nodes)))
        });
    }

    let deep = generate_chain(50_000);
    group.sample_size(20);
    group.bench_function("chain_50000", |b| {
        b.iter(|| assemble_forest(black_box(&deep)))
    });

    group.finish();
}

fn bench_collect_subtree(c: &mut Criterion) {
    let nodes = generate_wide_forest(100_000, 8);

    c.bench_function("collect_subtree_100000", |b| {
        b.iter(|| collect_subtree(black_box(&nodes), black_box(1)))
    });
}

fn bench_ancestry_check(c: &mut Criterion) {
    let nodes = generate_chain(10_000);

    c.bench_function("is_self_or_ancestor_chain_10000", |b| {
        b.iter(|| is_self_or_ancestor(black_box(&nodes), black_box(1), black_box(10_000)))
    });
}

criterion_group!(
    benches,
    bench_assemble_forest,
    bench_collect_subtree,
    bench_ancestry_check
);
criterion_main!(benches);
