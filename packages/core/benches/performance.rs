//! Performance benchmarks for HelpDocs core operations
//!
//! Run with: `cargo bench -p helpdocs-core`
//!
//! These benchmarks measure the paths that run on every structural change:
//! - Forest build from a flat document set
//! - Full flatten + inline render
//! - Breadcrumb enumeration on a diamond-heavy DAG
//! - Drop planning (ancestor walk)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use helpdocs_core::db::{DocumentStore, InMemoryDocumentStore, StoredRecord};
use helpdocs_core::forest::{all_paths, ForestState};
use helpdocs_core::models::{Document, DocumentDraft};
use helpdocs_core::operations::plan_reparent;
use helpdocs_core::presentation::{flatten, render, ExpandedState, RenderOptions};
use helpdocs_core::services::DocumentService;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Generate `count` documents in a wide tree with every fifth document shared by two
/// parents
fn generate_documents(count: usize) -> Vec<Document> {
    (0..count)
        .map(|i| {
            let parents = match i {
                0..=9 => vec![],
                _ if i % 5 == 0 => vec![format!("doc-{}", i / 10), format!("doc-{}", i / 7)],
                _ => vec![format!("doc-{}", i / 10)],
            };
            Document::new(format!("doc-{i}"), format!("Section {i}"), parents)
        })
        .collect()
}

fn bench_forest_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("forest_build");

    for size in [100usize, 1_000, 5_000] {
        let documents = generate_documents(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &documents, |b, docs| {
            b.iter(|| ForestState::build(black_box(docs.clone())))
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let forest = ForestState::build(generate_documents(2_000));
    let expanded: ExpandedState = (0..200).map(|i| format!("doc-{i}")).collect();

    c.bench_function("flatten_and_render_2000", |b| {
        b.iter(|| {
            let (rows, _) = flatten(black_box(&forest));
            render(&rows, RenderOptions::inline(&expanded))
        })
    });
}

/// Ladder of diamonds: every level has two documents, each with both documents of the
/// previous level as parents, so path count doubles per level
fn bench_breadcrumbs(c: &mut Criterion) {
    let mut documents = vec![
        Document::new("l0-a", "L0 A", vec![]),
        Document::new("l0-b", "L0 B", vec![]),
    ];
    for level in 1..10 {
        let parents = vec![format!("l{}-a", level - 1), format!("l{}-b", level - 1)];
        documents.push(Document::new(format!("l{level}-a"), format!("L{level} A"), parents.clone()));
        documents.push(Document::new(format!("l{level}-b"), format!("L{level} B"), parents));
    }
    let forest = ForestState::build(documents);

    c.bench_function("breadcrumbs_1024_paths", |b| {
        b.iter(|| all_paths(black_box(forest.map()), "l9-a"))
    });
}

fn bench_reparent_plan(c: &mut Criterion) {
    let forest = ForestState::build(generate_documents(5_000));

    c.bench_function("plan_reparent_deep", |b| {
        b.iter(|| plan_reparent(black_box(forest.map()), "doc-1", "doc-4999", None))
    });
}

fn bench_load_and_build(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let records: Vec<StoredRecord> = generate_documents(1_000)
        .into_iter()
        .map(|doc| StoredRecord {
            id: doc.id.clone(),
            fields: DocumentDraft::from(&doc).into_fields().unwrap(),
        })
        .collect();
    let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::with_records("helps", records));
    let service = DocumentService::new(store);

    c.bench_function("load_all_and_build_1000", |b| {
        b.iter(|| {
            rt.block_on(async {
                let documents = service.load_all().await.unwrap();
                ForestState::build(documents)
            })
        })
    });
}

criterion_group!(
    benches,
    bench_forest_build,
    bench_render,
    bench_breadcrumbs,
    bench_reparent_plan,
    bench_load_and_build
);
criterion_main!(benches);
