//! Benchmarks for the search index and the filter/sort pipeline.
//!
//! The fixture catalog is replicated into a few thousand methods so the
//! numbers reflect a catalog well past anything shipped today.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use methodscope::dataset::load_catalog;
use methodscope::filter::{apply_filters_and_search, sort_methods, FilterPatch, FilterState};
use methodscope::model::{Maturity, Method, Modality};
use methodscope::search::SearchIndex;
use methodscope::{SortKey, SortOrder};
use std::hint::black_box;
use std::path::Path;

const FIXTURE: &str = "tests/data/catalog/methods.json";

fn replicated_methods(copies: usize) -> Vec<Method> {
    let catalog = load_catalog(Path::new(FIXTURE)).expect("fixture catalog");
    let base = catalog.methods();
    (0..copies)
        .flat_map(|copy| {
            base.iter().map(move |m| {
                let mut method = m.clone();
                method.id = format!("{}-{copy}", m.id);
                method.name = format!("{} {copy}", m.name);
                method
            })
        })
        .collect()
}

fn bench_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_index_build");
    for copies in [10, 100, 500] {
        let methods = replicated_methods(copies);
        group.bench_with_input(
            BenchmarkId::from_parameter(methods.len()),
            &methods,
            |b, methods| b.iter(|| SearchIndex::build(black_box(methods))),
        );
    }
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let methods = replicated_methods(500);
    let index = SearchIndex::build(&methods);

    let mut group = c.benchmark_group("search_query");
    for query in ["ocr", "speach recogniton", "process mining dashboard"] {
        group.bench_with_input(BenchmarkId::from_parameter(query), &query, |b, query| {
            b.iter(|| index.search(black_box(query)))
        });
    }
    group.finish();
}

fn bench_filter_and_sort(c: &mut Criterion) {
    let methods = replicated_methods(500);
    let index = SearchIndex::build(&methods);

    let mut filtered = FilterState::default();
    FilterPatch::new()
        .modalities([Modality::Text, Modality::Image])
        .maturity([Maturity::Mature, Maturity::Established])
        .year_range(Some(2015), None)
        .apply_to(&mut filtered);

    let mut searched = filtered.clone();
    FilterPatch::new().search_query("mining").apply_to(&mut searched);

    c.bench_function("filter_only", |b| {
        b.iter(|| apply_filters_and_search(black_box(&methods), &index, &filtered))
    });

    c.bench_function("filter_with_search", |b| {
        b.iter(|| apply_filters_and_search(black_box(&methods), &index, &searched))
    });

    let hits = apply_filters_and_search(&methods, &index, &FilterState::default());
    let mut group = c.benchmark_group("sort_methods");
    for key in SortKey::all() {
        group.bench_with_input(BenchmarkId::from_parameter(key.as_str()), key, |b, key| {
            b.iter(|| sort_methods(black_box(&hits), *key, SortOrder::Desc))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_index_build, bench_search, bench_filter_and_sort);
criterion_main!(benches);
