//! Criterion benchmarks for Glaive.
//!
//! Covers the hot paths of the engine:
//! - Text analysis
//! - Fuzzy term expansion
//! - Batch indexing
//! - End-to-end search

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use glaive::analysis::{Analyzer, StandardAnalyzer};
use glaive::config::EngineConfig;
use glaive::document::{DocumentInput, TextField};
use glaive::index::{IndexManager, MemoryInvertedIndex, TermIndex};
use glaive::query::FuzzyMatcher;
use glaive::search::SearchRequest;
use glaive::util::levenshtein::BoundedDistance;
use std::hint::black_box;

/// Generate test comments for benchmarking.
fn generate_test_comments(count: usize) -> Vec<String> {
    let words = [
        "great", "video", "loved", "funny", "comedy", "channel", "music", "song", "tutorial",
        "awesome", "terrible", "boring", "amazing", "cats", "dogs", "cooking", "pasta", "review",
        "camera", "editing", "subscribe", "content", "creator", "thanks", "helpful",
    ];

    (0..count)
        .map(|i| {
            let length = 5 + (i % 20);
            (0..length)
                .map(|j| words[(i * 7 + j * 13) % words.len()]) // Pseudo-random distribution
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

fn generate_inputs(count: usize) -> Vec<DocumentInput> {
    generate_test_comments(count)
        .into_iter()
        .enumerate()
        .map(|(i, comment)| {
            DocumentInput::new(format!("comment-{i}"))
                .text(TextField::Comment, comment)
                .text(TextField::VideoName, format!("Video number {}", i % 50))
                .text(TextField::ChannelName, format!("Channel {}", i % 7))
                .text(TextField::UserName, format!("user{}", i % 300))
                .date(format!("2023-{:02}-{:02}", i % 12 + 1, i % 28 + 1))
                .likes((i % 1000) as u64)
        })
        .collect()
}

fn populated_manager(count: usize) -> IndexManager {
    let manager = IndexManager::new(EngineConfig::default()).expect("valid config");
    manager.create().expect("fresh index");
    manager
        .upsert_batch(generate_inputs(count))
        .expect("index exists");
    manager
}

/// Benchmark text analysis and tokenization.
fn bench_text_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_analysis");

    let analyzer = StandardAnalyzer::new();
    let texts = generate_test_comments(1000);

    group.bench_function("analyze_single_comment", |b| {
        b.iter(|| black_box(analyzer.tokens(black_box(&texts[0]))))
    });

    group.throughput(Throughput::Elements(100));
    group.bench_function("analyze_batch_comments", |b| {
        b.iter(|| {
            for text in texts.iter().take(100) {
                let _ = black_box(analyzer.tokens(black_box(text)));
            }
        })
    });

    group.finish();
}

/// Benchmark bounded edit distance and fuzzy expansion.
fn bench_fuzzy(c: &mut Criterion) {
    let mut group = c.benchmark_group("fuzzy");

    let bounded = BoundedDistance::new("subscribe");
    group.bench_function("bounded_distance_accept", |b| {
        b.iter(|| bounded.within(black_box("subscirbe"), 2))
    });

    group.bench_function("bounded_distance_reject", |b| {
        b.iter(|| bounded.within(black_box("tutorials"), 2))
    });

    let analyzer = StandardAnalyzer::new();
    let mut index = MemoryInvertedIndex::new();
    for (doc_id, text) in generate_test_comments(5000).iter().enumerate() {
        let tokens = analyzer.tokens(text).expect("analysis");
        index.add_postings(doc_id as u64, TextField::Comment, &tokens);
    }
    let matcher = FuzzyMatcher::default();

    group.bench_function("expand_comedy", |b| {
        b.iter(|| matcher.expand(&index, TextField::Comment, black_box("comody"), 2))
    });

    group.finish();
}

/// Benchmark batch indexing.
fn bench_indexing(c: &mut Criterion) {
    let mut group = c.benchmark_group("indexing");
    group.sample_size(20);

    group.throughput(Throughput::Elements(1000));
    group.bench_function("upsert_batch_1000", |b| {
        b.iter(|| black_box(populated_manager(1000)))
    });

    group.finish();
}

/// Benchmark end-to-end search.
fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    let manager = populated_manager(10_000);

    group.bench_function("fuzzy_query", |b| {
        let request = SearchRequest::new("funy comedy vidoe");
        b.iter(|| black_box(manager.search(black_box(&request))))
    });

    group.bench_function("filtered_query_with_author", |b| {
        let request = SearchRequest::new("cooking pasta")
            .with_author("user42")
            .with_min_date("2023-06-01")
            .with_min_likes(100);
        b.iter(|| black_box(manager.search(black_box(&request))))
    });

    group.bench_function("match_all_second_page", |b| {
        let request = SearchRequest::new("").with_offset(10);
        b.iter(|| black_box(manager.search(black_box(&request))))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_text_analysis,
    bench_fuzzy,
    bench_indexing,
    bench_search
);

criterion_main!(benches);
