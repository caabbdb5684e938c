//! Benchmark suite for the ingestion hot path.
//!
//! Covers the pieces the loader touches per record:
//! - line parsing (LinkRecordSource over a synthetic dump)
//! - endpoint resolution + edge creation (BatchLoader over MemoryGraph)
//! - sampler throughput (uniform vs zipf)
//!
//! Run: cargo bench --bench ingest

use std::io::{BufReader, Cursor};

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use linkbench::backends::MemoryGraph;
use linkbench::{
    BatchLoader, GraphLoaderService, LinkRecordSource, SampleDistribution, Sampler,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Synthetic dump with the run-length locality of the real data: each
/// source page emits a burst of consecutive links.
fn make_dump(pages: usize, links_per_page: usize) -> String {
    let mut text = String::new();
    for page in 0..pages {
        for link in 0..links_per_page {
            text.push_str(&format!(
                "<http://dbpedia.org/resource/Page_{}> <http://dbpedia.org/ontology/wikiPageWikiLink> <http://dbpedia.org/resource/Page_{}> .\n",
                page,
                (page + link + 1) % pages
            ));
        }
    }
    text
}

fn parsed_records(dump: &str) -> Vec<(String, String)> {
    LinkRecordSource::new(BufReader::new(Cursor::new(dump.to_string())))
        .map(|r| {
            let r = r.unwrap();
            (r.from, r.to)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_parse(c: &mut Criterion) {
    let dump = make_dump(1_000, 10);
    c.bench_function("parse_10k_lines", |b| {
        b.iter(|| {
            let source = LinkRecordSource::new(BufReader::new(Cursor::new(dump.as_str())));
            black_box(source.count())
        })
    });
}

fn bench_ingest(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest");
    for links_per_page in [1usize, 10] {
        let records = parsed_records(&make_dump(1_000, links_per_page));
        group.bench_with_input(
            BenchmarkId::new("memory_backend", links_per_page),
            &records,
            |b, records| {
                b.iter_batched(
                    || BatchLoader::with_batch_size(MemoryGraph::new(), 1000).unwrap(),
                    |mut loader| {
                        for (from, to) in records {
                            loader.add_link(from, to).unwrap();
                        }
                        loader.close().unwrap();
                        loader
                    },
                    BatchSize::SmallInput,
                )
            },
        );
    }
    group.finish();
}

fn bench_sampler(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampler");
    for name in ["uniform", "zipf"] {
        let dist = SampleDistribution::parse(name, 1_000_000, 0.5).unwrap();
        group.bench_with_input(BenchmarkId::new("sample_10k", name), &dist, |b, dist| {
            b.iter_batched(
                || Sampler::new(*dist, 42),
                |mut sampler| {
                    let mut acc = 0u64;
                    for _ in 0..10_000 {
                        acc = acc.wrapping_add(sampler.sample());
                    }
                    black_box(acc)
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_ingest, bench_sampler);
criterion_main!(benches);
