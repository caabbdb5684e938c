//! linkbench — ingestion and traversal stress benchmarks for pluggable
//! graph storage backends.
//!
//! The crate answers two questions about a graph backend: how fast can
//! it ingest millions of directed edges from a link dump, and how fast
//! can it answer shortest-path and neighborhood-walk queries afterward.
//! Storage engines stay external; they plug in behind the
//! [`service::LoaderBackend`] seam for ingestion and the
//! [`service::GraphTraverserService`] contract for queries. The crate
//! owns the call pattern: streaming parse, single-slot endpoint
//! deduplication, batch-commit boundaries, progress/stop monitoring,
//! seeded endpoint sampling and path replay.
//!
//! Typical ingestion wiring:
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::BufReader;
//! use linkbench::backends::LogGraph;
//! use linkbench::{BatchLoader, IngestRunner, LinkRecordSource, LoadConfig, ResultsLog};
//!
//! # fn main() -> linkbench::Result<()> {
//! let cfg = LoadConfig::new("page_links_en.nt", "results.csv");
//! let source = LinkRecordSource::with_limit(
//!     BufReader::new(File::open(&cfg.input)?),
//!     cfg.max_records,
//! );
//! let mut loader = BatchLoader::with_batch_size(
//!     LogGraph::create("graph-db".as_ref())?,
//!     cfg.batch_size,
//! )?;
//! let mut results = ResultsLog::create(&cfg.results, cfg.report_every)?;
//! let summary = IngestRunner::from_config(&cfg).run(source, &mut loader, &mut results)?;
//! println!("loaded {} records", summary.records);
//! # Ok(())
//! # }
//! ```

pub mod backends;
pub mod config;
pub mod error;
pub mod fsutil;
pub mod loader;
pub mod records;
pub mod resolve;
pub mod runner;
pub mod sampler;
pub mod service;
pub mod traverser;

pub use config::{LoadConfig, TraversalConfig, VertexSelection};
pub use error::{BenchError, Result};
pub use loader::BatchLoader;
pub use records::{LinkRecord, LinkRecordSource};
pub use runner::{IngestRunner, IngestSummary, ResultsLog};
pub use sampler::{SampleDistribution, Sampler};
pub use service::{GraphLoaderService, GraphTraverserService, LoaderBackend};
pub use traverser::{TraversalBench, TraversalSummary};
