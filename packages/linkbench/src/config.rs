//! Run configuration for the two benchmark phases.
//!
//! Defaults mirror the reference harness: progress every 100k records,
//! `stop.txt` marker polling, 1k-edge commit batches, and traversal
//! reporting every 10k iterations with a 0.5 zipf exponent.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::sampler::DEFAULT_ZIPF_EXPONENT;

/// Endpoint selection style for the traversal driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum VertexSelection {
    /// Sample serials from the configured distribution, then resolve
    /// each serial to a key through the backend.
    Sampled,
    /// Ask the backend for random vertices directly.
    BackendRandom,
}

/// Configuration for the ingestion phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    /// Line-oriented triple dump to ingest.
    pub input: PathBuf,
    /// Benchmark results CSV, created fresh per run.
    pub results: PathBuf,
    /// Emit a progress report (and poll the stop marker) every this many
    /// processed records.
    #[serde(default = "default_report_every")]
    pub report_every: u64,
    /// Marker file whose presence requests a graceful stop at the next
    /// report boundary. `None` disables polling.
    #[serde(default = "default_stop_file")]
    pub stop_file: Option<PathBuf>,
    /// Stop after this many matching records; `None` loads the whole
    /// stream.
    #[serde(default)]
    pub max_records: Option<u64>,
    /// Commit interval in inserted edges.
    #[serde(default = "default_batch_size")]
    pub batch_size: u64,
}

impl LoadConfig {
    pub fn new(input: impl Into<PathBuf>, results: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            results: results.into(),
            report_every: default_report_every(),
            stop_file: default_stop_file(),
            max_records: None,
            batch_size: default_batch_size(),
        }
    }
}

/// Configuration for the traversal phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraversalConfig {
    /// PRNG seed; the full endpoint sequence is a function of
    /// (seed, distribution, population).
    pub seed: u64,
    /// Number of shortest-path searches to run.
    pub iterations: u64,
    /// Distribution name: "uniform" or "zipf".
    pub distribution: String,
    /// Skew exponent for zipf.
    #[serde(default = "default_zipf_exponent")]
    pub zipf_exponent: f64,
    /// Log one search in full every this many iterations, to bound
    /// console volume at scale.
    #[serde(default = "default_traversal_report_every")]
    pub report_every: u64,
    /// How endpoint vertices are chosen.
    #[serde(default = "default_selection")]
    pub selection: VertexSelection,
}

impl TraversalConfig {
    pub fn new(seed: u64, iterations: u64, distribution: impl Into<String>) -> Self {
        Self {
            seed,
            iterations,
            distribution: distribution.into(),
            zipf_exponent: default_zipf_exponent(),
            report_every: default_traversal_report_every(),
            selection: default_selection(),
        }
    }
}

fn default_report_every() -> u64 {
    100_000
}

fn default_stop_file() -> Option<PathBuf> {
    Some(PathBuf::from("stop.txt"))
}

fn default_batch_size() -> u64 {
    crate::loader::DEFAULT_BATCH_SIZE
}

fn default_zipf_exponent() -> f64 {
    DEFAULT_ZIPF_EXPONENT
}

fn default_traversal_report_every() -> u64 {
    10_000
}

fn default_selection() -> VertexSelection {
    VertexSelection::Sampled
}
