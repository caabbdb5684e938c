//! linkbench CLI: graph ingestion and traversal benchmarks.
//!
//! Usage:
//!   linkbench load --input page_links_en.nt --db-dir graph-db
//!   linkbench load --config load.json --db-dir graph-db
//!   linkbench traverse --db-dir graph-db --iterations 100000 --distribution zipf
//!
//! The load subcommand expects an already-decompressed line-oriented
//! triple dump (e.g. the DBpedia page-links file). Dropping a `stop.txt`
//! marker next to the process requests a graceful stop at the next
//! progress report.
//!
//! `--config` reads the whole phase configuration from a JSON file
//! (the serde shape of [`LoadConfig`] / [`TraversalConfig`]); mixing it
//! with the individual tuning flags is rejected. `--db-dir` and
//! `--backend` select where the benchmark runs and stay on the command
//! line either way.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use linkbench::backends::{LogGraph, MemoryGraph};
use linkbench::{
    BatchLoader, IngestRunner, IngestSummary, LinkRecordSource, LoadConfig, ResultsLog,
    TraversalBench, TraversalConfig, VertexSelection,
};

#[derive(Parser)]
#[command(name = "linkbench", about = "Graph backend ingestion and traversal benchmarks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BackendKind {
    /// Durable append-log reference backend.
    Log,
    /// Ephemeral in-memory reference backend (no durability; the
    /// traverse subcommand cannot see its data afterwards).
    Memory,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest a link dump and write per-window timings to a results CSV.
    Load {
        /// JSON file with the full load configuration.
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Line-oriented triple dump to ingest.
        #[arg(long, required_unless_present = "config", conflicts_with = "config")]
        input: Option<PathBuf>,
        /// Benchmark results CSV.
        #[arg(long, default_value = "benchmark-results.csv", conflicts_with = "config")]
        results: PathBuf,
        /// Database directory (recreated from scratch).
        #[arg(long, default_value = "graph-db")]
        db_dir: PathBuf,
        /// Progress report and stop-poll interval, in records.
        #[arg(long, default_value_t = 100_000, conflicts_with = "config")]
        report_every: u64,
        /// Stop marker file polled at report boundaries.
        #[arg(long, default_value = "stop.txt", conflicts_with = "config")]
        stop_file: PathBuf,
        /// Limit on matching records; 0 loads the whole stream.
        #[arg(long, default_value_t = 1_000_000, conflicts_with = "config")]
        max_records: u64,
        /// Commit interval in inserted edges.
        #[arg(long, default_value_t = 1000, conflicts_with = "config")]
        batch_size: u64,
        /// Storage backend to benchmark.
        #[arg(long, value_enum, default_value = "log")]
        backend: BackendKind,
    },
    /// Run shortest-path searches and path replay against a loaded database.
    Traverse {
        /// JSON file with the full traversal configuration.
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Database directory written by a previous load run.
        #[arg(long, default_value = "graph-db")]
        db_dir: PathBuf,
        /// PRNG seed for endpoint sampling.
        #[arg(long, default_value_t = 0, conflicts_with = "config")]
        seed: u64,
        /// Number of shortest-path searches.
        #[arg(long, default_value_t = 100_000, conflicts_with = "config")]
        iterations: u64,
        /// Sampling distribution: uniform or zipf.
        #[arg(long, default_value = "uniform", conflicts_with = "config")]
        distribution: String,
        /// Skew exponent for zipf.
        #[arg(long, default_value_t = 0.5, conflicts_with = "config")]
        zipf_exponent: f64,
        /// Log one search in full every this many iterations.
        #[arg(long, default_value_t = 10_000, conflicts_with = "config")]
        report_every: u64,
        /// Endpoint selection style.
        #[arg(long, value_enum, default_value = "sampled", conflicts_with = "config")]
        selection: VertexSelection,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match Cli::parse().command {
        Command::Load {
            config,
            input,
            results,
            db_dir,
            report_every,
            stop_file,
            max_records,
            batch_size,
            backend,
        } => {
            let cfg = match config {
                Some(path) => read_config::<LoadConfig>(&path)?,
                None => LoadConfig {
                    input: input.context("--input is required without --config")?,
                    results,
                    report_every,
                    stop_file: Some(stop_file),
                    max_records: (max_records > 0).then_some(max_records),
                    batch_size,
                },
            };
            let summary = run_load(&cfg, &db_dir, backend)?;
            println!(
                "loaded {} records{}",
                summary.records,
                if summary.stopped { " (stopped early)" } else { "" }
            );
        }
        Command::Traverse {
            config,
            db_dir,
            seed,
            iterations,
            distribution,
            zipf_exponent,
            report_every,
            selection,
        } => {
            let cfg = match config {
                Some(path) => read_config::<TraversalConfig>(&path)?,
                None => TraversalConfig {
                    seed,
                    iterations,
                    distribution,
                    zipf_exponent,
                    report_every,
                    selection,
                },
            };
            let graph = LogGraph::open(&db_dir)
                .with_context(|| format!("opening database in {}", db_dir.display()))?;
            match TraversalBench::new(graph, cfg).run()? {
                Some(summary) => println!(
                    "{} searches ({} reachable), search total {} ms, replay total {} ms",
                    summary.searches,
                    summary.reachable,
                    summary.search_total.as_millis(),
                    summary.replay_total.as_millis()
                ),
                None => println!("no database found; run `linkbench load` first"),
            }
        }
    }
    Ok(())
}

fn read_config<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
}

fn run_load(cfg: &LoadConfig, db_dir: &PathBuf, backend: BackendKind) -> anyhow::Result<IngestSummary> {
    let file = File::open(&cfg.input)
        .with_context(|| format!("opening input file {}", cfg.input.display()))?;
    let source = LinkRecordSource::with_limit(BufReader::new(file), cfg.max_records);
    let mut results = ResultsLog::create(&cfg.results, cfg.report_every)?;
    let runner = IngestRunner::from_config(cfg);

    let summary = match backend {
        BackendKind::Log => {
            let mut loader =
                BatchLoader::with_batch_size(LogGraph::create(db_dir)?, cfg.batch_size)?;
            runner.run(source, &mut loader, &mut results)?
        }
        BackendKind::Memory => {
            let mut loader =
                BatchLoader::with_batch_size(MemoryGraph::new(), cfg.batch_size)?;
            runner.run(source, &mut loader, &mut results)?
        }
    };
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_parses_with_config_file_only() {
        let cli = Cli::try_parse_from(["linkbench", "load", "--config", "load.json"]).unwrap();
        match cli.command {
            Command::Load { config, input, .. } => {
                assert_eq!(config, Some(PathBuf::from("load.json")));
                assert!(input.is_none());
            }
            _ => panic!("expected load subcommand"),
        }
    }

    #[test]
    fn load_requires_input_without_config_file() {
        assert!(Cli::try_parse_from(["linkbench", "load"]).is_err());
    }

    #[test]
    fn config_file_conflicts_with_tuning_flags() {
        assert!(Cli::try_parse_from([
            "linkbench", "load", "--config", "c.json", "--input", "x.nt"
        ])
        .is_err());
        assert!(Cli::try_parse_from([
            "linkbench", "traverse", "--config", "c.json", "--iterations", "5"
        ])
        .is_err());
    }

    #[test]
    fn traverse_config_file_allows_db_dir() {
        let cli = Cli::try_parse_from([
            "linkbench", "traverse", "--config", "t.json", "--db-dir", "other-db",
        ])
        .unwrap();
        match cli.command {
            Command::Traverse { config, db_dir, .. } => {
                assert_eq!(config, Some(PathBuf::from("t.json")));
                assert_eq!(db_dir, PathBuf::from("other-db"));
            }
            _ => panic!("expected traverse subcommand"),
        }
    }

    #[test]
    fn read_config_resolves_serde_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("load.json");
        fs::write(&path, r#"{"input": "links.nt", "results": "out.csv"}"#).unwrap();

        let cfg: LoadConfig = read_config(&path).unwrap();
        assert_eq!(cfg.input, PathBuf::from("links.nt"));
        assert_eq!(cfg.report_every, 100_000);
        assert_eq!(cfg.batch_size, 1000);
    }
}
