//! Ingestion run loop: progress reporting, results log and stop polling.
//!
//! Wraps the record loop around any [`GraphLoaderService`]. Every
//! `report_every` processed records it logs cumulative progress, appends
//! a row to the benchmark results CSV, and polls for the stop marker
//! file. Stop latency is therefore bounded by the reporting interval,
//! never instantaneous; that is deliberate, polling elsewhere would put
//! filesystem calls on the hot path.
//!
//! Self-referencing records are filtered here, after counting, so the
//! loader never sees them but the processed-record counter still
//! reflects the input.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::info;

use crate::config::LoadConfig;
use crate::error::{BenchError, Result};
use crate::records::LinkRecord;
use crate::service::GraphLoaderService;

/// Append-only CSV of per-window ingest timings.
///
/// Format: header `NumRecords,timeForLast<K>Records(ms)`, then one
/// `<cumulativeCount>,<elapsedMs>` row per reporting boundary, plus a
/// final row written at run completion.
pub struct ResultsLog {
    writer: BufWriter<File>,
}

impl ResultsLog {
    /// Create (truncate) the results file and write the header.
    pub fn create(path: &Path, report_every: u64) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "NumRecords,timeForLast{}Records(ms)", report_every)?;
        Ok(Self { writer })
    }

    pub fn row(&mut self, records: u64, elapsed_ms: u64) -> Result<()> {
        writeln!(self.writer, "{},{}", records, elapsed_ms)?;
        // Keep rows on disk as they are produced; a crashed run should
        // still leave a usable log.
        self.writer.flush()?;
        Ok(())
    }
}

/// Outcome of an ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestSummary {
    /// Matching records processed (including filtered self-loops).
    pub records: u64,
    /// Whether the run ended early because the stop marker was observed.
    pub stopped: bool,
}

/// Progress and stop monitor composed around the ingestion loop.
pub struct IngestRunner {
    report_every: u64,
    stop_file: Option<PathBuf>,
}

impl IngestRunner {
    pub fn new(report_every: u64, stop_file: Option<PathBuf>) -> Self {
        Self {
            report_every,
            stop_file,
        }
    }

    pub fn from_config(cfg: &LoadConfig) -> Self {
        Self::new(cfg.report_every, cfg.stop_file.clone())
    }

    /// Drive `records` through `loader` to completion, early stop, or
    /// the first error. A zero report interval is rejected before any
    /// record is consumed. The loader is closed on every non-error
    /// exit; a final results row is written either way.
    pub fn run<I, L>(&self, records: I, loader: &mut L, results: &mut ResultsLog) -> Result<IngestSummary>
    where
        I: IntoIterator<Item = std::io::Result<LinkRecord>>,
        L: GraphLoaderService,
    {
        if self.report_every == 0 {
            return Err(BenchError::Config(
                "report interval must be non-zero".to_string(),
            ));
        }

        let mut processed: u64 = 0;
        let mut stopped = false;
        let mut window = Instant::now();

        for record in records {
            let record = record?;
            processed += 1;

            if record.from != record.to {
                loader.add_link(&record.from, &record.to)?;
            }

            if processed % self.report_every == 0 {
                let elapsed_ms = window.elapsed().as_millis() as u64;
                info!(
                    "processed {} records, last batch in {} ms, last record links [{}] to [{}]",
                    processed, elapsed_ms, record.from, record.to
                );
                results.row(processed, elapsed_ms)?;
                if self.consume_stop_marker()? {
                    info!("stop marker observed, ending run");
                    stopped = true;
                    break;
                }
                window = Instant::now();
            }
        }

        info!("issuing close request");
        loader.close()?;
        results.row(processed, window.elapsed().as_millis() as u64)?;

        Ok(IngestSummary { records: processed, stopped })
    }

    /// Check for the stop marker; if present, delete it and report true.
    fn consume_stop_marker(&self) -> Result<bool> {
        if let Some(path) = &self.stop_file {
            if path.exists() {
                fs::remove_file(path)?;
                return Ok(true);
            }
        }
        Ok(false)
    }
}
