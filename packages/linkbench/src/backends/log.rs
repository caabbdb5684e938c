//! Durable append-log graph backend.
//!
//! The simplest storage that honors the batch-commit contract: vertices
//! and edges accumulate in memory per transaction, and `commit` appends
//! the batch to `edges.log` (bincode-framed) followed by an fsync. A
//! process death before `close` loses exactly the uncommitted tail; a
//! reopen replays committed records only.
//!
//! `create` resets the database directory (loader mode); `open` replays
//! an existing log read-only (traverser mode). A missing log is not an
//! error on open, it just reports `database_exists() == false`, so the
//! traversal driver can abort cleanly.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BenchError, Result};
use crate::fsutil;
use crate::service::{GraphTraverserService, LoaderBackend};

use super::MemoryGraph;

const LOG_FILE: &str = "edges.log";

#[derive(Debug, Serialize, Deserialize)]
enum LogRecord {
    /// Vertex creation; the serial is implied by record order.
    Vertex { key: String },
    /// Directed edge between vertex serials.
    Edge { from: u64, to: u64 },
}

pub struct LogGraph {
    log_path: PathBuf,
    writer: Option<BufWriter<File>>,
    graph: MemoryGraph,
    pending: Vec<LogRecord>,
    present: bool,
}

impl LogGraph {
    /// Reset `dir` and start an empty writable database.
    pub fn create(dir: &Path) -> Result<Self> {
        fsutil::reset_dir(dir)?;
        let log_path = dir.join(LOG_FILE);
        let writer = BufWriter::new(File::create(&log_path)?);
        Ok(Self {
            log_path,
            writer: Some(writer),
            graph: MemoryGraph::new(),
            pending: Vec::new(),
            present: true,
        })
    }

    /// Open an existing database read-only, replaying committed records.
    /// A missing directory or log yields an instance whose
    /// `database_exists()` is false.
    pub fn open(dir: &Path) -> Result<Self> {
        let log_path = dir.join(LOG_FILE);
        if !log_path.exists() {
            return Ok(Self {
                log_path,
                writer: None,
                graph: MemoryGraph::new(),
                pending: Vec::new(),
                present: false,
            });
        }

        let mut graph = MemoryGraph::new();
        let mut reader = BufReader::new(File::open(&log_path)?);
        loop {
            match bincode::deserialize_from::<_, LogRecord>(&mut reader) {
                Ok(LogRecord::Vertex { key }) => {
                    graph.create_vertex(&key)?;
                }
                Ok(LogRecord::Edge { from, to }) => {
                    if graph.key(from).is_none() || graph.key(to).is_none() {
                        return Err(BenchError::Corrupt(format!(
                            "edge ({}, {}) references unknown vertex serial",
                            from, to
                        )));
                    }
                    graph.create_edge(&from, &to)?;
                }
                Err(e) => match *e {
                    bincode::ErrorKind::Io(ref io)
                        if io.kind() == std::io::ErrorKind::UnexpectedEof =>
                    {
                        break;
                    }
                    _ => {
                        return Err(BenchError::Corrupt(format!(
                            "failed to replay {}: {}",
                            log_path.display(),
                            e
                        )))
                    }
                },
            }
        }

        Ok(Self {
            log_path,
            writer: None,
            graph,
            pending: Vec::new(),
            present: true,
        })
    }

    pub fn vertex_count(&self) -> u64 {
        GraphTraverserService::vertex_count(&self.graph)
    }

    pub fn edge_count(&self) -> u64 {
        self.graph.edge_count()
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    fn writer(&mut self) -> Result<&mut BufWriter<File>> {
        self.writer
            .as_mut()
            .ok_or_else(|| BenchError::Backend("database is read-only or closed".to_string()))
    }

    /// Append pending records and fsync; the batch is durable on return.
    fn flush_pending(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let pending = std::mem::take(&mut self.pending);
        let writer = self.writer()?;
        for record in &pending {
            bincode::serialize_into(&mut *writer, record)?;
        }
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(())
    }
}

impl LoaderBackend for LogGraph {
    type Handle = u64;

    fn find_vertex(&mut self, key: &str) -> Result<Option<u64>> {
        self.graph.find_vertex(key)
    }

    fn create_vertex(&mut self, key: &str) -> Result<u64> {
        self.writer()?;
        let id = self.graph.create_vertex(key)?;
        self.pending.push(LogRecord::Vertex {
            key: key.to_string(),
        });
        Ok(id)
    }

    fn create_edge(&mut self, from: &u64, to: &u64) -> Result<()> {
        self.writer()?;
        self.graph.create_edge(from, to)?;
        self.pending.push(LogRecord::Edge {
            from: *from,
            to: *to,
        });
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.flush_pending()
    }

    // Drops the writer after the final sync: a closed database rejects
    // further writes, exactly like one opened for traversal.
    fn close(&mut self) -> Result<()> {
        self.flush_pending()?;
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        Ok(())
    }
}

impl GraphTraverserService for LogGraph {
    fn database_exists(&self) -> bool {
        self.present && self.graph.database_exists()
    }

    fn vertex_count(&self) -> u64 {
        GraphTraverserService::vertex_count(&self.graph)
    }

    fn vertex_by_serial(&mut self, serial: u64) -> Result<String> {
        self.graph.vertex_by_serial(serial)
    }

    fn random_vertex(&mut self) -> Result<String> {
        self.graph.random_vertex()
    }

    /// Same convention as [`MemoryGraph`]: `shortest_path(a, a)` is `[a]`
    /// for an existing vertex, unknown endpoints yield an empty path.
    fn shortest_path(&mut self, from: &str, to: &str) -> Result<Vec<String>> {
        self.graph.shortest_path(from, to)
    }

    fn traverse(&mut self, path: &[String]) -> Result<()> {
        self.graph.traverse(path)
    }

    fn close(&mut self) -> Result<()> {
        GraphTraverserService::close(&mut self.graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_chain(graph: &mut LogGraph, keys: &[&str]) {
        let handles: Vec<u64> = keys
            .iter()
            .map(|k| match graph.find_vertex(k).unwrap() {
                Some(h) => h,
                None => graph.create_vertex(k).unwrap(),
            })
            .collect();
        for pair in handles.windows(2) {
            graph.create_edge(&pair[0], &pair[1]).unwrap();
        }
    }

    #[test]
    fn committed_batches_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("db");

        let mut graph = LogGraph::create(&db).unwrap();
        add_chain(&mut graph, &["A", "B", "C"]);
        LoaderBackend::commit(&mut graph).unwrap();
        // Simulated process death: drop without close.
        drop(graph);

        let reopened = LogGraph::open(&db).unwrap();
        assert!(reopened.database_exists());
        assert_eq!(reopened.vertex_count(), 3);
        assert_eq!(reopened.edge_count(), 2);
    }

    #[test]
    fn uncommitted_tail_is_lost_without_close() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("db");

        let mut graph = LogGraph::create(&db).unwrap();
        add_chain(&mut graph, &["A", "B"]);
        LoaderBackend::commit(&mut graph).unwrap();
        // Tail batch after the last commit: must not survive.
        add_chain(&mut graph, &["C", "D"]);
        drop(graph);

        let reopened = LogGraph::open(&db).unwrap();
        assert_eq!(reopened.vertex_count(), 2);
        assert_eq!(reopened.edge_count(), 1);
    }

    #[test]
    fn close_makes_the_tail_durable() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("db");

        let mut graph = LogGraph::create(&db).unwrap();
        add_chain(&mut graph, &["A", "B", "C"]);
        LoaderBackend::close(&mut graph).unwrap();
        drop(graph);

        let reopened = LogGraph::open(&db).unwrap();
        assert_eq!(reopened.vertex_count(), 3);
        assert_eq!(reopened.edge_count(), 2);
    }

    #[test]
    fn missing_database_reports_not_existing() {
        let dir = tempfile::tempdir().unwrap();
        let graph = LogGraph::open(&dir.path().join("nowhere")).unwrap();
        assert!(!graph.database_exists());
    }

    #[test]
    fn reopened_database_rejects_writes() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("db");
        {
            let mut graph = LogGraph::create(&db).unwrap();
            add_chain(&mut graph, &["A", "B"]);
            LoaderBackend::close(&mut graph).unwrap();
        }
        let mut reopened = LogGraph::open(&db).unwrap();
        assert!(matches!(
            reopened.create_vertex("C"),
            Err(BenchError::Backend(_))
        ));
    }

    #[test]
    fn closed_database_rejects_further_writes() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("db");

        let mut graph = LogGraph::create(&db).unwrap();
        add_chain(&mut graph, &["A", "B"]);
        LoaderBackend::close(&mut graph).unwrap();

        assert!(matches!(
            graph.create_vertex("C"),
            Err(BenchError::Backend(_))
        ));
        let a = 0u64;
        let b = 1u64;
        assert!(matches!(
            graph.create_edge(&b, &a),
            Err(BenchError::Backend(_))
        ));
        // Closing again stays a no-op.
        LoaderBackend::close(&mut graph).unwrap();
    }

    #[test]
    fn reopened_graph_answers_traversal_queries() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("db");
        {
            let mut graph = LogGraph::create(&db).unwrap();
            add_chain(&mut graph, &["A", "B", "C"]);
            LoaderBackend::close(&mut graph).unwrap();
        }
        let mut reopened = LogGraph::open(&db).unwrap();
        assert_eq!(
            reopened.shortest_path("A", "C").unwrap(),
            vec!["A", "B", "C"]
        );
        assert_eq!(reopened.vertex_by_serial(1).unwrap(), "B");
    }

    #[test]
    fn create_resets_previous_database() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("db");
        {
            let mut graph = LogGraph::create(&db).unwrap();
            add_chain(&mut graph, &["A", "B"]);
            LoaderBackend::close(&mut graph).unwrap();
        }
        {
            let graph = LogGraph::create(&db).unwrap();
            drop(graph);
        }
        let reopened = LogGraph::open(&db).unwrap();
        assert_eq!(reopened.vertex_count(), 0);
    }
}
