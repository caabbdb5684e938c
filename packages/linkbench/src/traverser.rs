//! Traversal benchmark driver.
//!
//! Runs the query phase against a loaded database: sample endpoint
//! pairs, time shortest-path searches, then replay every discovered path
//! to force cold reads of the neighborhoods along it.
//!
//! Phases: `NotStarted -> Aborted` when the backend reports no database,
//! otherwise `-> Running` (seeded sampling + search loop) `-> Replaying`
//! (path replay) `-> Closed`. An empty search result means the endpoints
//! are unreachable from each other; that is an expected outcome, not an
//! error, and such paths are simply not retained for replay.

use std::time::{Duration, Instant};

use tracing::info;

use crate::config::{TraversalConfig, VertexSelection};
use crate::error::{BenchError, Result};
use crate::sampler::{SampleDistribution, Sampler};
use crate::service::GraphTraverserService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Aborted,
    Running,
    Replaying,
    Closed,
}

/// Aggregated measurements of one traversal run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalSummary {
    /// Shortest-path searches issued.
    pub searches: u64,
    /// Searches that found a non-empty path.
    pub reachable: u64,
    /// Total wall-clock time inside `shortest_path`.
    pub search_total: Duration,
    /// Total wall-clock time replaying retained paths.
    pub replay_total: Duration,
}

pub struct TraversalBench<T: GraphTraverserService> {
    traverser: T,
    cfg: TraversalConfig,
    phase: Phase,
}

impl<T: GraphTraverserService> TraversalBench<T> {
    pub fn new(traverser: T, cfg: TraversalConfig) -> Self {
        Self {
            traverser,
            cfg,
            phase: Phase::NotStarted,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Run the full search + replay benchmark. Returns `None` when no
    /// database exists (a normal outcome: the load phase has not run).
    /// The report interval and distribution name are validated before
    /// any backend call past the existence check, so misconfiguration
    /// fails fast.
    pub fn run(&mut self) -> Result<Option<TraversalSummary>> {
        if !self.traverser.database_exists() {
            info!("no database found; run the graph load benchmark first");
            self.phase = Phase::Aborted;
            return Ok(None);
        }

        if self.cfg.report_every == 0 {
            return Err(BenchError::Config(
                "report interval must be non-zero".to_string(),
            ));
        }

        let population = self.traverser.vertex_count();
        let dist = SampleDistribution::parse(
            &self.cfg.distribution,
            population,
            self.cfg.zipf_exponent,
        )?;
        let mut sampler = Sampler::new(dist, self.cfg.seed);

        self.phase = Phase::Running;
        let mut paths: Vec<Vec<String>> = Vec::new();
        let mut reachable: u64 = 0;
        let mut search_total = Duration::ZERO;

        for iteration in 0..self.cfg.iterations {
            let report = iteration % self.cfg.report_every == 0;

            let (from, to) = match self.cfg.selection {
                VertexSelection::Sampled => {
                    let from = self.traverser.vertex_by_serial(sampler.sample())?;
                    let to = self.traverser.vertex_by_serial(sampler.sample())?;
                    (from, to)
                }
                VertexSelection::BackendRandom => {
                    let from = self.traverser.random_vertex()?;
                    let to = self.traverser.random_vertex()?;
                    (from, to)
                }
            };

            let start = Instant::now();
            let path = self.traverser.shortest_path(&from, &to)?;
            let elapsed = start.elapsed();
            search_total += elapsed;

            if report {
                if path.is_empty() {
                    info!(
                        "shortest path from [{}] to [{}]: unreachable, searched in {} ms",
                        from,
                        to,
                        elapsed.as_millis()
                    );
                } else {
                    info!(
                        "shortest path from [{}] to [{}] in {} ms: {}",
                        from,
                        to,
                        elapsed.as_millis(),
                        path.join(" -> ")
                    );
                }
            }

            if !path.is_empty() {
                reachable += 1;
                paths.push(path);
            }
        }

        info!(
            "total time spent searching: {} ms ({} of {} pairs reachable)",
            search_total.as_millis(),
            reachable,
            self.cfg.iterations
        );

        self.phase = Phase::Replaying;
        let start = Instant::now();
        for path in &paths {
            self.traverser.traverse(path)?;
        }
        let replay_total = start.elapsed();
        info!(
            "replayed {} paths in {} ms",
            paths.len(),
            replay_total.as_millis()
        );

        info!("issuing close request");
        self.traverser.close()?;
        self.phase = Phase::Closed;

        Ok(Some(TraversalSummary {
            searches: self.cfg.iterations,
            reachable,
            search_total,
            replay_total,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::MemoryGraph;
    use crate::error::BenchError;
    use crate::service::LoaderBackend;

    fn linked_graph() -> MemoryGraph {
        let mut g = MemoryGraph::new();
        let handles: Vec<u64> = ["A", "B", "C", "D"]
            .iter()
            .map(|k| g.create_vertex(k).unwrap())
            .collect();
        for pair in handles.windows(2) {
            g.create_edge(&pair[0], &pair[1]).unwrap();
        }
        g
    }

    fn cfg(iterations: u64) -> TraversalConfig {
        TraversalConfig::new(42, iterations, "uniform")
    }

    #[test]
    fn aborts_when_no_database_exists() {
        let mut bench = TraversalBench::new(MemoryGraph::new(), cfg(10));
        let summary = bench.run().unwrap();
        assert!(summary.is_none());
        assert_eq!(bench.phase(), Phase::Aborted);
    }

    #[test]
    fn fully_connected_run_reaches_every_pair() {
        let mut bench = TraversalBench::new(linked_graph(), cfg(50));
        let summary = bench.run().unwrap().unwrap();
        assert_eq!(summary.searches, 50);
        // The chain is fully connected; every sampled pair has a path.
        assert_eq!(summary.reachable, 50);
        assert_eq!(bench.phase(), Phase::Closed);
    }

    #[test]
    fn disconnected_pairs_are_counted_as_unreachable() {
        let mut g = linked_graph();
        for k in ["X", "Y"] {
            g.create_vertex(k).unwrap();
        }
        let mut bench = TraversalBench::new(g, cfg(200));
        let summary = bench.run().unwrap().unwrap();
        assert!(summary.reachable < summary.searches);
        assert!(summary.reachable > 0);
    }

    #[test]
    fn unknown_distribution_fails_before_any_search() {
        let mut config = cfg(10);
        config.distribution = "poisson".to_string();
        let mut bench = TraversalBench::new(linked_graph(), config);
        let err = bench.run().unwrap_err();
        assert!(matches!(err, BenchError::Config(_)));
        // Never entered the search loop.
        assert_eq!(bench.phase(), Phase::NotStarted);
    }

    #[test]
    fn zero_report_interval_is_rejected_before_searching() {
        let mut config = cfg(10);
        config.report_every = 0;
        let mut bench = TraversalBench::new(linked_graph(), config);
        let err = bench.run().unwrap_err();
        assert!(matches!(err, BenchError::Config(_)));
        assert_eq!(bench.phase(), Phase::NotStarted);
    }

    #[test]
    fn backend_random_selection_uses_random_vertex() {
        let mut config = cfg(20);
        config.selection = VertexSelection::BackendRandom;
        let mut bench = TraversalBench::new(linked_graph(), config);
        let summary = bench.run().unwrap().unwrap();
        assert_eq!(summary.searches, 20);
    }

    #[test]
    fn same_seed_gives_same_reachability_counts() {
        let run = || {
            let mut g = linked_graph();
            g.create_vertex("island").unwrap();
            TraversalBench::new(g, cfg(100)).run().unwrap().unwrap()
        };
        assert_eq!(run().reachable, run().reachable);
    }

    #[test]
    fn zipf_distribution_is_accepted() {
        let mut config = cfg(30);
        config.distribution = "zipf".to_string();
        let mut bench = TraversalBench::new(linked_graph(), config);
        assert!(bench.run().unwrap().is_some());
    }
}
