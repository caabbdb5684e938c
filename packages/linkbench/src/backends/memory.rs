//! Ephemeral in-memory graph backend.
//!
//! Vertices are dense serials in creation order; the key index is a
//! plain `HashMap`. Implements both the storage seam for ingestion and
//! the traverser contract (BFS shortest path over undirected adjacency).
//! `commit` is a no-op: everything lives and dies with the process.

use std::collections::{HashMap, VecDeque};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::warn;

use crate::error::{BenchError, Result};
use crate::service::{GraphTraverserService, LoaderBackend};

const DEFAULT_RANDOM_SEED: u64 = 0x6c696e6b;

pub struct MemoryGraph {
    /// serial -> key; creation order defines serials.
    keys: Vec<String>,
    index: HashMap<String, u64>,
    outgoing: Vec<Vec<u64>>,
    incoming: Vec<Vec<u64>>,
    edges: u64,
    rng: ChaCha8Rng,
}

impl Default for MemoryGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::with_random_seed(DEFAULT_RANDOM_SEED)
    }

    /// Seed only affects `random_vertex`; storage is deterministic.
    pub fn with_random_seed(seed: u64) -> Self {
        Self {
            keys: Vec::new(),
            index: HashMap::new(),
            outgoing: Vec::new(),
            incoming: Vec::new(),
            edges: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn edge_count(&self) -> u64 {
        self.edges
    }

    pub fn key(&self, serial: u64) -> Option<&str> {
        self.keys.get(serial as usize).map(|s| s.as_str())
    }

    fn resolve_key(&self, key: &str) -> Option<u64> {
        self.index.get(key).copied()
    }

    /// Outgoing and incoming neighbors of `id`, i.e. the undirected view.
    fn undirected_neighbors(&self, id: u64) -> impl Iterator<Item = u64> + '_ {
        self.outgoing[id as usize]
            .iter()
            .chain(self.incoming[id as usize].iter())
            .copied()
    }

    /// BFS over the undirected view; returns the vertex-key path from
    /// `from` to `to`, or empty when unreachable.
    fn bfs_path(&self, from: u64, to: u64) -> Vec<String> {
        if from == to {
            return vec![self.keys[from as usize].clone()];
        }
        let mut parent: HashMap<u64, u64> = HashMap::new();
        let mut queue = VecDeque::new();
        parent.insert(from, from);
        queue.push_back(from);

        'search: while let Some(current) = queue.pop_front() {
            for next in self.undirected_neighbors(current) {
                if parent.contains_key(&next) {
                    continue;
                }
                parent.insert(next, current);
                if next == to {
                    break 'search;
                }
                queue.push_back(next);
            }
        }

        if !parent.contains_key(&to) {
            return Vec::new();
        }
        let mut path = Vec::new();
        let mut cursor = to;
        loop {
            path.push(self.keys[cursor as usize].clone());
            if cursor == from {
                break;
            }
            cursor = parent[&cursor];
        }
        path.reverse();
        path
    }
}

impl LoaderBackend for MemoryGraph {
    type Handle = u64;

    fn find_vertex(&mut self, key: &str) -> Result<Option<u64>> {
        Ok(self.resolve_key(key))
    }

    fn create_vertex(&mut self, key: &str) -> Result<u64> {
        let id = self.keys.len() as u64;
        self.keys.push(key.to_string());
        self.index.insert(key.to_string(), id);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        Ok(id)
    }

    fn create_edge(&mut self, from: &u64, to: &u64) -> Result<()> {
        self.outgoing[*from as usize].push(*to);
        self.incoming[*to as usize].push(*from);
        self.edges += 1;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

impl GraphTraverserService for MemoryGraph {
    fn database_exists(&self) -> bool {
        !self.keys.is_empty()
    }

    fn vertex_count(&self) -> u64 {
        self.keys.len() as u64
    }

    fn vertex_by_serial(&mut self, serial: u64) -> Result<String> {
        self.keys
            .get(serial as usize)
            .cloned()
            .ok_or(BenchError::SerialNotFound(serial))
    }

    fn random_vertex(&mut self) -> Result<String> {
        if self.keys.is_empty() {
            return Err(BenchError::Backend("graph is empty".to_string()));
        }
        let serial = self.rng.gen_range(0..self.keys.len() as u64);
        Ok(self.keys[serial as usize].clone())
    }

    /// `shortest_path(a, a)` returns `[a]` for an existing vertex;
    /// unknown endpoints yield an empty path.
    fn shortest_path(&mut self, from: &str, to: &str) -> Result<Vec<String>> {
        let (from_id, to_id) = match (self.resolve_key(from), self.resolve_key(to)) {
            (Some(f), Some(t)) => (f, t),
            _ => return Ok(Vec::new()),
        };
        Ok(self.bfs_path(from_id, to_id))
    }

    fn traverse(&mut self, path: &[String]) -> Result<()> {
        for key in path {
            let Some(id) = self.resolve_key(key) else {
                warn!("path vertex [{}] does not resolve", key);
                continue;
            };
            for neighbor in self.undirected_neighbors(id) {
                // Soft invariant: every stored neighbor must have a key.
                if self.keys.get(neighbor as usize).is_none() {
                    warn!("neighbor {} of [{}] has no key", neighbor, key);
                }
            }
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
