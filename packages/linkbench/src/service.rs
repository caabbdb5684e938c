//! Service contracts between the benchmark core and graph backends.
//!
//! Two outward-facing contracts mirror the two benchmark phases: a loader
//! for bulk ingestion and a traverser for query measurement. The loader
//! contract is deliberately minimal: no property indexing, no application
//! control over transaction scope. The only durability requirement is that
//! a successful `close()` leaves all content safely on disk; a process
//! death at any other time only guarantees data committed at earlier
//! batch boundaries.
//!
//! `LoaderBackend` is the storage seam consumed by [`crate::BatchLoader`].
//! Backends implement vertex creation, key lookup and commits; the core
//! owns call ordering, deduplication and batch boundaries.

use crate::error::{BenchError, Result};

/// Bulk-ingestion contract implemented by backends (or by the generic
/// `BatchLoader` orchestrator wrapping a `LoaderBackend`).
pub trait GraphLoaderService {
    /// Add an edge between two vertices identified by user-defined keys,
    /// creating either vertex if it does not already exist.
    ///
    /// Callers must have filtered self-referencing links out already;
    /// implementations do not re-check.
    fn add_link(&mut self, from: &str, to: &str) -> Result<()>;

    /// Commit all pending changes and release backend resources.
    ///
    /// Called once at the end of the load. After a successful return every
    /// ingested vertex and edge is durable.
    fn close(&mut self) -> Result<()>;
}

/// Query-measurement contract implemented by backends.
pub trait GraphTraverserService {
    /// Whether a previously loaded database is present. The traversal
    /// driver aborts (as a normal outcome, not an error) when this is false.
    fn database_exists(&self) -> bool;

    /// Number of vertices in the database.
    fn vertex_count(&self) -> u64;

    /// Resolve a vertex key by its creation serial in `[0, vertex_count)`.
    fn vertex_by_serial(&mut self, serial: u64) -> Result<String>;

    /// Backend-native random vertex selection.
    ///
    /// Optional: backends may support serial lookup, random selection, or
    /// both. The default implementation reports the operation as
    /// unsupported.
    fn random_vertex(&mut self) -> Result<String> {
        Err(BenchError::Unsupported("random_vertex"))
    }

    /// Shortest path between two keys, treating edges as undirected.
    /// An empty path means the target is unreachable; unknown endpoints
    /// also yield an empty path. Whether `shortest_path(a, a)` returns
    /// `[a]` or an empty path is a backend-declared convention.
    fn shortest_path(&mut self, from: &str, to: &str) -> Result<Vec<String>>;

    /// Walk the undirected neighborhood of every vertex on `path`,
    /// forcing reads of adjacent vertices. A neighbor whose key cannot be
    /// resolved indicates backend inconsistency; implementations log it
    /// and continue rather than fail.
    fn traverse(&mut self, path: &[String]) -> Result<()>;

    /// Release backend resources.
    fn close(&mut self) -> Result<()>;
}

/// Storage backend consumed by the ingestion orchestrator.
///
/// `Handle` is an opaque backend-assigned vertex identifier; the core
/// never interprets its structure, it only caches and passes it back.
pub trait LoaderBackend {
    type Handle: Clone + PartialEq;

    /// Look up the handle for a key in the backend's key index.
    fn find_vertex(&mut self, key: &str) -> Result<Option<Self::Handle>>;

    /// Create a new vertex for `key` and register it in the key index.
    /// The caller has already checked the key is absent via `find_vertex`.
    fn create_vertex(&mut self, key: &str) -> Result<Self::Handle>;

    /// Create a directed edge between two existing vertices.
    fn create_edge(&mut self, from: &Self::Handle, to: &Self::Handle) -> Result<()>;

    /// Close the current transaction, making its content durable, and
    /// open a new one.
    fn commit(&mut self) -> Result<()>;

    /// Finalize all pending writes and release resources.
    fn close(&mut self) -> Result<()>;
}
