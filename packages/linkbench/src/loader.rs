//! Batch-committing ingestion orchestrator.
//!
//! `BatchLoader` implements the loader contract on top of any
//! [`LoaderBackend`]: it resolves endpoint keys through the single-slot
//! cache and the backend key index, creates vertices on first reference,
//! submits edges in exactly input order, and closes the open backend
//! transaction every `batch_size` inserts.
//!
//! Durability contract: once `close()` returns without error, everything
//! ingested is durable. If the process dies earlier, only the edges of
//! fully committed batches are guaranteed; the open tail batch is not.

use crate::error::{BenchError, Result};
use crate::resolve::{EndpointSlot, ResolutionCache};
use crate::service::{GraphLoaderService, LoaderBackend};

/// Commit interval in inserted edges. Matches the reference loader
/// configuration for transactional backends.
pub const DEFAULT_BATCH_SIZE: u64 = 1000;

/// Generic ingestion orchestrator over a pluggable storage backend.
#[derive(Debug)]
pub struct BatchLoader<B: LoaderBackend> {
    backend: B,
    cache: ResolutionCache<B::Handle>,
    inserts: u64,
    batch_size: u64,
}

impl<B: LoaderBackend> BatchLoader<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            cache: ResolutionCache::new(),
            inserts: 0,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Rejects a zero `batch_size` as a configuration error.
    pub fn with_batch_size(backend: B, batch_size: u64) -> Result<Self> {
        if batch_size == 0 {
            return Err(BenchError::Config(
                "batch size must be non-zero".to_string(),
            ));
        }
        Ok(Self {
            backend,
            cache: ResolutionCache::new(),
            inserts: 0,
            batch_size,
        })
    }

    /// Edges submitted to the backend so far.
    pub fn inserts(&self) -> u64 {
        self.inserts
    }

    /// Give the backend back, e.g. to reuse it for traversal in tests.
    pub fn into_backend(self) -> B {
        self.backend
    }
}

/// Resolve one endpoint: cache slot first, then the backend key index,
/// creating the vertex on a full miss. The slot is updated to the
/// resolved pair either way.
fn resolve<B: LoaderBackend>(
    backend: &mut B,
    slot: &mut EndpointSlot<B::Handle>,
    key: &str,
) -> Result<B::Handle> {
    if let Some(handle) = slot.hit(key) {
        return Ok(handle);
    }
    let handle = match backend.find_vertex(key)? {
        Some(handle) => handle,
        None => backend.create_vertex(key)?,
    };
    slot.store(key, handle.clone());
    Ok(handle)
}

impl<B: LoaderBackend> GraphLoaderService for BatchLoader<B> {
    fn add_link(&mut self, from: &str, to: &str) -> Result<()> {
        let from_handle = resolve(&mut self.backend, &mut self.cache.from, from)?;
        let to_handle = resolve(&mut self.backend, &mut self.cache.to, to)?;
        self.backend.create_edge(&from_handle, &to_handle)?;

        self.inserts += 1;
        if self.inserts % self.batch_size == 0 {
            self.backend.commit()?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.backend.commit()?;
        self.backend.close()?;
        tracing::debug!("loader closed after {} inserts", self.inserts);
        Ok(())
    }
}
