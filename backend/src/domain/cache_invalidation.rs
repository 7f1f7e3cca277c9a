//! Startup sweep removing every cached order payload under a namespace.
//!
//! Keys are collected from an incremental scan and deleted in bounded
//! batches. Any backend failure aborts the sweep; startup treats that as
//! fatal so a process never serves from a namespace it failed to clear.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::ports::{CacheNamespace, OrderCache, OrderCacheError, ScanCursor};

/// Largest number of keys passed to a single delete.
pub const INVALIDATION_BATCH_SIZE: usize = 1000;

/// Outcome of a completed namespace sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InvalidationReport {
    /// Keys yielded by the scan.
    pub scanned: u64,
    /// Scanned keys outside the namespace, left untouched.
    pub foreign: u64,
    /// Keys the backend reported as removed.
    pub deleted: u64,
    /// Delete commands issued.
    pub batches: u64,
}

/// Failures that abort a namespace sweep.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheInvalidationError {
    #[error("failed to scan cache keys matching {pattern}: {source}")]
    Scan {
        pattern: String,
        #[source]
        source: OrderCacheError,
    },
    #[error("failed to delete cache keys after removing {deleted}: {source}")]
    Delete {
        deleted: u64,
        #[source]
        source: OrderCacheError,
    },
}

/// Deletes every key under a cache namespace.
pub struct NamespaceInvalidator<C> {
    cache: Arc<C>,
    batch_size: usize,
}

impl<C> NamespaceInvalidator<C> {
    pub fn new(cache: Arc<C>) -> Self {
        Self {
            cache,
            batch_size: INVALIDATION_BATCH_SIZE,
        }
    }

    /// Override the delete batch size. Zero is clamped to one.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }
}

impl<C: OrderCache> NamespaceInvalidator<C> {
    /// Scan `namespace` to completion and delete everything found.
    pub async fn invalidate(
        &self,
        namespace: &CacheNamespace,
    ) -> Result<InvalidationReport, CacheInvalidationError> {
        let pattern = namespace.scan_pattern();
        let mut report = InvalidationReport::default();
        let mut pending: Vec<String> = Vec::with_capacity(self.batch_size);
        let mut cursor = ScanCursor::START;

        loop {
            let page = self
                .cache
                .scan_prefix(&pattern, cursor)
                .await
                .map_err(|source| CacheInvalidationError::Scan {
                    pattern: pattern.clone(),
                    source,
                })?;
            report.scanned += page.keys.len() as u64;

            for key in page.keys {
                if !namespace.owns(&key) {
                    warn!(%namespace, key = %key, "scan returned a key outside the namespace");
                    report.foreign += 1;
                    continue;
                }
                pending.push(key);
                if pending.len() >= self.batch_size {
                    self.flush(&mut pending, &mut report).await?;
                }
            }

            match page.next {
                Some(next) => cursor = next,
                None => break,
            }
        }

        if !pending.is_empty() {
            self.flush(&mut pending, &mut report).await?;
        }

        info!(
            namespace = %namespace,
            scanned = report.scanned,
            foreign = report.foreign,
            deleted = report.deleted,
            batches = report.batches,
            "order cache namespace invalidated"
        );
        Ok(report)
    }

    async fn flush(
        &self,
        pending: &mut Vec<String>,
        report: &mut InvalidationReport,
    ) -> Result<(), CacheInvalidationError> {
        let removed = self
            .cache
            .delete_many(pending)
            .await
            .map_err(|source| CacheInvalidationError::Delete {
                deleted: report.deleted,
                source,
            })?;
        debug!(requested = pending.len(), removed, "deleted cache key batch");
        report.deleted += removed;
        report.batches += 1;
        pending.clear();
        Ok(())
    }
}
