//! Column snapshot cache for fast-path eligibility
//!
//! The accelerated query form reads a denormalized projection table whose
//! shape can change between deployments. Rather than inspecting the table on
//! every query, the selector consults a shared, time-boxed snapshot of its
//! column names, refreshed through the store at most once per interval.
//!
//! This is an eventual-consistency optimization, not a correctness mechanism:
//! a stale snapshot between refreshes is acceptable, and readers never block
//! on a refresh in flight: the current snapshot is swapped atomically when a
//! refresh lands.

use crate::error::{QueryError, Result};
use crate::store::MetadataStore;
use arc_swap::ArcSwapOption;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Immutable snapshot of the projection table's column names
#[derive(Debug, Clone)]
pub struct ColumnSnapshot {
    columns: HashSet<String>,
    refreshed_at: Instant,
}

impl ColumnSnapshot {
    fn new(columns: Vec<String>) -> Self {
        Self {
            columns: columns.into_iter().collect(),
            refreshed_at: Instant::now(),
        }
    }

    /// Whether the snapshot carries the named column
    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains(column)
    }

    /// Whether the snapshot carries every required column
    pub fn contains_all<'a>(&self, required: impl IntoIterator<Item = &'a str>) -> bool {
        required.into_iter().all(|c| self.columns.contains(c))
    }

    /// Time since this snapshot was taken
    pub fn age(&self) -> Duration {
        self.refreshed_at.elapsed()
    }

    /// Number of columns in the snapshot
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Shared, time-boxed, read-through cache of the projection table's columns.
///
/// The only cross-request shared mutable state in the query layer. Reads are
/// a single atomic load; refreshes swap a fresh snapshot in without blocking
/// readers of the previous one. A single-flight guard keeps concurrent
/// refreshes down to one; losers serve the stale snapshot.
pub struct ColumnSnapshotCache {
    current: ArcSwapOption<ColumnSnapshot>,
    refresh_interval: Duration,
    refresh_guard: tokio::sync::Mutex<()>,
}

impl ColumnSnapshotCache {
    /// Create a cache refreshing at most once per `refresh_interval`
    pub fn new(refresh_interval: Duration) -> Result<Self> {
        if refresh_interval.is_zero() {
            return Err(QueryError::InvalidConfig(
                "column refresh interval must be non-zero".into(),
            ));
        }
        Ok(Self {
            current: ArcSwapOption::empty(),
            refresh_interval,
            refresh_guard: tokio::sync::Mutex::new(()),
        })
    }

    /// Configured refresh interval
    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// Current snapshot, read through `store` when stale or absent.
    ///
    /// A refresh failure is swallowed when a stale snapshot exists (served
    /// with a warning); with no snapshot at all it propagates.
    pub async fn snapshot(&self, store: &dyn MetadataStore) -> Result<Arc<ColumnSnapshot>> {
        if let Some(current) = self.current.load_full() {
            if current.age() < self.refresh_interval {
                return Ok(current);
            }
            // Stale. Refresh unless one is already in flight; a stale
            // snapshot between refreshes is acceptable.
            return match self.refresh_guard.try_lock() {
                Ok(_guard) => match self.refresh(store).await {
                    Ok(fresh) => Ok(fresh),
                    Err(err) => {
                        tracing::warn!(
                            error = %err,
                            "column snapshot refresh failed, serving stale snapshot"
                        );
                        Ok(current)
                    }
                },
                Err(_) => Ok(current),
            };
        }

        // First population: one caller refreshes, the rest wait for it.
        let _guard = self.refresh_guard.lock().await;
        if let Some(current) = self.current.load_full() {
            return Ok(current);
        }
        self.refresh(store).await
    }

    async fn refresh(&self, store: &dyn MetadataStore) -> Result<Arc<ColumnSnapshot>> {
        let columns = store.projection_columns().await?;
        let fresh = Arc::new(ColumnSnapshot::new(columns));
        self.current.store(Some(Arc::clone(&fresh)));
        tracing::debug!(columns = fresh.len(), "column snapshot refreshed");
        Ok(fresh)
    }
}
