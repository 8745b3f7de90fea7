//! Metadata store boundary
//!
//! Query execution itself (SQL, index scans) is outside this crate. The
//! [`MetadataStore`] trait is the seam: it executes a candidate query in the
//! selected form and hands back a live streaming cursor, and it reports the
//! columns of the denormalized projection table so the fast-path selector can
//! judge eligibility.
//!
//! [`MemoryStore`] is the in-tree realization for embedded use and tests.

use crate::cursor::BoxedCursor;
use crate::error::{QueryError, Result};
use crate::fast_path::QueryForm;
use crate::source::MemoryCursor;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use strata_core::CandidateNode;

/// Boundary to the store that executes candidate queries.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Execute the candidate query in the given form and return a live
    /// row-by-row cursor in ascending id order
    async fn open_cursor(&self, form: QueryForm) -> Result<BoxedCursor>;

    /// Column names of the denormalized projection table as currently
    /// deployed. Consumed by the column snapshot cache, never per-query.
    async fn projection_columns(&self) -> Result<Vec<String>>;
}

/// In-memory metadata store.
///
/// Rows are held in ascending id order; each opened cursor streams over a
/// snapshot of the rows at open time. Both query forms scan the same rows
/// here; the projection table is a cost optimization, not a semantic one.
#[derive(Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<CandidateNode>>,
    projection_columns: RwLock<Vec<String>>,
    cursors_opened: AtomicU64,
    accelerated_cursors: AtomicU64,
    column_reads: AtomicU64,
}

/// Usage counters for a [`MemoryStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryStoreStats {
    /// Cursors opened, both forms
    pub cursors_opened: u64,
    /// Cursors opened in the accelerated form
    pub accelerated_cursors: u64,
    /// Projection-column reads (cache refreshes)
    pub column_reads: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with rows; rows are sorted by id
    pub fn with_rows(rows: Vec<CandidateNode>) -> Self {
        let store = Self::new();
        {
            let mut guard = store.rows.write().expect("rows lock poisoned");
            *guard = rows;
            guard.sort_by_key(CandidateNode::id);
        }
        store
    }

    /// Insert one row, keeping ascending id order
    pub fn insert(&self, node: CandidateNode) {
        let mut rows = self.rows.write().expect("rows lock poisoned");
        let at = rows.partition_point(|n| n.id() < node.id());
        rows.insert(at, node);
    }

    /// Replace the deployed projection-table columns
    pub fn set_projection_columns(&self, columns: Vec<String>) {
        *self
            .projection_columns
            .write()
            .expect("columns lock poisoned") = columns;
    }

    /// Number of rows currently held
    pub fn len(&self) -> usize {
        self.rows.read().expect("rows lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Usage counters
    pub fn stats(&self) -> MemoryStoreStats {
        MemoryStoreStats {
            cursors_opened: self.cursors_opened.load(Ordering::Relaxed),
            accelerated_cursors: self.accelerated_cursors.load(Ordering::Relaxed),
            column_reads: self.column_reads.load(Ordering::Relaxed),
        }
    }
}

#[async_trait]
impl MetadataStore for MemoryStore {
    async fn open_cursor(&self, form: QueryForm) -> Result<BoxedCursor> {
        let rows = self
            .rows
            .read()
            .map_err(|_| QueryError::Store("rows lock poisoned".into()))?
            .clone();
        self.cursors_opened.fetch_add(1, Ordering::Relaxed);
        if form == QueryForm::Accelerated {
            self.accelerated_cursors.fetch_add(1, Ordering::Relaxed);
        }
        Ok(Box::new(MemoryCursor::new(rows)))
    }

    async fn projection_columns(&self) -> Result<Vec<String>> {
        self.column_reads.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .projection_columns
            .read()
            .map_err(|_| QueryError::Store("columns lock poisoned".into()))?
            .clone())
    }
}
