//! Candidate source realizations
//!
//! Two realizations of [`CandidateCursor`] with the same external contract:
//!
//! - [`MemoryCursor`]: streaming mode over an executed in-memory query,
//!   serving rows one at a time; `cancel` abandons the remaining rows.
//!   Database-backed stores implement the same trait over a live server-side
//!   cursor.
//! - [`MaterializedSource`]: a finite, already-computed ordered list (for
//!   example an index search result); `cancel` is a no-op, and the unfiltered
//!   input stays available as a shared handle for the assembled page.

use crate::cursor::CandidateCursor;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use strata_core::{CandidateNode, DocId};

fn debug_assert_ascending(last: &mut Option<DocId>, next: DocId) {
    if let Some(prev) = *last {
        debug_assert!(prev < next, "candidate order regressed: {prev} -> {next}");
    }
    *last = Some(next);
}

/// Streaming cursor over an executed in-memory query.
///
/// Rows are served one at a time; `cancel` drops the remaining rows so
/// nothing past the cancellation point is ever served.
pub struct MemoryCursor {
    rows: std::vec::IntoIter<CandidateNode>,
    canceled: bool,
    last_id: Option<DocId>,
}

impl MemoryCursor {
    /// Create a cursor over rows already in ascending id order
    pub fn new(rows: Vec<CandidateNode>) -> Self {
        Self {
            rows: rows.into_iter(),
            canceled: false,
            last_id: None,
        }
    }

    /// Rows not yet served (also counts rows abandoned by `cancel`)
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled
    }
}

#[async_trait]
impl CandidateCursor for MemoryCursor {
    async fn next(&mut self) -> Result<Option<CandidateNode>> {
        if self.canceled {
            return Ok(None);
        }
        let next = self.rows.next();
        if let Some(node) = &next {
            debug_assert_ascending(&mut self.last_id, node.id());
        }
        Ok(next)
    }

    fn cancel(&mut self) {
        self.canceled = true;
    }
}

/// Finite, already-computed candidate list.
///
/// Wraps the output of a separate index/text search. The full input is held
/// behind a shared handle so the assembled page can retain a reference to the
/// unfiltered result set.
pub struct MaterializedSource {
    unfiltered: Arc<[CandidateNode]>,
    pos: usize,
    last_id: Option<DocId>,
}

impl MaterializedSource {
    /// Create a source over items already in ascending id order
    pub fn new(items: Vec<CandidateNode>) -> Self {
        Self {
            unfiltered: items.into(),
            pos: 0,
            last_id: None,
        }
    }

    /// Shared handle to the complete unfiltered input
    pub fn unfiltered(&self) -> Arc<[CandidateNode]> {
        Arc::clone(&self.unfiltered)
    }
}

#[async_trait]
impl CandidateCursor for MaterializedSource {
    async fn next(&mut self) -> Result<Option<CandidateNode>> {
        let Some(node) = self.unfiltered.get(self.pos) else {
            return Ok(None);
        };
        self.pos += 1;
        debug_assert_ascending(&mut self.last_id, node.id());
        Ok(Some(node.clone()))
    }

    fn cancel(&mut self) {
        // Nothing to release: the input is already materialized. The page
        // keeps its handle to the unfiltered list regardless.
    }
}
