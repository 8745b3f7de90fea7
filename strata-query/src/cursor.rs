//! Candidate cursor contract
//!
//! Cursors follow a pull lifecycle: call `next` until `None`, or `cancel`
//! early. Page assembly cancels on every exit path, so implementations must
//! treat `cancel` as the prompt-release signal for whatever resource backs
//! the stream (statement, connection, server-side cursor).

use crate::error::Result;
use async_trait::async_trait;
use strata_core::CandidateNode;

/// Pull-based candidate stream in ascending [`DocId`](strata_core::DocId)
/// order.
///
/// # Contract
///
/// - `next` yields candidates in ascending, stable id order and `None` once
///   exhausted.
/// - `cancel` releases whatever live resource backs the stream, promptly and
///   idempotently. A streaming query that could return millions of rows must
///   never be materialized past the cancellation point; a cursor over an
///   already-materialized list has nothing to release and may treat `cancel`
///   as a no-op. Callers stop pulling once they cancel.
#[async_trait]
pub trait CandidateCursor: Send {
    /// Pull the next candidate, or `None` once exhausted or canceled
    async fn next(&mut self) -> Result<Option<CandidateNode>>;

    /// Abandon the stream promptly; idempotent
    fn cancel(&mut self);
}

/// Boxed cursor for dynamic dispatch
pub type BoxedCursor = Box<dyn CandidateCursor + Send>;
