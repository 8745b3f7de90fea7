//! Post-query ACL filter for materialized result sets
//!
//! Index and text searches produce finite, already-ordered candidate lists
//! outside the metadata query engine. This entry point applies the same
//! window loop to such a list, so its skip/limit/budget semantics are
//! identical to the streaming path by construction.

use crate::error::Result;
use crate::page::ResultPage;
use crate::source::MaterializedSource;
use crate::trim::{trim_to_window, CheckTracker};
use strata_core::{BudgetLimits, CandidateNode, QueryWindow};
use strata_policy::PermissionGate;

/// Filter a materialized candidate list down to a security-trimmed page.
///
/// The assembled page retains a shared handle to the unfiltered input. Budget
/// ceilings are taken as given; callers wanting engine-wide defaults should
/// go through [`QueryEngine::filter_materialized`](crate::engine::QueryEngine::filter_materialized).
pub async fn filter_materialized(
    items: Vec<CandidateNode>,
    window: QueryWindow,
    limits: BudgetLimits,
    gate: &dyn PermissionGate,
) -> Result<ResultPage> {
    let span = tracing::debug_span!(
        "acl_filter",
        input = items.len(),
        skip = window.skip_count(),
        max_items = window.max_items().as_raw(),
        checks = tracing::field::Empty,
        emitted = tracing::field::Empty,
    );
    let _guard = span.enter();

    let mut source = MaterializedSource::new(items);
    let unfiltered = source.unfiltered();
    let mut tracker = CheckTracker::new(gate, limits);
    let trimmed = trim_to_window(&mut source, &mut tracker, window).await?;

    span.record("checks", trimmed.checks_performed);
    span.record("emitted", trimmed.items.len());

    Ok(ResultPage::assemble(
        trimmed,
        window.max_items(),
        Some(unfiltered),
    ))
}
