//! The unified security-trimming window loop
//!
//! One algorithm serves both entry points (the streaming metadata query
//! engine and the post-query filter over materialized index results), so the
//! skip/limit/budget semantics cannot drift between them. The loop pulls
//! candidates one at a time, consults the check budget before every pull,
//! delegates admission to the permission gate, and applies the skip/limit
//! window only to accepted candidates.
//!
//! The source is released on every exit path: normal exhaustion, page-full,
//! budget cutoff, gate error, cursor error.

use crate::cursor::CandidateCursor;
use crate::error::Result;
use strata_core::{BudgetLimits, CandidateNode, CheckBudget, QueryWindow};
use strata_policy::PermissionGate;

/// Upper bound on pre-allocated page capacity, for absurdly large limits
const PAGE_PREALLOC_CLAMP: u64 = 1024;

/// Budget-coupled permission filter for one page-assembly call.
///
/// Couples the request-scoped [`CheckBudget`] with the caller's
/// [`PermissionGate`]: every admission question goes through here, so every
/// gate invocation is counted and clocked.
pub struct CheckTracker<'a> {
    gate: &'a dyn PermissionGate,
    budget: CheckBudget,
}

impl<'a> CheckTracker<'a> {
    /// Create a tracker for one call
    pub fn new(gate: &'a dyn PermissionGate, limits: BudgetLimits) -> Self {
        Self {
            gate,
            budget: CheckBudget::new(limits),
        }
    }

    /// True iff the candidate is readable.
    ///
    /// The first call stamps the budget clock; every call counts against the
    /// check budget, and the gate's answer is returned regardless of budget
    /// state. Gate errors propagate and abort the call.
    pub fn is_included(&mut self, node: &CandidateNode) -> Result<bool> {
        self.budget.record_check();
        Ok(self.gate.has_read_access(node)?.is_allowed())
    }

    /// True once a budget ceiling is reached; no further checks may run
    pub fn should_quit_checks(&self) -> bool {
        self.budget.should_quit_checks()
    }

    /// Gate invocations so far
    pub fn checks_performed(&self) -> u64 {
        self.budget.checks_performed()
    }
}

/// Why candidate consumption stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrimOutcome {
    /// The source ran out of candidates
    SourceExhausted,
    /// The page reached `max_items + 1` entries; the last is the sentinel
    PageFull,
    /// A check-budget ceiling tripped; the page may be incomplete
    BudgetExhausted,
}

/// Output of one trim run
#[derive(Debug)]
pub struct TrimResult {
    /// Accepted candidates inside the window, in source order
    pub items: Vec<CandidateNode>,
    /// Why consumption stopped
    pub outcome: TrimOutcome,
    /// Gate invocations performed
    pub checks_performed: u64,
}

/// Pull candidates, apply permission trimming and the skip/limit window.
///
/// The cursor is canceled before returning on every path, including errors,
/// so the backing resource is released the instant a stop decision is made.
pub async fn trim_to_window<C>(
    cursor: &mut C,
    tracker: &mut CheckTracker<'_>,
    window: QueryWindow,
) -> Result<TrimResult>
where
    C: CandidateCursor + ?Sized,
{
    let result = run_window(cursor, tracker, window).await;
    cursor.cancel();
    result
}

async fn run_window<C>(
    cursor: &mut C,
    tracker: &mut CheckTracker<'_>,
    window: QueryWindow,
) -> Result<TrimResult>
where
    C: CandidateCursor + ?Sized,
{
    let capacity = window.capacity_with_sentinel();
    let mut items = match capacity {
        Some(cap) => Vec::with_capacity(cap.min(PAGE_PREALLOC_CLAMP) as usize),
        None => Vec::new(),
    };
    let mut skipped = 0u64;

    let outcome = loop {
        // Budget is consulted before the candidate is pulled or checked, so a
        // pre-exhausted budget yields an empty page with zero gate calls.
        if tracker.should_quit_checks() {
            break TrimOutcome::BudgetExhausted;
        }

        let Some(candidate) = cursor.next().await? else {
            break TrimOutcome::SourceExhausted;
        };

        // Rejected candidates are invisible to the window: they consume no
        // skip, no page slot.
        if !tracker.is_included(&candidate)? {
            continue;
        }

        if skipped < window.skip_count() {
            skipped += 1;
            continue;
        }

        items.push(candidate);
        if let Some(cap) = capacity {
            if items.len() as u64 == cap {
                // The entry just appended is the look-ahead sentinel.
                break TrimOutcome::PageFull;
            }
        }
    };

    Ok(TrimResult {
        items,
        outcome,
        checks_performed: tracker.checks_performed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{MaterializedSource, MemoryCursor};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;
    use strata_core::{DocId, NodeRef};
    use strata_policy::{AccessDecision, AclSetGate, FailingGate, PolicyError, RootGate};

    fn nodes(ids: impl IntoIterator<Item = u64>) -> Vec<CandidateNode> {
        ids.into_iter()
            .map(|id| {
                CandidateNode::new(DocId::new(id), NodeRef::new("workspace", format!("n-{id}")))
            })
            .collect()
    }

    fn window(skip: u64, max: i64) -> QueryWindow {
        QueryWindow::from_raw(skip as i64, max).unwrap()
    }

    fn ids(items: &[CandidateNode]) -> Vec<u64> {
        items.iter().map(|n| n.id().as_u64()).collect()
    }

    /// Gate wrapper counting invocations, for budget assertions
    struct CountingGate<G> {
        inner: G,
        calls: AtomicU64,
    }

    impl<G> CountingGate<G> {
        fn new(inner: G) -> Self {
            Self {
                inner,
                calls: AtomicU64::new(0),
            }
        }

        fn calls(&self) -> u64 {
            self.calls.load(Ordering::Relaxed)
        }
    }

    impl<G: PermissionGate> PermissionGate for CountingGate<G> {
        fn has_read_access(
            &self,
            node: &CandidateNode,
        ) -> std::result::Result<AccessDecision, PolicyError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            self.inner.has_read_access(node)
        }
    }

    /// Gate that sleeps on every check, for time-budget tests
    struct SlowGate {
        delay: Duration,
    }

    impl PermissionGate for SlowGate {
        fn has_read_access(
            &self,
            _node: &CandidateNode,
        ) -> std::result::Result<AccessDecision, PolicyError> {
            std::thread::sleep(self.delay);
            Ok(AccessDecision::Allowed)
        }
    }

    #[tokio::test]
    async fn test_all_accepted_first_page() {
        // Scenario (a): 20 accepted, skip=0, max=5 -> [0..=5], len 6
        let mut cursor = MemoryCursor::new(nodes(0..20));
        let mut tracker = CheckTracker::new(&RootGate, BudgetLimits::unlimited());
        let result = trim_to_window(&mut cursor, &mut tracker, window(0, 5))
            .await
            .unwrap();
        assert_eq!(ids(&result.items), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(result.outcome, TrimOutcome::PageFull);
    }

    #[tokio::test]
    async fn test_all_accepted_with_skip() {
        // Scenario (b): 20 accepted, skip=10, max=5 -> [10..=15], len 6
        let mut cursor = MemoryCursor::new(nodes(0..20));
        let mut tracker = CheckTracker::new(&RootGate, BudgetLimits::unlimited());
        let result = trim_to_window(&mut cursor, &mut tracker, window(10, 5))
            .await
            .unwrap();
        assert_eq!(ids(&result.items), vec![10, 11, 12, 13, 14, 15]);
    }

    #[tokio::test]
    async fn test_rejections_shift_the_window() {
        // Scenario (c): {0,1,2} rejected, skip=0, max=5 -> [3..=8], len 6
        let gate = AclSetGate::new((3..20).map(DocId::new));
        let mut cursor = MemoryCursor::new(nodes(0..20));
        let mut tracker = CheckTracker::new(&gate, BudgetLimits::unlimited());
        let result = trim_to_window(&mut cursor, &mut tracker, window(0, 5))
            .await
            .unwrap();
        assert_eq!(ids(&result.items), vec![3, 4, 5, 6, 7, 8]);
    }

    #[tokio::test]
    async fn test_rejections_do_not_consume_skip() {
        // Scenario (d): 6 candidates, {2,3} rejected, skip=2, max=2 -> [4,5]
        let gate = AclSetGate::new([0, 1, 4, 5].map(DocId::new));
        let mut cursor = MemoryCursor::new(nodes(0..6));
        let mut tracker = CheckTracker::new(&gate, BudgetLimits::unlimited());
        let result = trim_to_window(&mut cursor, &mut tracker, window(2, 2))
            .await
            .unwrap();
        assert_eq!(ids(&result.items), vec![4, 5]);
        assert_eq!(result.outcome, TrimOutcome::SourceExhausted);
    }

    #[tokio::test]
    async fn test_pre_exhausted_budget_checks_nothing() {
        // Scenario (e): budget pre-exhausted -> empty page, source canceled,
        // zero gate calls
        let gate = CountingGate::new(RootGate);
        let mut cursor = MemoryCursor::new(nodes(0..10));
        let mut tracker =
            CheckTracker::new(&gate, BudgetLimits::unlimited().with_max_checks(0));
        let result = trim_to_window(&mut cursor, &mut tracker, window(0, 5))
            .await
            .unwrap();
        assert!(result.items.is_empty());
        assert_eq!(result.outcome, TrimOutcome::BudgetExhausted);
        assert_eq!(gate.calls(), 0);
        assert!(cursor.is_canceled());
    }

    #[tokio::test]
    async fn test_count_budget_stops_after_exactly_max_checks() {
        let gate = CountingGate::new(RootGate);
        let mut cursor = MemoryCursor::new(nodes(0..100));
        let mut tracker =
            CheckTracker::new(&gate, BudgetLimits::unlimited().with_max_checks(7));
        let result = trim_to_window(&mut cursor, &mut tracker, window(0, 50))
            .await
            .unwrap();
        assert_eq!(gate.calls(), 7);
        assert_eq!(result.checks_performed, 7);
        assert_eq!(result.outcome, TrimOutcome::BudgetExhausted);
        // All 7 checked candidates were accepted and fit the window
        assert_eq!(ids(&result.items), vec![0, 1, 2, 3, 4, 5, 6]);
        assert!(cursor.is_canceled());
    }

    #[tokio::test]
    async fn test_time_budget_stops_after_first_slow_check() {
        let gate = SlowGate {
            delay: Duration::from_millis(15),
        };
        let mut cursor = MemoryCursor::new(nodes(0..1000));
        let mut tracker = CheckTracker::new(
            &gate,
            BudgetLimits::unlimited().with_max_check_time(Duration::from_millis(1)),
        );
        let result = trim_to_window(&mut cursor, &mut tracker, window(0, 100))
            .await
            .unwrap();
        // The first check overshoots the ceiling; the loop stops at the next
        // budget consultation. At least one check ran.
        assert_eq!(result.checks_performed, 1);
        assert_eq!(result.outcome, TrimOutcome::BudgetExhausted);
        assert!(cursor.is_canceled());
    }

    #[tokio::test]
    async fn test_unlimited_window_runs_to_exhaustion() {
        let gate = AclSetGate::new((0..50).filter(|id| id % 2 == 0).map(DocId::new));
        let mut cursor = MemoryCursor::new(nodes(0..50));
        let mut tracker = CheckTracker::new(&gate, BudgetLimits::unlimited());
        let result = trim_to_window(&mut cursor, &mut tracker, window(0, -1))
            .await
            .unwrap();
        assert_eq!(result.items.len(), 25);
        assert_eq!(result.outcome, TrimOutcome::SourceExhausted);
        assert_eq!(result.checks_performed, 50);
    }

    #[tokio::test]
    async fn test_zero_max_items_yields_single_sentinel() {
        let mut cursor = MemoryCursor::new(nodes(0..10));
        let mut tracker = CheckTracker::new(&RootGate, BudgetLimits::unlimited());
        let result = trim_to_window(&mut cursor, &mut tracker, window(0, 0))
            .await
            .unwrap();
        assert_eq!(ids(&result.items), vec![0]);
        assert_eq!(result.outcome, TrimOutcome::PageFull);
        assert!(cursor.is_canceled());
    }

    #[tokio::test]
    async fn test_page_full_cancels_before_draining_source() {
        let mut cursor = MemoryCursor::new(nodes(0..1_000));
        let mut tracker = CheckTracker::new(&RootGate, BudgetLimits::unlimited());
        let result = trim_to_window(&mut cursor, &mut tracker, window(0, 5))
            .await
            .unwrap();
        assert_eq!(result.items.len(), 6);
        assert!(cursor.is_canceled());
        // 994 rows were never pulled from the source
        assert_eq!(cursor.remaining(), 994);
    }

    #[tokio::test]
    async fn test_gate_error_aborts_and_cancels() {
        let gate = FailingGate::new("backend down");
        let mut cursor = MemoryCursor::new(nodes(0..10));
        let mut tracker = CheckTracker::new(&gate, BudgetLimits::unlimited());
        let err = trim_to_window(&mut cursor, &mut tracker, window(0, 5))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("backend down"));
        assert!(cursor.is_canceled());
    }

    #[tokio::test]
    async fn test_fewer_accepted_than_window_returns_what_was_found() {
        let mut cursor = MemoryCursor::new(nodes(0..4));
        let mut tracker = CheckTracker::new(&RootGate, BudgetLimits::unlimited());
        let result = trim_to_window(&mut cursor, &mut tracker, window(0, 10))
            .await
            .unwrap();
        assert_eq!(result.items.len(), 4);
        assert_eq!(result.outcome, TrimOutcome::SourceExhausted);
    }

    #[tokio::test]
    async fn test_materialized_source_same_semantics() {
        let gate = AclSetGate::new([0, 1, 4, 5].map(DocId::new));
        let mut source = MaterializedSource::new(nodes(0..6));
        let mut tracker = CheckTracker::new(&gate, BudgetLimits::unlimited());
        let result = trim_to_window(&mut source, &mut tracker, window(2, 2))
            .await
            .unwrap();
        assert_eq!(ids(&result.items), vec![4, 5]);
    }
}
