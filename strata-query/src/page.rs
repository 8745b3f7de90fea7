//! Assembled result pages

use crate::trim::{TrimOutcome, TrimResult};
use serde::Serialize;
use std::sync::Arc;
use strata_core::{CandidateNode, MaxItems};

/// Windowed, permission-trimmed query page.
///
/// When the window is limited, a page of length `max_items + 1` carries a
/// look-ahead sentinel as its last entry: more readable data exists upstream.
/// The sentinel is not meant for display; [`display_items`](Self::display_items)
/// trims it, and [`has_more`](Self::has_more) reads it.
///
/// A budget-truncated page is distinguishable from a naturally-complete one
/// via [`truncated_by_budget`](Self::truncated_by_budget): a short page with
/// the flag set may simply have run out of checking budget, and the caller
/// can re-request with a higher ceiling or a later skip.
#[derive(Debug, Clone)]
pub struct ResultPage {
    items: Vec<CandidateNode>,
    max_items: MaxItems,
    truncated_by_budget: bool,
    unfiltered: Option<Arc<[CandidateNode]>>,
}

impl ResultPage {
    /// Assemble a page from a trim run
    pub(crate) fn assemble(
        trimmed: TrimResult,
        max_items: MaxItems,
        unfiltered: Option<Arc<[CandidateNode]>>,
    ) -> Self {
        Self {
            items: trimmed.items,
            max_items,
            truncated_by_budget: trimmed.outcome == TrimOutcome::BudgetExhausted,
            unfiltered,
        }
    }

    /// All entries, sentinel included
    pub fn items(&self) -> &[CandidateNode] {
        &self.items
    }

    /// Entry count, sentinel included
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Page size bound this page was assembled under
    pub fn max_items(&self) -> MaxItems {
        self.max_items
    }

    /// True when the look-ahead sentinel signals further readable data
    pub fn has_more(&self) -> bool {
        match self.max_items {
            MaxItems::Unlimited => false,
            MaxItems::Limit(max) => self.items.len() as u64 == max + 1,
        }
    }

    /// Entries for display: the window without the look-ahead sentinel
    pub fn display_items(&self) -> &[CandidateNode] {
        if self.has_more() {
            &self.items[..self.items.len() - 1]
        } else {
            &self.items
        }
    }

    /// True when a check-budget ceiling cut this page short.
    ///
    /// Such a page may be incomplete even without a sentinel; it must not be
    /// taken as the final page.
    pub fn truncated_by_budget(&self) -> bool {
        self.truncated_by_budget
    }

    /// Handle to the unfiltered input, retained on the materialized path
    pub fn unfiltered(&self) -> Option<&[CandidateNode]> {
        self.unfiltered.as_deref()
    }

    /// Consume the page, keeping all entries including the sentinel
    pub fn into_items(self) -> Vec<CandidateNode> {
        self.items
    }

    /// Serializable summary for logging and listing responses
    pub fn summary(&self) -> PageSummary {
        PageSummary {
            length: self.items.len(),
            has_more: self.has_more(),
            truncated_by_budget: self.truncated_by_budget,
        }
    }
}

/// Serializable page summary
#[derive(Debug, Clone, Serialize)]
pub struct PageSummary {
    /// Entry count, sentinel included
    pub length: usize,
    /// Whether a sentinel signals further data
    pub has_more: bool,
    /// Whether a budget ceiling cut the page short
    pub truncated_by_budget: bool,
}
