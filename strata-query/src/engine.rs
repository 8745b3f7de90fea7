//! Page-assembly engine
//!
//! Ties the pieces together for one call: pick the query form, open the
//! streaming cursor, build the request-scoped tracker, run the trim loop,
//! return the page. Each call is independent; the only shared state is the
//! column snapshot cache inside the fast-path selector.

use crate::column_cache::ColumnSnapshotCache;
use crate::error::Result;
use crate::fast_path::FastPathSelector;
use crate::filter;
use crate::options::{EngineConfig, QueryOptions};
use crate::page::ResultPage;
use crate::store::MetadataStore;
use crate::trim::{trim_to_window, CheckTracker};
use std::sync::Arc;
use strata_core::CandidateNode;
use strata_policy::PermissionGate;
use tracing::Instrument;

/// Security-trimmed pagination over a metadata store.
///
/// One page-assembly call runs `INIT -> STREAMING -> {BUDGET_EXHAUSTED |
/// SOURCE_EXHAUSTED | PAGE_FULL} -> DONE` with no internal retries; a
/// follow-up page request is a fresh call with its own skip count.
pub struct QueryEngine<S> {
    store: Arc<S>,
    selector: FastPathSelector,
    config: EngineConfig,
}

impl<S: MetadataStore + 'static> QueryEngine<S> {
    /// Create an engine over a store, validating the configuration
    pub fn new(store: Arc<S>, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let cache = ColumnSnapshotCache::new(config.column_refresh_interval)?;
        Ok(Self {
            store,
            selector: FastPathSelector::new(cache),
            config,
        })
    }

    /// Override the columns the accelerated form requires
    pub fn with_required_columns(mut self, columns: Vec<String>) -> Self {
        self.selector = self.selector.with_required_columns(columns);
        self
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Assemble one security-trimmed page by streaming from the store.
    ///
    /// Budget ceilings unset on `options` fall back to the engine defaults.
    /// The cursor is released the instant a stop decision is made, on every
    /// exit path.
    pub async fn execute_paged(
        &self,
        options: &QueryOptions,
        gate: &dyn PermissionGate,
    ) -> Result<ResultPage> {
        let span = tracing::debug_span!(
            "execute_paged",
            skip = options.window.skip_count(),
            max_items = options.window.max_items().as_raw(),
            form = tracing::field::Empty,
            checks = tracing::field::Empty,
            emitted = tracing::field::Empty,
        );

        async {
            let form = self
                .selector
                .select_form(options.fast_path_hint, self.store.as_ref())
                .await;
            let current = tracing::Span::current();
            current.record("form", tracing::field::debug(form));

            let mut cursor = self.store.open_cursor(form).await?;
            let limits = options.budget.or_defaults(self.config.default_budget);
            let mut tracker = CheckTracker::new(gate, limits);

            let trimmed = trim_to_window(cursor.as_mut(), &mut tracker, options.window).await?;
            current.record("checks", trimmed.checks_performed);
            current.record("emitted", trimmed.items.len());

            Ok(ResultPage::assemble(
                trimmed,
                options.window.max_items(),
                None,
            ))
        }
        .instrument(span)
        .await
    }

    /// Apply the post-query ACL filter to a materialized result list, with
    /// budget ceilings falling back to the engine defaults
    pub async fn filter_materialized(
        &self,
        items: Vec<CandidateNode>,
        options: &QueryOptions,
        gate: &dyn PermissionGate,
    ) -> Result<ResultPage> {
        let limits = options.budget.or_defaults(self.config.default_budget);
        filter::filter_materialized(items, options.window, limits, gate).await
    }
}
