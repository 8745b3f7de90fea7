//! Security-trimmed, budget-bounded pagination for the strata query layer
//!
//! An upstream metadata query produces an oversized candidate stream ordered
//! by stable internal id, but not by permission. This crate returns a
//! correctly windowed (skip/limit) page containing only candidates the
//! requesting principal may read, while bounding per-item authorization cost
//! by a check-count ceiling and a wall-clock ceiling, and releasing the
//! underlying cursor the instant a ceiling trips. A complete page is
//! deliberately traded for bounded latency.
//!
//! # Architecture
//!
//! One trim loop serves both entry points:
//!
//! - [`QueryEngine::execute_paged`]: streams candidates from a
//!   [`MetadataStore`] cursor, with fast-path form selection up front.
//! - [`filter_materialized`]: applies the same loop to a finite result list
//!   produced by a separate index/text search.
//!
//! The loop itself ([`trim_to_window`]) pulls one candidate at a time,
//! consults the [`CheckTracker`] budget before every pull, and applies skip
//! and limit only to candidates the [`PermissionGate`](strata_policy::PermissionGate)
//! accepts. Pages carry a look-ahead sentinel (`max_items + 1` entries) when
//! more readable data exists, and a `truncated_by_budget` flag when a ceiling
//! cut the page short.
//!
//! Fast-path routing is an optimization only: the accelerated, pre-shaped
//! query form is used when hinted and when the shared, time-boxed
//! [`ColumnSnapshotCache`] shows the denormalized projection table is usable.

pub mod column_cache;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod fast_path;
pub mod filter;
pub mod options;
pub mod page;
pub mod source;
pub mod store;
pub mod trim;

pub use column_cache::{ColumnSnapshot, ColumnSnapshotCache};
pub use cursor::{BoxedCursor, CandidateCursor};
pub use engine::QueryEngine;
pub use error::{QueryError, Result};
pub use fast_path::{FastPathSelector, QueryForm, REQUIRED_PROJECTION_COLUMNS};
pub use filter::filter_materialized;
pub use options::{EngineConfig, FastPathHint, QueryOptions};
pub use page::{PageSummary, ResultPage};
pub use source::{MaterializedSource, MemoryCursor};
pub use store::{MemoryStore, MemoryStoreStats, MetadataStore};
pub use trim::{trim_to_window, CheckTracker, TrimOutcome, TrimResult};
