//! Fast-path query form selection
//!
//! Some deployments carry a denormalized projection table that lets the store
//! serve candidates without joining the full metadata schema. The selector
//! routes a query to that accelerated form when the query hints it AND the
//! cached column snapshot shows the table is usable. Selection changes what
//! is scanned, never how candidates are filtered or paginated.

use crate::column_cache::ColumnSnapshotCache;
use crate::options::FastPathHint;
use crate::store::MetadataStore;

/// Query form chosen for candidate production
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryForm {
    /// The standard metadata query
    Standard,
    /// The pre-shaped query against the denormalized projection table
    Accelerated,
}

/// Columns the accelerated form reads from the projection table
pub const REQUIRED_PROJECTION_COLUMNS: &[&str] =
    &["doc_id", "store_id", "uuid", "acl_id", "type_name"];

/// Chooses between the standard and accelerated query forms.
///
/// Holds the shared [`ColumnSnapshotCache`]; eligibility is judged against
/// the (possibly stale) snapshot, so a just-deployed projection table becomes
/// visible within one refresh interval.
pub struct FastPathSelector {
    cache: ColumnSnapshotCache,
    required_columns: Vec<String>,
}

impl FastPathSelector {
    /// Create a selector requiring the default projection columns
    pub fn new(cache: ColumnSnapshotCache) -> Self {
        Self {
            cache,
            required_columns: REQUIRED_PROJECTION_COLUMNS
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }

    /// Override the required projection columns
    pub fn with_required_columns(mut self, columns: Vec<String>) -> Self {
        self.required_columns = columns;
        self
    }

    /// Shared column snapshot cache
    pub fn cache(&self) -> &ColumnSnapshotCache {
        &self.cache
    }

    /// Pick the query form for one call.
    ///
    /// A `Standard` hint skips the snapshot entirely. With an `Accelerated`
    /// hint, an unavailable or incomplete snapshot falls back to the standard
    /// form; the fast path is an optimization, never a requirement.
    pub async fn select_form(&self, hint: FastPathHint, store: &dyn MetadataStore) -> QueryForm {
        if hint != FastPathHint::Accelerated {
            return QueryForm::Standard;
        }
        match self.cache.snapshot(store).await {
            Ok(snapshot) => {
                if snapshot.contains_all(self.required_columns.iter().map(String::as_str)) {
                    QueryForm::Accelerated
                } else {
                    tracing::debug!(
                        "projection table missing required columns, using standard form"
                    );
                    QueryForm::Standard
                }
            }
            Err(err) => {
                tracing::debug!(error = %err, "column snapshot unavailable, using standard form");
                QueryForm::Standard
            }
        }
    }
}
