//! Candidate items produced by the upstream metadata query

use crate::ids::DocId;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Opaque repository reference: the store a node lives in plus its uuid.
///
/// The query layer never interprets these values; they travel through
/// trimming untouched and are handed back to the caller on the final page.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeRef {
    store: Arc<str>,
    uuid: Arc<str>,
}

impl NodeRef {
    /// Create a reference from a store identifier and node uuid
    pub fn new(store: impl Into<Arc<str>>, uuid: impl Into<Arc<str>>) -> Self {
        Self {
            store: store.into(),
            uuid: uuid.into(),
        }
    }

    /// Store identifier
    pub fn store(&self) -> &str {
        &self.store
    }

    /// Node uuid within the store
    pub fn uuid(&self) -> &str {
        &self.uuid
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.store, self.uuid)
    }
}

/// A candidate produced by the upstream query, before permission trimming.
///
/// Carries the stable ascending [`DocId`] used for ordering plus the opaque
/// [`NodeRef`]. The printable public reference is rendered lazily on first
/// access and memoized, so candidates that are rejected by the permission
/// gate or consumed by the skip window never pay the rendering cost.
#[derive(Clone, Debug)]
pub struct CandidateNode {
    id: DocId,
    node_ref: NodeRef,
    public_ref: Arc<OnceLock<String>>,
}

impl CandidateNode {
    /// Create a candidate from its internal id and repository reference
    pub fn new(id: DocId, node_ref: NodeRef) -> Self {
        Self {
            id,
            node_ref,
            public_ref: Arc::new(OnceLock::new()),
        }
    }

    /// Stable ascending internal id
    pub fn id(&self) -> DocId {
        self.id
    }

    /// Opaque repository reference
    pub fn node_ref(&self) -> &NodeRef {
        &self.node_ref
    }

    /// Public reference string, resolved on first access and memoized.
    ///
    /// Clones of a candidate share the memoized value.
    pub fn public_ref(&self) -> &str {
        self.public_ref.get_or_init(|| self.node_ref.to_string())
    }
}

impl PartialEq for CandidateNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.node_ref == other.node_ref
    }
}

impl Eq for CandidateNode {}
