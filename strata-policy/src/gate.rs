//! The permission gate contract and reference gates

use crate::error::{PolicyError, Result};
use crate::types::AccessDecision;
use std::collections::HashSet;
use strata_core::{CandidateNode, DocId};

/// Synchronous read-access check for one candidate.
///
/// Implementations are supplied by the surrounding authorization subsystem.
/// The query layer calls `has_read_access` at most once per candidate per
/// page-assembly call, under the call's check budget.
pub trait PermissionGate: Send + Sync {
    /// Decide whether the requesting principal may read the candidate
    fn has_read_access(&self, node: &CandidateNode) -> Result<AccessDecision>;
}

/// Gate that allows everything.
///
/// Used for system principals that bypass trimming; with this gate the page
/// loop degenerates to plain skip/limit.
#[derive(Debug, Default, Clone, Copy)]
pub struct RootGate;

impl PermissionGate for RootGate {
    fn has_read_access(&self, _node: &CandidateNode) -> Result<AccessDecision> {
        Ok(AccessDecision::Allowed)
    }
}

/// Gate backed by an explicit allow-set of document ids.
///
/// Deny-by-default: any id not in the set is denied. Intended for embedded
/// deployments and tests standing in for a full ACL evaluator.
#[derive(Debug, Default, Clone)]
pub struct AclSetGate {
    allowed: HashSet<DocId>,
}

impl AclSetGate {
    /// Create a gate allowing exactly the given ids
    pub fn new(allowed: impl IntoIterator<Item = DocId>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }

    /// Add an id to the allow-set
    pub fn allow(mut self, id: DocId) -> Self {
        self.allowed.insert(id);
        self
    }

    /// Number of allowed ids
    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}

impl PermissionGate for AclSetGate {
    fn has_read_access(&self, node: &CandidateNode) -> Result<AccessDecision> {
        Ok(self.allowed.contains(&node.id()).into())
    }
}

/// Gate that fails every check, for exercising error paths.
#[derive(Debug, Clone)]
pub struct FailingGate {
    reason: String,
}

impl FailingGate {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl PermissionGate for FailingGate {
    fn has_read_access(&self, node: &CandidateNode) -> Result<AccessDecision> {
        Err(PolicyError::CheckFailed {
            node_ref: node.public_ref().to_string(),
            reason: self.reason.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::NodeRef;

    fn node(id: u64) -> CandidateNode {
        CandidateNode::new(DocId::new(id), NodeRef::new("workspace", format!("n-{id}")))
    }

    #[test]
    fn test_root_gate_allows_everything() {
        let gate = RootGate;
        for id in 0..5 {
            assert!(gate.has_read_access(&node(id)).unwrap().is_allowed());
        }
    }

    #[test]
    fn test_acl_set_gate_denies_by_default() {
        let gate = AclSetGate::new([DocId::new(1), DocId::new(3)]);
        assert!(gate.has_read_access(&node(1)).unwrap().is_allowed());
        assert!(!gate.has_read_access(&node(2)).unwrap().is_allowed());
        assert!(gate.has_read_access(&node(3)).unwrap().is_allowed());

        let empty = AclSetGate::default();
        assert!(empty.is_empty());
        assert!(!empty.has_read_access(&node(1)).unwrap().is_allowed());
    }

    #[test]
    fn test_acl_set_gate_allow_builder() {
        let gate = AclSetGate::default().allow(DocId::new(7));
        assert_eq!(gate.len(), 1);
        assert!(gate.has_read_access(&node(7)).unwrap().is_allowed());
    }

    #[test]
    fn test_failing_gate_propagates_reason() {
        let gate = FailingGate::new("acl backend offline");
        let err = gate.has_read_access(&node(4)).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("acl backend offline"));
        assert!(message.contains("workspace://n-4"));
    }
}
