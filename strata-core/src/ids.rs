//! Stable internal document identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable internal document id.
///
/// Ids are assigned in insertion order and never reused, so ascending id
/// order is a total, stable order over candidates. Pagination uses it as the
/// ordering and resumption key: a follow-up page request re-scans from its
/// own skip count against the same ascending sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(u64);

impl DocId {
    /// Create a doc id from its raw value
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw id value
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for DocId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_follows_raw_value() {
        assert!(DocId::new(1) < DocId::new(2));
        assert!(DocId::new(100) > DocId::new(99));
        assert_eq!(DocId::new(7), DocId::from(7));
    }

    #[test]
    fn test_display() {
        assert_eq!(DocId::new(42).to_string(), "doc:42");
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&DocId::new(5)).unwrap();
        assert_eq!(json, "5");
        let back: DocId = serde_json::from_str("5").unwrap();
        assert_eq!(back, DocId::new(5));
    }
}
