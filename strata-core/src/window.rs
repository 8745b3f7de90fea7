//! Skip/limit window applied to the permission-trimmed candidate sequence

use crate::error::{CoreError, Result};

/// Maximum number of items a page may carry.
///
/// Wire formats express "unlimited" as `-1`; internally the sentinel is an
/// explicit variant so limits are always non-negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MaxItems {
    /// Keep appending until the source is exhausted or the budget trips
    #[default]
    Unlimited,
    /// At most this many items, plus one look-ahead sentinel entry
    Limit(u64),
}

impl MaxItems {
    /// Parse a raw wire value: `-1` for unlimited, `>= 0` for a limit
    pub fn from_raw(raw: i64) -> Result<Self> {
        match raw {
            -1 => Ok(Self::Unlimited),
            n if n >= 0 => Ok(Self::Limit(n as u64)),
            n => Err(CoreError::InvalidMaxItems(n)),
        }
    }

    /// Raw wire value (`-1` for unlimited)
    pub fn as_raw(self) -> i64 {
        match self {
            Self::Unlimited => -1,
            Self::Limit(n) => n as i64,
        }
    }

    /// Limit value, if bounded
    pub fn limit(self) -> Option<u64> {
        match self {
            Self::Unlimited => None,
            Self::Limit(n) => Some(n),
        }
    }

    pub fn is_unlimited(self) -> bool {
        matches!(self, Self::Unlimited)
    }
}

/// Skip/limit window for one page-assembly call.
///
/// Skip is consumed only by accepted candidates; rejected candidates never
/// advance the window. A limited window admits `max_items + 1` entries, the
/// last being the look-ahead sentinel signalling that more data exists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueryWindow {
    skip_count: u64,
    max_items: MaxItems,
}

impl QueryWindow {
    /// Create a window from already-validated parts
    pub fn new(skip_count: u64, max_items: MaxItems) -> Self {
        Self {
            skip_count,
            max_items,
        }
    }

    /// Parse a window from raw wire values, rejecting invalid configuration
    pub fn from_raw(skip_count: i64, max_items: i64) -> Result<Self> {
        if skip_count < 0 {
            return Err(CoreError::InvalidSkipCount(skip_count));
        }
        Ok(Self {
            skip_count: skip_count as u64,
            max_items: MaxItems::from_raw(max_items)?,
        })
    }

    /// Accepted candidates to discard before the page starts
    pub fn skip_count(self) -> u64 {
        self.skip_count
    }

    /// Page size bound
    pub fn max_items(self) -> MaxItems {
        self.max_items
    }

    /// Page capacity including the look-ahead sentinel entry, if bounded
    pub fn capacity_with_sentinel(self) -> Option<u64> {
        self.max_items.limit().map(|m| m + 1)
    }
}
