//! Core data model for the strata content repository query layer
//!
//! This crate holds the types shared by the query and policy layers:
//!
//! - [`DocId`]: stable ascending internal document id (ordering/resumption key)
//! - [`NodeRef`] / [`CandidateNode`]: candidates produced by the upstream
//!   query, before permission trimming
//! - [`QueryWindow`] / [`MaxItems`]: the skip/limit window applied after
//!   permission trimming
//! - [`BudgetLimits`] / [`CheckBudget`]: the per-call ceiling on permission
//!   checks (count and wall clock)
//!
//! The query engine itself lives in `strata-query`; the permission gate
//! boundary lives in `strata-policy`.

pub mod error;
pub mod ids;
pub mod node;
pub mod tracking;
pub mod window;

pub use error::{CoreError, Result};
pub use ids::DocId;
pub use node::{CandidateNode, NodeRef};
pub use tracking::{BudgetLimits, CheckBudget};
pub use window::{MaxItems, QueryWindow};
