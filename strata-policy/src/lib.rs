//! Permission gate boundary for the strata query layer
//!
//! Read-access evaluation itself is owned by the surrounding authorization
//! subsystem; this crate only defines the contract the query layer consumes,
//! plus reference gates for embedding and testing:
//!
//! - [`AccessDecision`]: the two-valued outcome of a read-access check
//! - [`PermissionGate`]: synchronous per-candidate check, called at most once
//!   per candidate per page-assembly call
//! - [`RootGate`]: allow-everything bypass for system principals
//! - [`AclSetGate`]: explicit allow-set over document ids
//! - [`FailingGate`]: fails every check, for exercising error paths
//!
//! # Failure semantics
//!
//! A gate error is not a denial. It propagates out of the page-assembly call,
//! which aborts without returning a partial page.

mod error;
mod gate;
mod types;

pub use error::{PolicyError, Result};
pub use gate::{AclSetGate, FailingGate, PermissionGate, RootGate};
pub use types::AccessDecision;
