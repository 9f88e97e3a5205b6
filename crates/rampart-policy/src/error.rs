//! Error types for policy construction and reload.

use thiserror::Error;

/// Errors surfaced by the policy holder.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The policy engine rejected the supplied settings. The previously
    /// active snapshot, if any, stays in force.
    #[error("cannot build access control policy: {0}")]
    Construction(String),

    /// `reload` was called before `activate` supplied the audit store.
    #[error("policy holder is not activated")]
    NotActivated,
}
