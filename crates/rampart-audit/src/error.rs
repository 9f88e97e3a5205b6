//! Error types for the audit crate.

use thiserror::Error;

/// Errors that can occur while delivering audit records.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The audit store could not be reached at all.
    #[error("audit store transport failed: {0}")]
    Transport(String),

    /// A record could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
