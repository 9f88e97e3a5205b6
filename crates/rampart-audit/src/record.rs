//! Audit record types.
//!
//! An [`AuditRecord`] describes one completed authorization decision. It is
//! constructed after the verdict is finalized and never mutated afterwards;
//! ownership passes to the sink on submission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Terminal outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    /// The action was allowed to proceed.
    Allowed,
    /// The action was denied by policy.
    Forbidden,
    /// The check classified the target resource as absent.
    NotFound,
    /// Policy evaluation failed; the request was denied fail-closed.
    Errored,
}

impl std::fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Allowed => write!(f, "ALLOWED"),
            Self::Forbidden => write!(f, "FORBIDDEN"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Errored => write!(f, "ERRORED"),
        }
    }
}

/// One authorization decision, ready for indexing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Id of the originating request; doubles as the document id so entries
    /// stay traceable after batching.
    pub id: Uuid,

    /// When the verdict was finalized.
    pub occurred_at: DateTime<Utc>,

    /// Cluster action name.
    pub action: String,

    /// How the check concluded.
    pub outcome: AuditOutcome,

    /// HTTP method of the inbound request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// Request path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Originating connection address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_addr: Option<String>,

    /// Requester identity, when one was presented.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Failure cause for NotFound/Errored outcomes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Opaque metadata reported by the policy on an allow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
}

impl AuditRecord {
    /// Create a record for a finalized decision.
    pub fn new(id: Uuid, action: impl Into<String>, outcome: AuditOutcome) -> Self {
        Self {
            id,
            occurred_at: Utc::now(),
            action: action.into(),
            outcome,
            method: None,
            path: None,
            remote_addr: None,
            user: None,
            error: None,
            result: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_display() {
        assert_eq!(format!("{}", AuditOutcome::Allowed), "ALLOWED");
        assert_eq!(format!("{}", AuditOutcome::Errored), "ERRORED");
    }

    #[test]
    fn test_record_serialization_skips_empty_fields() {
        let record = AuditRecord::new(Uuid::new_v4(), "indices:data/read/search", AuditOutcome::Allowed);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["outcome"], "allowed");
        assert!(json.get("error").is_none());
        assert!(json.get("user").is_none());
    }
}
