//! Per-request context handed to the policy engine.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

/// Everything the policy may inspect about one intercepted action.
///
/// Built once at interception time and read-only thereafter; it is never
/// shared across requests. The id ties the eventual audit record back to this
/// request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique id for this request.
    pub id: Uuid,
    /// Cluster action name, e.g. `indices:data/read/search`.
    pub action: String,
    /// HTTP method of the inbound request.
    pub method: String,
    /// Request path.
    pub path: String,
    /// Request headers; carries the requester's identity material.
    pub headers: HashMap<String, String>,
    /// Address of the originating connection, when known.
    pub remote_addr: Option<String>,
    /// Inbound request body.
    pub body: serde_json::Value,
    /// When the request was intercepted.
    pub received_at: DateTime<Utc>,
}

impl RequestContext {
    pub fn new(
        action: impl Into<String>,
        method: impl Into<String>,
        path: impl Into<String>,
        headers: HashMap<String, String>,
        remote_addr: Option<String>,
        body: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            action: action.into(),
            method: method.into(),
            path: path.into(),
            headers,
            remote_addr,
            body,
            received_at: Utc::now(),
        }
    }

    /// The requester identity presented with the request, if any. Looks at
    /// the conventional authorization header; richer identity extraction
    /// belongs to the policy engine.
    pub fn user(&self) -> Option<&str> {
        self.headers
            .get("x-forwarded-user")
            .or_else(|| self.headers.get("authorization"))
            .map(String::as_str)
    }
}
