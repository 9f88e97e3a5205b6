//! The policy engine seam.

use crate::decision::Decision;
use crate::error::PolicyError;
use crate::request::RequestContext;
use async_trait::async_trait;
use rampart_core::Settings;
use std::sync::Arc;

/// An opaque access-control decision engine.
///
/// `check` must settle the supplied [`Decision`] exactly once; it may do so
/// before returning or from a task of its own. Rule semantics, ordering, and
/// identity handling all live behind this trait.
#[async_trait]
pub trait Policy: Send + Sync + 'static {
    /// Evaluate one request and settle its decision.
    async fn check(&self, ctx: &RequestContext, decision: Decision);

    /// Whether denials should challenge for credentials (401 + Basic) rather
    /// than answer with a plain 403.
    fn requires_password(&self) -> bool {
        false
    }
}

/// Builds a policy engine from settings on activation and on every reload.
pub trait PolicyFactory: Send + Sync + 'static {
    fn build(&self, settings: &Settings) -> Result<Arc<dyn Policy>, PolicyError>;
}

/// Policy that allows every request. Useful as a stand-in while wiring a
/// deployment up, and in tests.
pub struct AllowAllPolicy;

#[async_trait]
impl Policy for AllowAllPolicy {
    async fn check(&self, ctx: &RequestContext, decision: Decision) {
        tracing::debug!(request = %ctx.id, action = %ctx.action, "allow-all policy");
        decision.allow(serde_json::json!({ "policy": "allow_all" }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::{Verdict, pending_decision};
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_allow_all_settles_allow() {
        let ctx = RequestContext::new(
            "indices:data/read/search",
            "GET",
            "/logs/_search",
            HashMap::new(),
            None,
            serde_json::Value::Null,
        );
        let (decision, rx) = pending_decision();
        AllowAllPolicy.check(&ctx, decision).await;
        assert!(matches!(rx.await.unwrap(), Verdict::Allow(_)));
    }
}
