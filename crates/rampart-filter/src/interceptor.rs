//! The filter-chain hook.

use crate::response::{self, Response};
use rampart_audit::{AuditOutcome, AuditRecord};
use rampart_policy::{
    CheckError, PolicyHolder, PolicySnapshot, RequestContext, Verdict, pending_decision,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Continuation supplied by the host: invoking it lets the action execute
/// normally.
pub type Proceed = Box<dyn FnOnce() + Send + 'static>;

/// The originating connection of a user-facing request. The host passes this
/// explicitly with every interception; there is no ambient lookup.
pub trait ReplyChannel: Send + Sync + 'static {
    /// Send a terminal response to the caller.
    fn send_response(&self, response: Response);
}

/// Inbound representation of the request, as received on the REST surface.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub remote_addr: Option<String>,
    pub body: serde_json::Value,
}

/// Intercepts every cluster action and routes user-facing requests through
/// the active policy.
///
/// `intercept` never blocks the calling thread: it either proceeds
/// immediately (bypass) or hands the request to a spawned authorization flow
/// and returns. The flow produces exactly one terminal outcome and exactly
/// one audit record. If the host aborts the flow before a verdict exists,
/// nothing is emitted; the request context is simply reclaimed.
pub struct RequestInterceptor {
    holder: Arc<PolicyHolder>,
}

impl RequestInterceptor {
    pub fn new(holder: Arc<PolicyHolder>) -> Self {
        Self { holder }
    }

    /// Intercept one action.
    ///
    /// Bypasses (calls `proceed` unchanged) when no policy is active, or when
    /// the request lacks an originating channel or an inbound representation,
    /// which marks it as a system-internal call.
    pub fn intercept(
        &self,
        action: &str,
        inbound: Option<InboundRequest>,
        origin: Option<Arc<dyn ReplyChannel>>,
        proceed: Proceed,
    ) {
        let Some(snapshot) = self.holder.current() else {
            proceed();
            return;
        };
        let (Some(inbound), Some(origin)) = (inbound, origin) else {
            tracing::debug!(action, "system call, skipping authorization");
            proceed();
            return;
        };

        let ctx = Arc::new(RequestContext::new(
            action,
            inbound.method,
            inbound.path,
            inbound.headers,
            inbound.remote_addr,
            inbound.body,
        ));
        tokio::spawn(authorize(snapshot, ctx, origin, proceed));
    }
}

/// Run the policy check and translate its verdict into the terminal outcome.
async fn authorize(
    snapshot: Arc<PolicySnapshot>,
    ctx: Arc<RequestContext>,
    origin: Arc<dyn ReplyChannel>,
    proceed: Proceed,
) {
    let (decision, verdict_rx) = pending_decision();
    let check = tokio::spawn({
        let policy = Arc::clone(&snapshot.policy);
        let ctx = Arc::clone(&ctx);
        async move { policy.check(&ctx, decision).await }
    });

    let verdict = match verdict_rx.await {
        Ok(verdict) => verdict,
        // The check finished without settling: either it returned early or it
        // panicked. Both deny fail-closed.
        Err(_) => {
            let cause = match check.await {
                Err(join) if join.is_panic() => anyhow::anyhow!("policy check panicked"),
                _ => anyhow::anyhow!("policy check completed without a verdict"),
            };
            Verdict::Errored(CheckError::Evaluation(cause))
        }
    };

    let record = audit_record(&ctx, &verdict);
    match verdict {
        Verdict::Allow(_) => {
            tracing::debug!(request = %ctx.id, action = %ctx.action, "request allowed");
            proceed();
        }
        Verdict::Forbidden => {
            tracing::debug!(request = %ctx.id, action = %ctx.action, "request forbidden");
            origin.send_response(response::denial(
                &snapshot.settings.forbidden_message,
                snapshot.policy.requires_password(),
            ));
        }
        Verdict::NotFound(cause) => {
            origin.send_response(response::not_found(&cause));
        }
        Verdict::Errored(cause) => {
            tracing::error!(
                request = %ctx.id,
                action = %ctx.action,
                error = %cause,
                "policy evaluation failed, denying request"
            );
            origin.send_response(response::denial(
                &snapshot.settings.forbidden_message,
                snapshot.policy.requires_password(),
            ));
        }
    }
    snapshot.audit.submit(&record);
}

/// Derive the audit record for a finalized verdict.
fn audit_record(ctx: &RequestContext, verdict: &Verdict) -> AuditRecord {
    let outcome = match verdict {
        Verdict::Allow(_) => AuditOutcome::Allowed,
        Verdict::Forbidden => AuditOutcome::Forbidden,
        Verdict::NotFound(_) => AuditOutcome::NotFound,
        Verdict::Errored(_) => AuditOutcome::Errored,
    };
    let mut record = AuditRecord::new(ctx.id, ctx.action.clone(), outcome);
    record.method = Some(ctx.method.clone());
    record.path = Some(ctx.path.clone());
    record.remote_addr = ctx.remote_addr.clone();
    record.user = ctx.user().map(str::to_string);
    match verdict {
        Verdict::Allow(result) => record.result = Some(result.clone()),
        Verdict::NotFound(cause) | Verdict::Errored(cause) => {
            record.error = Some(cause.to_string());
        }
        Verdict::Forbidden => {}
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_audit_record_for_allow() {
        let ctx = RequestContext::new(
            "indices:data/read/search",
            "GET",
            "/logs/_search",
            HashMap::new(),
            Some("10.0.0.1:9402".to_string()),
            serde_json::Value::Null,
        );
        let verdict = Verdict::Allow(serde_json::json!({"rule": "readers"}));
        let record = audit_record(&ctx, &verdict);
        assert_eq!(record.id, ctx.id);
        assert_ne!(record.id, Uuid::nil());
        assert_eq!(record.outcome, AuditOutcome::Allowed);
        assert_eq!(record.result.as_ref().unwrap()["rule"], "readers");
        assert!(record.error.is_none());
    }

    #[test]
    fn test_audit_record_for_errored() {
        let ctx = RequestContext::new(
            "indices:data/write/bulk",
            "POST",
            "/_bulk",
            HashMap::new(),
            None,
            serde_json::Value::Null,
        );
        let verdict = Verdict::Errored(CheckError::Evaluation(anyhow::anyhow!("engine failure")));
        let record = audit_record(&ctx, &verdict);
        assert_eq!(record.outcome, AuditOutcome::Errored);
        assert_eq!(record.error.as_deref(), Some("engine failure"));
    }
}
