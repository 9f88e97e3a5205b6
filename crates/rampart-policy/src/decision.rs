//! The decision protocol between the interceptor and the policy engine.
//!
//! A check settles exactly one [`Verdict`] per request through a [`Decision`]
//! handle; the interceptor awaits the paired receiver. A policy that settles
//! twice is a defect, but the second call is absorbed rather than crashing or
//! double-responding: the first verdict wins.

use std::sync::Mutex;
use tokio::sync::oneshot;

/// Cause of a failed check.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// The target resource does not exist. Surfaced as a 404 so that
    /// authorization does not conflate "absent" with "denied".
    #[error("resource not found: {resource}")]
    ResourceNotFound {
        /// Name of the missing resource.
        resource: String,
    },

    /// Policy evaluation failed for any other reason. Always denied
    /// fail-closed.
    #[error(transparent)]
    Evaluation(#[from] anyhow::Error),
}

/// Classify a failure cause as "not found" vs. generic error. Policy engines
/// consult this before choosing which way to settle.
pub fn is_not_found(cause: &CheckError) -> bool {
    matches!(cause, CheckError::ResourceNotFound { .. })
}

/// Terminal outcome of one authorization check.
#[derive(Debug)]
pub enum Verdict {
    /// Proceed with the action. The value is opaque policy metadata,
    /// forwarded to audit only.
    Allow(serde_json::Value),
    /// Deny the action.
    Forbidden,
    /// The target resource is absent.
    NotFound(CheckError),
    /// Evaluation failed; deny fail-closed.
    Errored(CheckError),
}

/// Settle-once handle given to the policy's check routine.
///
/// Each settle method returns whether this call decided the request; `false`
/// means a verdict had already been produced and this one was discarded.
/// Dropping the handle unsettled makes the receiver resolve with an error,
/// which the interceptor treats as a failed check.
#[derive(Debug)]
pub struct Decision {
    tx: Mutex<Option<oneshot::Sender<Verdict>>>,
}

/// Create a decision handle and the receiver for its verdict.
pub fn pending_decision() -> (Decision, oneshot::Receiver<Verdict>) {
    let (tx, rx) = oneshot::channel();
    (
        Decision {
            tx: Mutex::new(Some(tx)),
        },
        rx,
    )
}

impl Decision {
    pub fn allow(&self, result: serde_json::Value) -> bool {
        self.settle(Verdict::Allow(result))
    }

    pub fn forbidden(&self) -> bool {
        self.settle(Verdict::Forbidden)
    }

    pub fn not_found(&self, cause: CheckError) -> bool {
        self.settle(Verdict::NotFound(cause))
    }

    pub fn errored(&self, cause: CheckError) -> bool {
        self.settle(Verdict::Errored(cause))
    }

    fn settle(&self, verdict: Verdict) -> bool {
        let sender = self
            .tx
            .lock()
            .expect("decision sender poisoned")
            .take();
        match sender {
            // The receiver may already be gone when the request flow was
            // cancelled; the verdict is simply discarded then.
            Some(tx) => tx.send(verdict).is_ok(),
            None => {
                tracing::debug!("verdict already settled, ignoring duplicate");
                false
            }
        }
    }
}
