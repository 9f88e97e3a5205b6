//! # rampart-policy
//!
//! The decision protocol and the hot-swappable policy snapshot.
//!
//! The rule engine itself is opaque to this crate: anything implementing
//! [`Policy`] can decide requests. What this crate pins down is the contract
//! around it:
//!
//! - exactly one [`Verdict`] per request, produced through a settle-once
//!   [`Decision`] handle;
//! - an atomically published [`PolicySnapshot`] (policy + audit sink) that
//!   readers fetch lock-free while reloads build replacements off to the
//!   side;
//! - fail toward last-known-good: a reload whose policy fails to construct
//!   leaves the previous snapshot active.

pub mod decision;
pub mod engine;
pub mod error;
pub mod holder;
pub mod reload;
pub mod request;

pub use decision::{CheckError, Decision, Verdict, is_not_found, pending_decision};
pub use engine::{AllowAllPolicy, Policy, PolicyFactory};
pub use error::PolicyError;
pub use holder::{PolicyHolder, PolicySnapshot};
pub use reload::spawn_settings_listener;
pub use request::RequestContext;
