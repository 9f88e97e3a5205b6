//! # rampart-filter
//!
//! The interception point itself: every inbound cluster action passes through
//! [`RequestInterceptor::intercept`] before execution. Requests either bypass
//! authorization (filter disabled, or no user-facing context), or are checked
//! against the active policy snapshot and answered with exactly one terminal
//! outcome: chain continuation or a rendered 401/403/404 response. Every
//! checked request leaves exactly one audit record behind.

pub mod interceptor;
pub mod response;

pub use interceptor::{InboundRequest, Proceed, ReplyChannel, RequestInterceptor};
pub use response::Response;
