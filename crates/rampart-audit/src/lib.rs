//! # rampart-audit
//!
//! Best-effort, batched delivery of authorization-outcome records.
//!
//! Every intercepted action produces exactly one [`AuditRecord`] once its
//! verdict is known. Records are serialized at submission time, buffered in a
//! bounded batch, and flushed to an [`AuditStore`] when any of three triggers
//! fires: record count, serialized byte size, or elapsed time. At most one
//! flush is in flight at a time; records submitted during a flush simply wait
//! for the next batch.
//!
//! Delivery is at-most-once. A flush that fails outright is retried with
//! exponential backoff and eventually dropped; partially rejected batches are
//! logged and otherwise considered delivered. Nothing on this path may ever
//! block or fail a request-handling thread.

pub mod batch;
pub mod error;
pub mod record;
pub mod sink;
pub mod store;

pub use batch::AuditBatch;
pub use error::AuditError;
pub use record::{AuditOutcome, AuditRecord};
pub use sink::AuditSink;
pub use store::{AuditDocument, AuditStore, BulkReport, MemoryStore};
