//! Audit store backends.
//!
//! The store is the remote side of the sink: an append-only, date-partitioned
//! destination written with a bulk protocol that reports per-item failures.

use crate::error::AuditError;
use async_trait::async_trait;
use std::sync::Mutex;

/// One serialized audit record addressed to its daily index.
#[derive(Debug, Clone)]
pub struct AuditDocument {
    /// Document id; equal to the originating request id.
    pub id: String,
    /// Destination index, e.g. `rampart_audit-2026.08.29`.
    pub index: String,
    /// Serialized record body.
    pub body: String,
}

impl AuditDocument {
    /// Serialized size in bytes, used for the batch size trigger.
    pub fn size(&self) -> usize {
        self.body.len()
    }
}

/// Result of a bulk write that reached the store.
#[derive(Debug, Clone, Default)]
pub struct BulkReport {
    /// Failure message per rejected document. Empty on full success.
    pub item_failures: Vec<String>,
}

impl BulkReport {
    /// Whether every document was accepted.
    pub fn all_accepted(&self) -> bool {
        self.item_failures.is_empty()
    }
}

/// Trait for bulk-writing audit documents.
///
/// An `Err` means the transport failed and nothing was written; a `Ok` report
/// with item failures means the write landed but some documents were
/// rejected. The sink treats those two cases very differently.
#[async_trait]
pub trait AuditStore: Send + Sync + 'static {
    /// Write a batch of documents.
    async fn bulk_write(&self, docs: Vec<AuditDocument>) -> Result<BulkReport, AuditError>;
}

/// In-memory store, for tests and local development.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: Mutex<Vec<AuditDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All documents written so far.
    pub fn documents(&self) -> Vec<AuditDocument> {
        self.docs.lock().expect("memory store poisoned").clone()
    }
}

#[async_trait]
impl AuditStore for MemoryStore {
    async fn bulk_write(&self, docs: Vec<AuditDocument>) -> Result<BulkReport, AuditError> {
        self.docs.lock().expect("memory store poisoned").extend(docs);
        Ok(BulkReport::default())
    }
}
