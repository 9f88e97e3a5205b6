//! Bounded accumulation of audit documents awaiting a flush.

use crate::store::AuditDocument;

/// A batch of documents owned exclusively by the sink's flusher task.
///
/// The batch is considered full once it holds `max_items` documents or its
/// accumulated serialized size reaches `max_kb` kilobytes, whichever happens
/// first. Taking the batch leaves an empty one in place.
#[derive(Debug)]
pub struct AuditBatch {
    docs: Vec<AuditDocument>,
    bytes: usize,
    max_items: usize,
    max_bytes: usize,
}

impl AuditBatch {
    pub fn new(max_items: usize, max_kb: usize) -> Self {
        Self {
            docs: Vec::new(),
            bytes: 0,
            max_items,
            max_bytes: max_kb * 1024,
        }
    }

    /// Append a document.
    pub fn push(&mut self, doc: AuditDocument) {
        self.bytes += doc.size();
        self.docs.push(doc);
    }

    /// Whether a trigger threshold has been reached.
    pub fn is_full(&self) -> bool {
        self.docs.len() >= self.max_items || self.bytes >= self.max_bytes
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Take the accumulated documents, resetting the batch.
    pub fn take(&mut self) -> Vec<AuditDocument> {
        self.bytes = 0;
        std::mem::take(&mut self.docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(body: &str) -> AuditDocument {
        AuditDocument {
            id: "r".to_string(),
            index: "rampart_audit-2026.08.29".to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_count_trigger() {
        let mut batch = AuditBatch::new(2, 100);
        batch.push(doc("{}"));
        assert!(!batch.is_full());
        batch.push(doc("{}"));
        assert!(batch.is_full());
    }

    #[test]
    fn test_size_trigger() {
        // 1 KB threshold, far below the item threshold.
        let mut batch = AuditBatch::new(1000, 1);
        batch.push(doc(&"x".repeat(600)));
        assert!(!batch.is_full());
        batch.push(doc(&"x".repeat(600)));
        assert!(batch.is_full());
    }

    #[test]
    fn test_take_resets() {
        let mut batch = AuditBatch::new(1, 100);
        batch.push(doc("{}"));
        assert!(batch.is_full());
        let docs = batch.take();
        assert_eq!(docs.len(), 1);
        assert!(batch.is_empty());
        assert!(!batch.is_full());
    }
}
