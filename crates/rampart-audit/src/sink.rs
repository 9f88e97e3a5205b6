//! The audit sink: non-blocking submission, batched asynchronous flushing.

use crate::batch::AuditBatch;
use crate::record::AuditRecord;
use crate::store::{AuditDocument, AuditStore, BulkReport};
use chrono::{DateTime, Utc};
use rampart_core::AuditSinkSettings;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

/// Daily index prefix; one logical destination per UTC day.
const AUDIT_INDEX_PREFIX: &str = "rampart_audit-";

/// Records waiting between submission and batching. Submissions beyond this
/// are dropped with a warning rather than blocking the request path.
const SUBMIT_QUEUE_CAPACITY: usize = 10_000;

/// First retry delay after a failed flush; doubles per retry.
const BACKOFF_BASE_MS: u64 = 100;

/// Buffers authorization-outcome records and flushes them in batches.
///
/// `submit` is fire-and-forget: it serializes the record, stamps it with the
/// originating request id and the daily index name, and hands it to a single
/// background flusher task over a bounded queue. The flusher owns the batch
/// exclusively, so at most one flush is ever in flight; records submitted
/// while a flush (or its backoff retries) is running queue up for the next
/// batch.
///
/// Dropping the sink closes the queue; the flusher drains what it holds and
/// exits. A sink must be created from within a tokio runtime.
pub struct AuditSink {
    tx: Option<mpsc::Sender<AuditDocument>>,
}

impl AuditSink {
    /// Create a sink flushing to `store`. When auditing is disabled no task
    /// is spawned and `submit` is a no-op.
    pub fn new(settings: &AuditSinkSettings, store: Arc<dyn AuditStore>) -> Self {
        if !settings.enabled {
            return Self { tx: None };
        }
        let (tx, rx) = mpsc::channel(SUBMIT_QUEUE_CAPACITY);
        tokio::spawn(flush_loop(rx, store, settings.clone()));
        Self { tx: Some(tx) }
    }

    /// Whether records are being collected.
    pub fn enabled(&self) -> bool {
        self.tx.is_some()
    }

    /// Enqueue one record. Never blocks; on a full or closed queue the record
    /// is dropped and a warning logged.
    pub fn submit(&self, record: &AuditRecord) {
        let Some(tx) = &self.tx else {
            return;
        };
        let body = match serde_json::to_string(record) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "cannot serialize audit record, dropping it");
                return;
            }
        };
        let doc = AuditDocument {
            id: record.id.to_string(),
            index: index_for(record.occurred_at),
            body,
        };
        if tx.try_send(doc).is_err() {
            tracing::warn!(request = %record.id, "audit queue full or closed, dropping record");
        }
    }
}

/// Daily index name for a record timestamp.
fn index_for(at: DateTime<Utc>) -> String {
    format!("{}{}", AUDIT_INDEX_PREFIX, at.format("%Y.%m.%d"))
}

/// Single consumer of the submit queue. Batches documents and flushes on
/// count, size, or time; exactly one flush runs at a time by construction.
async fn flush_loop(
    mut rx: mpsc::Receiver<AuditDocument>,
    store: Arc<dyn AuditStore>,
    settings: AuditSinkSettings,
) {
    let mut batch = AuditBatch::new(settings.max_items, settings.max_kb);
    let period = Duration::from_secs(settings.max_seconds.max(1));
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            received = rx.recv() => match received {
                Some(doc) => {
                    batch.push(doc);
                    if batch.is_full() {
                        flush(store.as_ref(), &mut batch, &settings).await;
                        ticker.reset();
                    }
                }
                None => break,
            },
            _ = ticker.tick() => {
                if !batch.is_empty() {
                    flush(store.as_ref(), &mut batch, &settings).await;
                }
            }
        }
    }

    // Sink dropped: drain whatever is left, then stop.
    if !batch.is_empty() {
        flush(store.as_ref(), &mut batch, &settings).await;
    }
    tracing::debug!("audit flusher stopped");
}

/// Write the batch out, retrying total failures with exponential backoff.
/// The batch always comes back empty: delivered, partially delivered, or
/// dropped after exhausting retries.
async fn flush(store: &dyn AuditStore, batch: &mut AuditBatch, settings: &AuditSinkSettings) {
    let docs = batch.take();
    let count = docs.len();
    tracing::debug!(records = count, "flushing audit batch");

    let mut retries: u32 = 0;
    loop {
        match store.bulk_write(docs.clone()).await {
            Ok(report) => {
                if !report.all_accepted() {
                    log_rejections(&report);
                }
                return;
            }
            Err(e) if retries < settings.max_retries => {
                let delay = Duration::from_millis(BACKOFF_BASE_MS << retries);
                retries += 1;
                tracing::warn!(
                    error = %e,
                    retry = retries,
                    delay_ms = delay.as_millis() as u64,
                    "audit flush failed, backing off"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                tracing::error!(
                    records = count,
                    retries,
                    error = %e,
                    "audit flush failed after retries, dropping batch"
                );
                return;
            }
        }
    }
}

/// Aggregate per-item failures by message and log each distinct message once
/// with its occurrence count. Rejected records are lost; audit is best-effort.
fn log_rejections(report: &BulkReport) {
    tracing::error!(
        rejected = report.item_failures.len(),
        "some audit records were rejected by the store"
    );
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for message in &report.item_failures {
        *counts.entry(message.as_str()).or_default() += 1;
    }
    for (message, times) in counts {
        tracing::error!("{}x: {}", times, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_index_name_is_date_partitioned() {
        let at = Utc.with_ymd_and_hms(2026, 8, 29, 12, 0, 0).unwrap();
        assert_eq!(index_for(at), "rampart_audit-2026.08.29");
    }

    #[tokio::test]
    async fn test_disabled_sink_is_noop() {
        let settings = AuditSinkSettings {
            enabled: false,
            ..Default::default()
        };
        let store = Arc::new(crate::store::MemoryStore::new());
        let sink = AuditSink::new(&settings, store.clone());
        assert!(!sink.enabled());

        let record = AuditRecord::new(
            uuid::Uuid::new_v4(),
            "cluster:monitor/health",
            crate::record::AuditOutcome::Allowed,
        );
        sink.submit(&record);
        assert!(store.documents().is_empty());
    }
}
