//! Audit sink configuration.

use serde::{Deserialize, Serialize};

/// Tuning for the batched audit sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditSinkSettings {
    /// Whether audit collection is enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Flush once a batch holds this many records.
    #[serde(default = "default_max_items")]
    pub max_items: usize,

    /// Flush once a batch's serialized size reaches this many kilobytes.
    #[serde(default = "default_max_kb")]
    pub max_kb: usize,

    /// Flush any pending records after this many seconds.
    #[serde(default = "default_max_seconds")]
    pub max_seconds: u64,

    /// Retries after a failed flush before the batch is dropped.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for AuditSinkSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_items: default_max_items(),
            max_kb: default_max_kb(),
            max_seconds: default_max_seconds(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_max_items() -> usize {
    100
}

fn default_max_kb() -> usize {
    100
}

fn default_max_seconds() -> u64 {
    2
}

fn default_max_retries() -> u32 {
    3
}
