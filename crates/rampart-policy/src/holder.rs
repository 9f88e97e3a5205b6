//! Atomically published policy snapshots.

use crate::engine::{Policy, PolicyFactory};
use crate::error::PolicyError;
use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use rampart_audit::{AuditSink, AuditStore};
use rampart_core::Settings;
use std::sync::{Arc, Mutex, OnceLock};

/// The active policy plus everything that travels with it.
///
/// Snapshots are immutable; a reload builds a complete replacement (including
/// a fresh audit sink) and publishes it in one atomic store. In-flight checks
/// keep the snapshot they started with, and a dereferenced snapshot's sink
/// drains on its own once the last reference drops.
pub struct PolicySnapshot {
    /// The decision engine.
    pub policy: Arc<dyn Policy>,
    /// Audit sink bound to this snapshot's settings.
    pub audit: AuditSink,
    /// The settings this snapshot was built from.
    pub settings: Settings,
    /// When the snapshot was published.
    pub created_at: DateTime<Utc>,
}

/// Holds the currently-active [`PolicySnapshot`] behind a lock-free,
/// atomically-swappable reference.
///
/// The holder starts not-activated: `current()` returns `None` and every
/// request bypasses authorization, exactly as if the filter were disabled.
/// [`activate`](Self::activate) supplies the audit store once it exists and
/// performs the first reload; subsequent reloads arrive via
/// [`reload`](Self::reload).
pub struct PolicyHolder {
    factory: Arc<dyn PolicyFactory>,
    store: OnceLock<Arc<dyn AuditStore>>,
    active: ArcSwapOption<PolicySnapshot>,
    // Serializes writers; readers never touch it.
    write: Mutex<()>,
}

impl PolicyHolder {
    pub fn new(factory: Arc<dyn PolicyFactory>) -> Self {
        Self {
            factory,
            store: OnceLock::new(),
            active: ArcSwapOption::empty(),
            write: Mutex::new(()),
        }
    }

    /// Supply the audit-store dependency and build the first snapshot.
    /// Calling this more than once keeps the original store.
    pub fn activate(
        &self,
        store: Arc<dyn AuditStore>,
        settings: &Settings,
    ) -> Result<(), PolicyError> {
        if self.store.set(store).is_err() {
            tracing::warn!("policy holder already activated, keeping original audit store");
        }
        self.reload(settings)
    }

    /// The currently-active snapshot. Lock-free; safe under arbitrary
    /// concurrent readers while a writer reloads.
    pub fn current(&self) -> Option<Arc<PolicySnapshot>> {
        self.active.load_full()
    }

    /// Apply reloaded settings.
    ///
    /// Disabled settings publish "absent", turning the filter into a pure
    /// pass-through. A policy that fails to construct leaves the previous
    /// snapshot untouched and reports the error, so the system never ends up
    /// with neither a decision nor a bypass.
    pub fn reload(&self, settings: &Settings) -> Result<(), PolicyError> {
        let _guard = self.write.lock().expect("policy writer poisoned");
        let Some(store) = self.store.get() else {
            return Err(PolicyError::NotActivated);
        };

        if !settings.enabled {
            self.active.store(None);
            return Ok(());
        }

        let policy = self.factory.build(settings)?;
        let snapshot = PolicySnapshot {
            policy,
            audit: AuditSink::new(&settings.audit, Arc::clone(store)),
            settings: settings.clone(),
            created_at: Utc::now(),
        };
        self.active.store(Some(Arc::new(snapshot)));
        tracing::debug!("published new policy snapshot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AllowAllPolicy;
    use rampart_audit::MemoryStore;

    struct FixedFactory;

    impl PolicyFactory for FixedFactory {
        fn build(&self, _settings: &Settings) -> Result<Arc<dyn Policy>, PolicyError> {
            Ok(Arc::new(AllowAllPolicy))
        }
    }

    /// Rejects any settings that carry rules.
    struct PickyFactory;

    impl PolicyFactory for PickyFactory {
        fn build(&self, settings: &Settings) -> Result<Arc<dyn Policy>, PolicyError> {
            if settings.rules.is_null() {
                Ok(Arc::new(AllowAllPolicy))
            } else {
                Err(PolicyError::Construction("malformed rules".to_string()))
            }
        }
    }

    fn allow_all_factory() -> Arc<dyn PolicyFactory> {
        Arc::new(FixedFactory)
    }

    #[tokio::test]
    async fn test_not_activated_reads_as_absent() {
        let holder = PolicyHolder::new(allow_all_factory());
        assert!(holder.current().is_none());
        assert!(matches!(
            holder.reload(&Settings::default()),
            Err(PolicyError::NotActivated)
        ));
    }

    #[tokio::test]
    async fn test_activate_publishes_snapshot() {
        let holder = PolicyHolder::new(allow_all_factory());
        holder
            .activate(Arc::new(MemoryStore::new()), &Settings::default())
            .unwrap();
        let snapshot = holder.current().expect("active snapshot");
        assert!(snapshot.audit.enabled());
    }

    #[tokio::test]
    async fn test_disabled_settings_publish_absent() {
        let holder = PolicyHolder::new(allow_all_factory());
        holder
            .activate(Arc::new(MemoryStore::new()), &Settings::default())
            .unwrap();
        assert!(holder.current().is_some());

        let disabled = Settings {
            enabled: false,
            ..Default::default()
        };
        holder.reload(&disabled).unwrap();
        assert!(holder.current().is_none());
    }

    // Scenario D: a rejected reload keeps the previous snapshot active.
    #[tokio::test]
    async fn test_failed_reload_keeps_previous_snapshot() {
        let holder = PolicyHolder::new(Arc::new(PickyFactory));
        holder
            .activate(Arc::new(MemoryStore::new()), &Settings::default())
            .unwrap();
        let before = holder.current().expect("active snapshot");

        let bad = Settings {
            rules: serde_json::json!({"bad": true}),
            ..Default::default()
        };
        assert!(matches!(
            holder.reload(&bad),
            Err(PolicyError::Construction(_))
        ));

        let after = holder.current().expect("still active");
        assert!(Arc::ptr_eq(&before, &after), "snapshot unchanged");
    }

    #[tokio::test]
    async fn test_reload_swaps_snapshot() {
        let holder = PolicyHolder::new(allow_all_factory());
        holder
            .activate(Arc::new(MemoryStore::new()), &Settings::default())
            .unwrap();
        let first = holder.current().unwrap();

        holder.reload(&Settings::default()).unwrap();
        let second = holder.current().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        // The old snapshot is still usable by in-flight checks.
        assert!(first.audit.enabled());
    }
}
