//! Settings-reload listener.
//!
//! The host exposes reloadable settings as a `watch` channel; this task
//! applies each new value to the holder. Reloads never touch in-flight
//! checks: they either publish a fresh snapshot or leave the old one alone.

use crate::holder::PolicyHolder;
use rampart_core::Settings;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Spawn a task applying settings changes to `holder` until the settings
/// source is dropped.
pub fn spawn_settings_listener(
    holder: Arc<PolicyHolder>,
    mut settings_rx: watch::Receiver<Settings>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while settings_rx.changed().await.is_ok() {
            let settings = settings_rx.borrow_and_update().clone();
            match holder.reload(&settings) {
                Ok(()) => {
                    if settings.enabled {
                        tracing::info!("settings reloaded - authorization filter enabled");
                    } else {
                        tracing::info!("settings reloaded - authorization filter disabled");
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "cannot apply reloaded settings, keeping previous policy");
                }
            }
        }
        tracing::debug!("settings listener stopped");
    })
}
