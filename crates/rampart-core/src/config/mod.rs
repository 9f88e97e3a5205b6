//! Settings consumed by the authorization filter.
//!
//! A [`Settings`] value is produced by the host's reloadable-settings
//! component whenever configuration changes. Rampart treats each value as an
//! immutable snapshot: reloads build new state rather than mutating the old.

pub mod audit;

pub use audit::AuditSinkSettings;

use serde::{Deserialize, Serialize};

/// Top-level filter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Whether the authorization filter is enabled. When false every action
    /// bypasses authorization entirely.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Plain-text body returned on denied requests.
    #[serde(default = "default_forbidden_message")]
    pub forbidden_message: String,

    /// Opaque policy definition handed to the policy factory. The rule
    /// grammar is owned by the policy engine, not by this crate.
    #[serde(default)]
    pub rules: serde_json::Value,

    /// Audit sink tuning.
    #[serde(default)]
    pub audit: AuditSinkSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            forbidden_message: default_forbidden_message(),
            rules: serde_json::Value::Null,
            audit: AuditSinkSettings::default(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_forbidden_message() -> String {
    "Forbidden".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert!(settings.enabled);
        assert_eq!(settings.forbidden_message, "Forbidden");
        assert!(settings.rules.is_null());
        assert!(settings.audit.enabled);
    }

    #[test]
    fn test_settings_disabled() {
        let settings: Settings =
            serde_json::from_str(r#"{"enabled": false, "forbidden_message": "no entry"}"#)
                .unwrap();
        assert!(!settings.enabled);
        assert_eq!(settings.forbidden_message, "no entry");
    }
}
