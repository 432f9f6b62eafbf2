//! Plugin registration with the host: activation, deactivation and the
//! notification-channel descriptor.

use chrono::{DateTime, Utc};
use escalated_slack_core::Settings;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::info;

use crate::bus::HostAction;
use crate::settings::{FileSettingsStore, SettingsError};

/// Plugin version reported to the host.
pub const PLUGIN_VERSION: &str = "0.1.0";

/// Plugin slug used by the host.
pub const PLUGIN_SLUG: &str = "slack";

/// Host action broadcast on deactivation.
pub const DEACTIVATED_ACTION: &str = "slack.deactivated";

/// Host audience for lifecycle notices.
pub const ADMIN_AUDIENCE: &str = "admin";

/// Entry contributed to the host's notification channel list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationChannel {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    /// Whether a bot token is configured.
    pub enabled: bool,
}

impl NotificationChannel {
    /// The Slack channel as it currently stands.
    #[must_use]
    pub fn slack(settings: &Settings) -> Self {
        Self {
            id: PLUGIN_SLUG,
            name: "Slack",
            icon: "slack",
            description: "Send notifications to Slack channels and direct messages",
            enabled: settings.has_bot_token(),
        }
    }
}

/// Result of activating the plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activation {
    pub version: &'static str,
    /// Whether a default settings file was written.
    pub created_settings: bool,
}

/// Activate: make sure a settings file exists.
///
/// Existing settings are never overwritten.
///
/// # Errors
///
/// Returns error if the default settings cannot be written.
pub fn activate(store: &FileSettingsStore) -> Result<Activation, SettingsError> {
    let created_settings = store.initialize()?;
    info!(
        version = PLUGIN_VERSION,
        path = %store.path().display(),
        created_settings,
        "Slack plugin activated"
    );

    Ok(Activation {
        version: PLUGIN_VERSION,
        created_settings,
    })
}

/// The host action announcing deactivation at `now`.
///
/// Settings are left in place so re-activation restores them.
#[must_use]
pub fn deactivation_notice(now: DateTime<Utc>) -> HostAction {
    HostAction::new(
        DEACTIVATED_ACTION,
        json!({ "timestamp": now.format("%Y-%m-%dT%H:%M:%SZ").to_string() }),
        Value::Null,
    )
    .for_audience(ADMIN_AUDIENCE)
}
