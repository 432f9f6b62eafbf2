//! Plugin activation and deactivation.
//!
//! # Usage
//!
//! ```bash
//! # Create default settings if missing
//! slack-cli activate
//!
//! # Tell the host the plugin was switched off
//! slack-cli deactivate
//! ```
//!
//! # Environment Variables
//!
//! - `ESCALATED_SLACK_SETTINGS_PATH` - Settings file (default: config/settings.json)
//! - `ESCALATED_HOST_CALLBACK_URL` - Host endpoint receiving the deactivation notice

use std::path::Path;

use escalated_slack::bus::{BusError, HostAction, HttpHostBus};
use escalated_slack::services::{Activation, activate as activate_plugin, deactivation_notice};
use escalated_slack::settings::{FileSettingsStore, SettingsError};
use thiserror::Error;
use url::Url;

/// Errors that can occur during lifecycle operations.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Settings file could not be written.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Host callback URL is malformed.
    #[error("Invalid ESCALATED_HOST_CALLBACK_URL: {0}")]
    InvalidCallbackUrl(#[from] url::ParseError),

    /// Host rejected or never received the notice.
    #[error(transparent)]
    Bus(#[from] BusError),
}

/// Activate the plugin against the settings file at `path`.
///
/// # Errors
///
/// Returns error if the default settings cannot be written.
pub fn activate(path: &Path) -> Result<Activation, LifecycleError> {
    let store = FileSettingsStore::new(path);
    let activation = activate_plugin(&store)?;

    if activation.created_settings {
        tracing::info!("Wrote default settings to {}", path.display());
    } else {
        tracing::info!("Settings already present at {}", path.display());
    }

    Ok(activation)
}

/// Build the deactivation notice and deliver it to the host, if a callback
/// URL is configured.
///
/// Settings are left untouched.
///
/// # Errors
///
/// Returns error if the callback URL is malformed or delivery fails.
pub async fn deactivate(callback_url: Option<&str>) -> Result<HostAction, LifecycleError> {
    let notice = deactivation_notice(chrono::Utc::now());

    match callback_url {
        Some(raw) => {
            let url = Url::parse(raw)?;
            HttpHostBus::new(reqwest::Client::new(), url)
                .deliver(&notice)
                .await?;
            tracing::info!("Deactivation notice delivered to host");
        }
        None => {
            tracing::warn!("ESCALATED_HOST_CALLBACK_URL not set; notice not delivered");
        }
    }

    Ok(notice)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_writes_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config/settings.json");

        assert!(activate(&path).unwrap().created_settings);
        assert!(!activate(&path).unwrap().created_settings);
    }

    #[tokio::test]
    async fn test_deactivate_without_callback_returns_notice() {
        let notice = deactivate(None).await.unwrap();
        assert_eq!(notice.action, "slack.deactivated");
        assert_eq!(notice.audience.as_deref(), Some("admin"));
        assert!(notice.event["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn test_deactivate_rejects_bad_url() {
        let result = deactivate(Some("not a url")).await;
        assert!(matches!(result, Err(LifecycleError::InvalidCallbackUrl(_))));
    }
}
