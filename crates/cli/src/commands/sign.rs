//! Sign a request body the way Slack does, for exercising `/slack/events`
//! locally.
//!
//! # Usage
//!
//! ```bash
//! slack-cli sign --body event.json
//! slack-cli sign --body event.json --timestamp 1700000000
//! ```

use std::path::Path;

use escalated_slack::settings::{FileSettingsStore, SettingsStore};
use escalated_slack::slack::{SlackError, compute_signature};
use thiserror::Error;

/// Errors that can occur while signing.
#[derive(Debug, Error)]
pub enum SignError {
    /// Body file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// No signing secret in settings.
    #[error("signing_secret is not configured")]
    MissingSigningSecret,

    /// Signature could not be computed.
    #[error(transparent)]
    Slack(#[from] SlackError),
}

/// Headers Slack would send with a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub timestamp: String,
    pub signature: String,
}

/// Sign the file at `body_path` with the configured signing secret.
///
/// Uses the current time when `timestamp` is `None`.
///
/// # Errors
///
/// Returns error if the body can't be read or no signing secret is set.
pub fn sign(
    settings_path: &Path,
    body_path: &Path,
    timestamp: Option<i64>,
) -> Result<SignedHeaders, SignError> {
    let body = std::fs::read_to_string(body_path).map_err(|source| SignError::Io {
        path: body_path.display().to_string(),
        source,
    })?;

    let secret = FileSettingsStore::new(settings_path).load().signing_secret;
    if secret.is_empty() {
        return Err(SignError::MissingSigningSecret);
    }

    let timestamp = timestamp
        .unwrap_or_else(|| chrono::Utc::now().timestamp())
        .to_string();
    let signature = compute_signature(&secret, &timestamp, &body)?;

    Ok(SignedHeaders {
        timestamp,
        signature,
    })
}
