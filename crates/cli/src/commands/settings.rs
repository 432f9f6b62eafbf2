//! Settings inspection.
//!
//! # Usage
//!
//! ```bash
//! slack-cli settings show
//! ```

use std::path::Path;

use escalated_slack::settings::{FileSettingsStore, SettingsStore};

/// Current settings as pretty JSON, with secrets masked.
///
/// # Errors
///
/// Returns error if the settings cannot be encoded.
pub fn show(path: &Path) -> Result<String, serde_json::Error> {
    let settings = FileSettingsStore::new(path).load();
    serde_json::to_string_pretty(&settings.redacted())
}
