//! Plugin settings persistence.
//!
//! Settings live in a single pretty-printed JSON file. Every operation loads
//! them fresh, so edits made by the CLI or the host take effect on the next
//! hook or webhook without a restart.
//!
//! The file is shared with the host, which may write keys this crate can't
//! read. A bad key falls back to its default alone; the rest still load.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use escalated_slack_core::Settings;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

/// Errors writing the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Filesystem operation failed.
    #[error("Settings I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings could not be encoded.
    #[error("Settings serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Source of the current plugin settings.
pub trait SettingsStore: Send + Sync {
    /// Current settings. Never fails; falls back to defaults.
    fn load(&self) -> Settings;
}

/// Settings backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    /// Store reading and writing `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the settings file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `settings`, creating the parent directory if needed.
    ///
    /// # Errors
    ///
    /// Returns error if the directory or file cannot be written.
    #[instrument(skip(self, settings), fields(path = %self.path.display()))]
    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| SettingsError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let mut json = serde_json::to_string_pretty(settings)?;
        json.push('\n');

        std::fs::write(&self.path, json).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })?;

        debug!("Settings saved");
        Ok(())
    }

    /// Write default settings if no file exists yet.
    ///
    /// Returns whether a file was created.
    ///
    /// # Errors
    ///
    /// Returns error if the defaults cannot be written.
    pub fn initialize(&self) -> Result<bool, SettingsError> {
        if self.path.exists() {
            return Ok(false);
        }

        self.save(&Settings::default())?;
        info!(path = %self.path.display(), "Created default Slack settings");
        Ok(true)
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Settings {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No settings file; using defaults");
                return Settings::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Unreadable settings file; using defaults");
                return Settings::default();
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(stored)) => merge_over_defaults(&self.path, stored),
            Ok(_) => {
                warn!(path = %self.path.display(), "Settings file is not a JSON object; using defaults");
                Settings::default()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Invalid settings file; using defaults");
                Settings::default()
            }
        }
    }
}

/// Deserialize `stored` over defaults, dropping only the keys that don't fit.
fn merge_over_defaults(path: &Path, stored: Map<String, Value>) -> Settings {
    let usable: Map<String, Value> = stored
        .into_iter()
        .filter(|(key, value)| {
            let single: Map<String, Value> = [(key.clone(), value.clone())].into_iter().collect();
            match serde_json::from_value::<Settings>(Value::Object(single)) {
                Ok(_) => true,
                Err(e) => {
                    warn!(path = %path.display(), key = %key, error = %e, "Invalid settings key; using its default");
                    false
                }
            }
        })
        .collect();

    serde_json::from_value(Value::Object(usable)).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "Invalid settings file; using defaults");
        Settings::default()
    })
}

/// Load settings on the blocking pool.
///
/// Stores may touch the filesystem, so async callers go through here rather
/// than calling [`SettingsStore::load`] on a runtime worker.
pub async fn load_settings(store: Arc<dyn SettingsStore>) -> Settings {
    match tokio::task::spawn_blocking(move || store.load()).await {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "Settings load task failed; using defaults");
            Settings::default()
        }
    }
}

/// Fixed in-memory settings.
#[derive(Debug, Clone, Default)]
pub struct StaticSettings(pub Settings);

impl SettingsStore for StaticSettings {
    fn load(&self) -> Settings {
        self.0.clone()
    }
}
