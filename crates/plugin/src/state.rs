//! Application state shared across handlers.

use std::sync::Arc;

use reqwest::Client;

use crate::bus::EventBus;
use crate::services::{NotificationService, WebhookDispatcher};
use crate::settings::SettingsStore;
use crate::slack::SlackApiConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Settings are not cached here;
/// each request reads them from the store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    settings: Arc<dyn SettingsStore>,
    notifier: NotificationService,
    dispatcher: WebhookDispatcher,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `settings` - Plugin settings source
    /// * `bus` - Host event bus for re-emitted Slack events
    /// * `http` - Shared HTTP client for the Slack Web API
    /// * `slack_api` - Web API endpoint and timeout
    #[must_use]
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        bus: Arc<dyn EventBus>,
        http: Client,
        slack_api: SlackApiConfig,
    ) -> Self {
        let notifier = NotificationService::new(Arc::clone(&settings), http, slack_api);
        let dispatcher = WebhookDispatcher::new(Arc::clone(&settings), bus);

        Self {
            inner: Arc::new(AppStateInner {
                settings,
                notifier,
                dispatcher,
            }),
        }
    }

    /// Get the settings source.
    #[must_use]
    pub fn settings(&self) -> &Arc<dyn SettingsStore> {
        &self.inner.settings
    }

    /// Get the lifecycle notification service.
    #[must_use]
    pub fn notifier(&self) -> &NotificationService {
        &self.inner.notifier
    }

    /// Get the Slack webhook dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &WebhookDispatcher {
        &self.inner.dispatcher
    }
}
