//! Host event bus.
//!
//! The plugin re-emits inbound Slack events (and its own lifecycle notices)
//! as [`HostAction`]s. The host must supply a bus; two are provided:
//!
//! - [`BroadcastBus`] - in-process `tokio::sync::broadcast` fan-out
//! - [`HttpHostBus`] - POSTs each action to a host callback URL
//!
//! Publishing never blocks and never fails the caller; delivery problems are
//! logged.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, instrument, warn};
use url::Url;

/// Capacity of the in-process channel before slow subscribers lag.
const BROADCAST_CAPACITY: usize = 256;

/// An action re-emitted to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostAction {
    /// Action name, e.g. `slack.event.message`.
    pub action: String,
    /// Host audience the action targets, when it is not a plain action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    /// Primary argument.
    pub event: Value,
    /// Secondary argument (the full inbound envelope for Slack events).
    #[serde(default)]
    pub payload: Value,
}

impl HostAction {
    /// Create an action with both arguments.
    #[must_use]
    pub fn new(action: impl Into<String>, event: Value, payload: Value) -> Self {
        Self {
            action: action.into(),
            audience: None,
            event,
            payload,
        }
    }

    /// Target a host audience (e.g. `admin`).
    #[must_use]
    pub fn for_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }
}

/// Destination for re-emitted host actions.
pub trait EventBus: Send + Sync {
    /// Publish a fully built action.
    fn publish(&self, action: HostAction);

    /// Publish `action` with `(event, payload)`.
    fn dispatch(&self, action: &str, event: &Value, payload: &Value) {
        self.publish(HostAction::new(action, event.clone(), payload.clone()));
    }
}

// =============================================================================
// In-process bus
// =============================================================================

/// In-process bus backed by a broadcast channel.
#[derive(Debug, Clone)]
pub struct BroadcastBus {
    sender: broadcast::Sender<HostAction>,
}

impl BroadcastBus {
    /// Create a bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self { sender }
    }

    /// Receive every action published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<HostAction> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus for BroadcastBus {
    fn publish(&self, action: HostAction) {
        let name = action.action.clone();
        match self.sender.send(action) {
            Ok(receivers) => debug!(action = %name, receivers, "Host action published"),
            Err(_) => debug!(action = %name, "Host action published with no subscribers"),
        }
    }
}

// =============================================================================
// HTTP callback bus
// =============================================================================

/// Errors delivering an action to the host callback.
#[derive(Debug, Error)]
pub enum BusError {
    /// HTTP request failed.
    #[error("Host callback request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Host answered with a non-success status.
    #[error("Host callback returned HTTP {0}")]
    Status(u16),
}

/// Bus that POSTs each action as JSON to the host.
#[derive(Debug, Clone)]
pub struct HttpHostBus {
    client: Client,
    url: Url,
}

impl HttpHostBus {
    /// Create a bus targeting `url`.
    #[must_use]
    pub const fn new(client: Client, url: Url) -> Self {
        Self { client, url }
    }

    /// Deliver one action and wait for the host to accept it.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the host answers non-2xx.
    #[instrument(skip(self, action), fields(action = %action.action))]
    pub async fn deliver(&self, action: &HostAction) -> Result<(), BusError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(action)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BusError::Status(status.as_u16()));
        }

        debug!("Host action delivered");
        Ok(())
    }
}

impl EventBus for HttpHostBus {
    fn publish(&self, action: HostAction) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(action = %action.action, "No async runtime; host action dropped");
            return;
        };

        let bus = self.clone();
        runtime.spawn(async move {
            if let Err(e) = bus.deliver(&action).await {
                warn!(action = %action.action, error = %e, "Failed to deliver host action");
            }
        });
    }
}
