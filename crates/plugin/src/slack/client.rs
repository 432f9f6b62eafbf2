//! Slack Web API client.
//!
//! Every call is a single authenticated POST bounded by the client timeout.
//! Failures are returned (or rendered as `{ok: false, error}`) and logged;
//! nothing is retried.

use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, error, instrument, warn};

use super::error::SlackError;
use super::types::{PostMessageResponse, SlackMessage};

/// Slack Web API base URL.
pub const SLACK_API_BASE: &str = "https://slack.com/api";

/// Default bound on a single Web API call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Where and how long to talk to the Web API.
#[derive(Debug, Clone)]
pub struct SlackApiConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for SlackApiConfig {
    fn default() -> Self {
        Self {
            base_url: SLACK_API_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Slack API client bound to one bot token.
#[derive(Clone)]
pub struct SlackClient {
    /// HTTP client.
    client: Client,
    /// Bot token for authentication (may be empty).
    bot_token: SecretString,
    /// Endpoint and timeout.
    api: SlackApiConfig,
}

impl std::fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackClient")
            .field("bot_token", &"[REDACTED]")
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}

impl SlackClient {
    /// Create a new Slack client.
    #[must_use]
    pub const fn new(client: Client, bot_token: SecretString, api: SlackApiConfig) -> Self {
        Self {
            client,
            bot_token,
            api,
        }
    }

    /// Call a Web API method and return Slack's JSON verbatim.
    ///
    /// A response with `ok: false` is still returned as `Ok`; it is logged as
    /// a warning.
    ///
    /// # Errors
    ///
    /// Returns error if no bot token is configured (no request is made), the
    /// request fails or times out, or the body is not a JSON object.
    #[instrument(skip(self, payload))]
    pub async fn call<P>(&self, method: &str, payload: &P) -> Result<Value, SlackError>
    where
        P: Serialize + ?Sized,
    {
        let token = self.bot_token.expose_secret();
        if token.is_empty() {
            return Err(SlackError::NotConfigured);
        }

        let response = self
            .client
            .post(format!("{}/{method}", self.api.base_url))
            .bearer_auth(token)
            .timeout(self.api.timeout)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let data: Value = match response.json().await {
            Ok(data @ Value::Object(_)) => data,
            Ok(_) | Err(_) => {
                warn!(method, status = status.as_u16(), "Slack API: invalid response");
                return Err(SlackError::InvalidResponse);
            }
        };

        if data.get("ok").and_then(Value::as_bool) != Some(true) {
            let code = data.get("error").and_then(Value::as_str).unwrap_or("unknown");
            warn!(method, error = code, "Slack API error");
        }

        Ok(data)
    }

    /// Call a Web API method, folding every failure into `{ok: false, error}`.
    pub async fn request<P>(&self, method: &str, payload: &P) -> Value
    where
        P: Serialize + ?Sized,
    {
        match self.call(method, payload).await {
            Ok(data) => data,
            Err(e) => {
                match &e {
                    SlackError::NotConfigured => debug!(method, "Slack bot token not configured"),
                    SlackError::Request(_) | SlackError::Timeout => {
                        error!(method, error = %e, "Slack API request failed");
                    }
                    _ => {}
                }
                json!({ "ok": false, "error": e.code() })
            }
        }
    }

    /// Post a message with `chat.postMessage`.
    ///
    /// # Errors
    ///
    /// Returns error if the call fails or Slack returns `ok: false`.
    #[instrument(skip(self, message), fields(channel = %message.channel))]
    pub async fn post_message(
        &self,
        message: &SlackMessage,
    ) -> Result<PostMessageResponse, SlackError> {
        let data = self.call("chat.postMessage", message).await?;

        let result: PostMessageResponse =
            serde_json::from_value(data).map_err(|_| SlackError::InvalidResponse)?;

        if !result.ok {
            return Err(SlackError::Api(
                result.error.unwrap_or_else(|| "unknown".to_string()),
            ));
        }

        debug!(
            ts = ?result.ts,
            channel = ?result.channel,
            "Message posted to Slack"
        );

        Ok(result)
    }
}
