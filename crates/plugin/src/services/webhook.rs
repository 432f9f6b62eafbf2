//! Inbound Slack Events API handling.
//!
//! Three outcomes, decided by the envelope's `type`:
//!
//! | `type`             | response                            |
//! |--------------------|-------------------------------------|
//! | `url_verification` | `{challenge}`                       |
//! | `event_callback`   | `{ok: true, event_type}` or         |
//! |                    | `{ok: false, error: "invalid_signature"}` |
//! | anything else      | `{ok: false, error: "unknown_type"}` |
//!
//! Accepted events are re-emitted on the host bus as `slack.event.<type>`.

use std::sync::Arc;

use axum::http::HeaderMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::bus::EventBus;
use crate::settings::SettingsStore;
use crate::slack::EventEnvelope;
use crate::slack::signature::{SIGNATURE_HEADER, TIMESTAMP_HEADER, verify_signature};

/// Prefix of re-emitted host action names.
pub const EVENT_ACTION_PREFIX: &str = "slack.event.";

/// Why a webhook was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookRejection {
    /// Signature or timestamp check failed.
    InvalidSignature,
    /// Envelope `type` is not handled.
    UnknownType,
}

impl WebhookRejection {
    /// Error code returned to Slack.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidSignature => "invalid_signature",
            Self::UnknownType => "unknown_type",
        }
    }
}

/// Body returned to Slack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookResponse {
    /// Handshake echo.
    Challenge(Value),
    /// Event accepted and re-emitted.
    Accepted { event_type: String },
    /// Request refused.
    Rejected(WebhookRejection),
}

impl Serialize for WebhookResponse {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Challenge(challenge) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("challenge", challenge)?;
                map.end()
            }
            Self::Accepted { event_type } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("ok", &true)?;
                map.serialize_entry("event_type", event_type)?;
                map.end()
            }
            Self::Rejected(rejection) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("ok", &false)?;
                map.serialize_entry("error", rejection.as_str())?;
                map.end()
            }
        }
    }
}

/// Classifies, authenticates and re-emits Slack webhooks.
#[derive(Clone)]
pub struct WebhookDispatcher {
    settings: Arc<dyn SettingsStore>,
    bus: Arc<dyn EventBus>,
}

impl std::fmt::Debug for WebhookDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookDispatcher").finish_non_exhaustive()
    }
}

impl WebhookDispatcher {
    /// Create a new dispatcher.
    #[must_use]
    pub fn new(settings: Arc<dyn SettingsStore>, bus: Arc<dyn EventBus>) -> Self {
        Self { settings, bus }
    }

    /// Handle one decoded webhook.
    ///
    /// `raw_body` must be the exact bytes Slack signed. `now` is the current
    /// Unix time in seconds. Each call is independent.
    #[instrument(skip_all)]
    pub fn handle(
        &self,
        payload: &Value,
        raw_body: &str,
        headers: &HeaderMap,
        now: i64,
    ) -> WebhookResponse {
        match EventEnvelope::classify(payload) {
            EventEnvelope::UrlVerification { challenge } => {
                debug!("Slack URL verification");
                if challenge.is_null() {
                    WebhookResponse::Challenge(Value::String(String::new()))
                } else {
                    WebhookResponse::Challenge(challenge)
                }
            }
            EventEnvelope::EventCallback { event } => {
                let signing_secret = self.settings.load().signing_secret;

                if !signing_secret.is_empty() && !raw_body.is_empty() {
                    let signature = header_str(headers, SIGNATURE_HEADER);
                    let timestamp = header_str(headers, TIMESTAMP_HEADER);

                    if !verify_signature(&signing_secret, signature, timestamp, raw_body, now) {
                        warn!("Slack webhook: invalid signature");
                        return WebhookResponse::Rejected(WebhookRejection::InvalidSignature);
                    }
                }

                let event_type = event_type(&event);
                self.bus
                    .dispatch(&format!("{EVENT_ACTION_PREFIX}{event_type}"), &event, payload);
                debug!(event_type = %event_type, "Slack event re-emitted");

                WebhookResponse::Accepted { event_type }
            }
            EventEnvelope::Unknown => {
                debug!("Slack webhook with unknown type");
                WebhookResponse::Rejected(WebhookRejection::UnknownType)
            }
        }
    }
}

/// Header value as text; missing or non-ASCII headers read as empty.
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

/// The inner event's `type`, rendered as text.
fn event_type(event: &Value) -> String {
    match event.get("type") {
        Some(Value::String(kind)) => kind.clone(),
        Some(kind @ (Value::Number(_) | Value::Bool(_))) => kind.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use escalated_slack_core::Settings;
    use serde_json::json;

    use crate::bus::BroadcastBus;
    use crate::settings::StaticSettings;
    use crate::slack::compute_signature;

    const SECRET: &str = "8f742231b10e8888abcd99yyyzzz85a5";
    const NOW: i64 = 1_700_000_000;

    fn dispatcher(signing_secret: &str) -> (WebhookDispatcher, BroadcastBus) {
        let bus = BroadcastBus::new();
        let settings = StaticSettings(Settings {
            signing_secret: signing_secret.to_string(),
            ..Settings::default()
        });
        (
            WebhookDispatcher::new(Arc::new(settings), Arc::new(bus.clone())),
            bus,
        )
    }

    fn signed_headers(body: &str, timestamp: i64, secret: &str) -> HeaderMap {
        let signature = compute_signature(secret, &timestamp.to_string(), body).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            "X-Slack-Signature",
            HeaderValue::from_str(&signature).unwrap(),
        );
        headers.insert(
            "X-Slack-Request-Timestamp",
            HeaderValue::from_str(&timestamp.to_string()).unwrap(),
        );
        headers
    }

    #[test]
    fn test_url_verification_echoes_challenge() {
        let (dispatcher, _) = dispatcher(SECRET);
        let payload = json!({ "type": "url_verification", "challenge": "abc" });

        let response = dispatcher.handle(&payload, "", &HeaderMap::new(), NOW);

        assert_eq!(response, WebhookResponse::Challenge(json!("abc")));
        assert_eq!(serde_json::to_value(&response).unwrap(), json!({ "challenge": "abc" }));
    }

    #[test]
    fn test_non_string_challenge_is_echoed_unchanged() {
        let (dispatcher, _) = dispatcher(SECRET);

        let numeric = json!({ "type": "url_verification", "challenge": 12345 });
        let response = dispatcher.handle(&numeric, "", &HeaderMap::new(), NOW);
        assert_eq!(serde_json::to_value(&response).unwrap(), json!({ "challenge": 12345 }));

        let missing = json!({ "type": "url_verification" });
        let response = dispatcher.handle(&missing, "", &HeaderMap::new(), NOW);
        assert_eq!(serde_json::to_value(&response).unwrap(), json!({ "challenge": "" }));
    }

    #[tokio::test]
    async fn test_event_without_secret_is_dispatched() {
        let (dispatcher, bus) = dispatcher("");
        let mut rx = bus.subscribe();
        let payload = json!({ "type": "event_callback", "event": { "type": "message", "text": "hi" } });

        let response = dispatcher.handle(&payload, &payload.to_string(), &HeaderMap::new(), NOW);

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "ok": true, "event_type": "message" })
        );

        let action = rx.recv().await.unwrap();
        assert_eq!(action.action, "slack.event.message");
        assert_eq!(action.event["text"], "hi");
        assert_eq!(action.payload, payload);
    }

    #[tokio::test]
    async fn test_signed_event_is_accepted() {
        let (dispatcher, bus) = dispatcher(SECRET);
        let mut rx = bus.subscribe();
        let body = r#"{"type":"event_callback","event":{"type":"app_mention"}}"#;
        let payload: Value = serde_json::from_str(body).unwrap();

        let response = dispatcher.handle(&payload, body, &signed_headers(body, NOW - 10, SECRET), NOW);

        assert_eq!(
            response,
            WebhookResponse::Accepted {
                event_type: "app_mention".to_string()
            }
        );
        assert_eq!(rx.recv().await.unwrap().action, "slack.event.app_mention");
    }

    #[test]
    fn test_bad_signature_is_rejected_without_dispatch() {
        let (dispatcher, bus) = dispatcher(SECRET);
        let mut rx = bus.subscribe();
        let body = r#"{"type":"event_callback","event":{"type":"message"}}"#;
        let payload: Value = serde_json::from_str(body).unwrap();

        let wrong_secret = dispatcher.handle(&payload, body, &signed_headers(body, NOW, "nope"), NOW);
        let stale = dispatcher.handle(&payload, body, &signed_headers(body, NOW - 301, SECRET), NOW);
        let unsigned = dispatcher.handle(&payload, body, &HeaderMap::new(), NOW);

        for response in [wrong_secret, stale, unsigned] {
            assert_eq!(
                serde_json::to_value(&response).unwrap(),
                json!({ "ok": false, "error": "invalid_signature" })
            );
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_empty_raw_body_skips_verification() {
        let (dispatcher, _) = dispatcher(SECRET);
        let payload = json!({ "type": "event_callback", "event": { "type": "message" } });

        let response = dispatcher.handle(&payload, "", &HeaderMap::new(), NOW);

        assert!(matches!(response, WebhookResponse::Accepted { .. }));
    }

    #[test]
    fn test_unknown_type() {
        let (dispatcher, _) = dispatcher("");

        for payload in [json!({ "type": "bogus" }), json!({}), json!([1, 2])] {
            let response = dispatcher.handle(&payload, "", &HeaderMap::new(), NOW);
            assert_eq!(
                serde_json::to_value(&response).unwrap(),
                json!({ "ok": false, "error": "unknown_type" })
            );
        }
    }

    #[test]
    fn test_event_type_rendering() {
        assert_eq!(event_type(&json!({ "type": "message" })), "message");
        assert_eq!(event_type(&json!({ "type": 7 })), "7");
        assert_eq!(event_type(&json!({})), "");
        assert_eq!(event_type(&Value::Null), "");
    }
}
