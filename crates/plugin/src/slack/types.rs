//! Slack wire types.
//!
//! Outbound: a `chat.postMessage` body with a subset of Block Kit.
//! Inbound: the Events API envelope, classified by its `type` field.
//!
//! See: <https://api.slack.com/block-kit> and
//! <https://api.slack.com/apis/events-api>

use serde::{Deserialize, Serialize};

/// A `chat.postMessage` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlackMessage {
    /// Channel, channel ID, or member ID (direct message) to post to.
    pub channel: String,
    /// Plain text body, also the notification fallback.
    pub text: String,
    /// Message blocks.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Block>,
    /// Root message to reply under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
}

/// Block Kit block types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// Section block with text.
    Section { text: Text },
}

impl Block {
    /// A section holding markdown text.
    #[must_use]
    pub fn mrkdwn_section(text: impl Into<String>) -> Self {
        Self::Section {
            text: Text::mrkdwn(text),
        }
    }
}

/// Text object types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Text {
    /// Markdown text (supports formatting).
    Mrkdwn { text: String },
}

impl Text {
    /// Create a markdown text object.
    #[must_use]
    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self::Mrkdwn { text: text.into() }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// Response from posting a message.
#[derive(Debug, Clone, Deserialize)]
pub struct PostMessageResponse {
    /// Whether the request was successful.
    pub ok: bool,
    /// Channel ID where message was posted.
    #[serde(default)]
    pub channel: Option<String>,
    /// Message timestamp (unique ID).
    #[serde(default)]
    pub ts: Option<String>,
    /// Error message if not ok.
    #[serde(default)]
    pub error: Option<String>,
}

// =============================================================================
// Events API
// =============================================================================

/// Classification of an inbound Events API request.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventEnvelope {
    /// Endpoint ownership handshake. The challenge is echoed as sent,
    /// whatever its JSON type.
    UrlVerification {
        #[serde(default)]
        challenge: serde_json::Value,
    },
    /// A subscribed workspace event.
    EventCallback {
        #[serde(default)]
        event: serde_json::Value,
    },
    /// Anything else, including a missing or non-string `type`.
    #[serde(other)]
    Unknown,
}

impl EventEnvelope {
    /// Classify a decoded request body. Never fails.
    #[must_use]
    pub fn classify(payload: &serde_json::Value) -> Self {
        Self::deserialize(payload).unwrap_or(Self::Unknown)
    }
}
