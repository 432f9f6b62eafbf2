//! Slack-related errors.

use thiserror::Error;

/// Errors that can occur when interacting with Slack.
#[derive(Debug, Error)]
pub enum SlackError {
    /// No bot token is configured; no request was attempted.
    #[error("Slack bot token is not configured")]
    NotConfigured,

    /// HTTP request failed before a response arrived.
    #[error("Slack request failed: {0}")]
    Request(String),

    /// The request exceeded the client timeout.
    #[error("Slack request timed out")]
    Timeout,

    /// Response body was not a JSON object.
    #[error("Slack returned an unparseable response")]
    InvalidResponse,

    /// Slack API returned `ok: false`.
    #[error("Slack API error: {0}")]
    Api(String),

    /// Signature could not be computed.
    #[error("Invalid Slack signature: {0}")]
    InvalidSignature(String),
}

impl SlackError {
    /// Machine-readable code used in `{ok: false, error}` results.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::NotConfigured => "bot_token_not_configured",
            Self::Request(_) => "request_failed",
            Self::Timeout => "timeout",
            Self::InvalidResponse => "invalid_response",
            Self::Api(code) => code,
            Self::InvalidSignature(_) => "invalid_signature",
        }
    }
}

impl From<reqwest::Error> for SlackError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Request(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SlackError::NotConfigured.code(), "bot_token_not_configured");
        assert_eq!(SlackError::InvalidResponse.code(), "invalid_response");
        assert_eq!(SlackError::Timeout.code(), "timeout");
        assert_eq!(
            SlackError::Request("connection refused".into()).code(),
            "request_failed"
        );
        assert_eq!(
            SlackError::Api("channel_not_found".into()).code(),
            "channel_not_found"
        );
    }
}
