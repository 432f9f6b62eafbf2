//! Slack request signature verification.
//!
//! This implements Slack's signing-secret scheme:
//! <https://api.slack.com/authentication/verifying-requests-from-slack>
//!
//! The caller supplies the current time, so verification is deterministic.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

use super::error::SlackError;

/// Maximum distance, in seconds, between the request timestamp and now.
pub const REPLAY_WINDOW_SECS: u64 = 300;

/// Header carrying the `v0=` signature.
pub const SIGNATURE_HEADER: &str = "x-slack-signature";

/// Header carrying the Unix timestamp the signature covers.
pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";

type HmacSha256 = Hmac<Sha256>;

/// Verify a Slack webhook signature.
///
/// # Arguments
///
/// * `signing_secret` - The app's signing secret
/// * `signature` - The `X-Slack-Signature` header value
/// * `timestamp` - The `X-Slack-Request-Timestamp` header value
/// * `body` - The raw request body
/// * `now` - Current Unix time in seconds
///
/// Returns `false` for a stale or malformed timestamp, regardless of the
/// signature, and for any signature mismatch. Never panics.
#[must_use]
pub fn verify_signature(
    signing_secret: &str,
    signature: &str,
    timestamp: &str,
    body: &str,
    now: i64,
) -> bool {
    let Ok(ts) = timestamp.parse::<i64>() else {
        debug!("Slack timestamp is not an integer");
        return false;
    };

    if now.abs_diff(ts) > REPLAY_WINDOW_SECS {
        debug!(timestamp = ts, now, "Slack timestamp outside replay window");
        return false;
    }

    let Ok(expected) = compute_signature(signing_secret, timestamp, body) else {
        return false;
    };

    constant_time_compare(&expected, signature)
}

/// Compute the `v0=` signature Slack would send for a request.
///
/// # Errors
///
/// Returns error if the HMAC cannot be keyed with the secret.
pub fn compute_signature(
    signing_secret: &str,
    timestamp: &str,
    body: &str,
) -> Result<String, SlackError> {
    let sig_basestring = format!("v0:{timestamp}:{body}");

    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .map_err(|e| SlackError::InvalidSignature(e.to_string()))?;

    mac.update(sig_basestring.as_bytes());

    Ok(format!("v0={}", hex::encode(mac.finalize().into_bytes())))
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "8f742231b10e8888abcd99yyyzzz85a5";
    const NOW: i64 = 1_531_420_618;

    fn sign(secret: &str, timestamp: i64, body: &str) -> String {
        compute_signature(secret, &timestamp.to_string(), body).expect("signature")
    }

    #[test]
    fn test_constant_time_compare_equal() {
        assert!(constant_time_compare("hello", "hello"));
        assert!(constant_time_compare("", ""));
    }

    #[test]
    fn test_constant_time_compare_not_equal() {
        assert!(!constant_time_compare("hello", "world"));
        assert!(!constant_time_compare("hello", "hell"));
        assert!(!constant_time_compare("hello", "helloo"));
    }

    #[test]
    fn test_signature_format() {
        let signature = sign(SECRET, NOW, "body");
        let hex_part = signature.strip_prefix("v0=").expect("v0 prefix");
        assert_eq!(hex_part.len(), 64);
        assert!(
            hex_part
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }

    #[test]
    fn test_signature_verification_valid() {
        let body = r#"{"type":"event_callback","event":{"type":"message"}}"#;
        let signature = sign(SECRET, NOW, body);

        assert!(verify_signature(
            SECRET,
            &signature,
            &NOW.to_string(),
            body,
            NOW
        ));
    }

    #[test]
    fn test_signature_verification_wrong_secret() {
        let body = "payload";
        let signature = sign("another-secret", NOW, body);

        assert!(!verify_signature(
            SECRET,
            &signature,
            &NOW.to_string(),
            body,
            NOW
        ));
    }

    #[test]
    fn test_signature_verification_tampered_body() {
        let signature = sign(SECRET, NOW, "original=body");

        assert!(!verify_signature(
            SECRET,
            &signature,
            &NOW.to_string(),
            "tampered=body",
            NOW
        ));
    }

    #[test]
    fn test_signature_verification_uppercase_hex_rejected() {
        let signature = sign(SECRET, NOW, "body").to_uppercase().replace("V0=", "v0=");

        assert!(!verify_signature(
            SECRET,
            &signature,
            &NOW.to_string(),
            "body",
            NOW
        ));
    }

    #[test]
    fn test_window_edges() {
        let body = "body";

        let at_edge = NOW - 300;
        assert!(verify_signature(
            SECRET,
            &sign(SECRET, at_edge, body),
            &at_edge.to_string(),
            body,
            NOW
        ));

        let past_edge = NOW - 301;
        assert!(!verify_signature(
            SECRET,
            &sign(SECRET, past_edge, body),
            &past_edge.to_string(),
            body,
            NOW
        ));

        let future = NOW + 301;
        assert!(!verify_signature(
            SECRET,
            &sign(SECRET, future, body),
            &future.to_string(),
            body,
            NOW
        ));
    }

    #[test]
    fn test_signature_verification_invalid_timestamp() {
        assert!(!verify_signature(SECRET, "v0=sig", "not-a-number", "body", NOW));
        assert!(!verify_signature(SECRET, "v0=sig", "", "body", NOW));
    }

    #[test]
    fn test_extreme_timestamps_do_not_overflow() {
        assert!(!verify_signature(
            SECRET,
            "v0=sig",
            &i64::MIN.to_string(),
            "body",
            i64::MAX
        ));
    }
}
