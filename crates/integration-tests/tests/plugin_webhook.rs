//! Integration tests for the Slack Events API endpoint.
//!
//! Requests go through the full router (request ID, tracing) with a settings
//! file on disk, as they would in production.

use escalated_slack::slack::compute_signature;
use escalated_slack_core::Settings;
use escalated_slack_integration_tests::TestContext;
use serde_json::json;

const SIGNING_SECRET: &str = "8f742231b10e8888abcd99yyyzzz85a5";

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

fn signed(body: &str, timestamp: i64, secret: &str) -> Vec<(&'static str, String)> {
    let timestamp = timestamp.to_string();
    let signature = compute_signature(secret, &timestamp, body).expect("signature");
    vec![
        ("X-Slack-Request-Timestamp", timestamp),
        ("X-Slack-Signature", signature),
    ]
}

fn with_secret() -> Settings {
    Settings {
        signing_secret: SIGNING_SECRET.to_string(),
        ..Settings::default()
    }
}

// =============================================================================
// Handshake
// =============================================================================

#[tokio::test]
async fn test_url_verification_echoes_challenge() {
    let ctx = TestContext::new(&with_secret()).await;

    let (status, body) = ctx
        .post(
            "/slack/events",
            json!({ "type": "url_verification", "challenge": "3eZbrw1aBm2rZgRNFdxV2595E9CY3gmdALWMmHkvFXO7tYXAYM8P" }).to_string(),
            &[],
        )
        .await;

    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({ "challenge": "3eZbrw1aBm2rZgRNFdxV2595E9CY3gmdALWMmHkvFXO7tYXAYM8P" })
    );
}

#[tokio::test]
async fn test_url_verification_echoes_non_string_challenge() {
    let ctx = TestContext::new(&with_secret()).await;

    let (status, body) = ctx
        .post(
            "/slack/events",
            json!({ "type": "url_verification", "challenge": 12345 }).to_string(),
            &[],
        )
        .await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({ "challenge": 12345 }));
}

// =============================================================================
// Event callbacks
// =============================================================================

#[tokio::test]
async fn test_signed_event_is_reemitted() {
    let ctx = TestContext::new(&with_secret()).await;
    let mut rx = ctx.bus.subscribe();

    let body = json!({
        "type": "event_callback",
        "team_id": "T061EG9R6",
        "event": { "type": "reaction_added", "reaction": "thumbsup" }
    })
    .to_string();

    let (status, response) = ctx
        .post("/slack/events", body.clone(), &signed(&body, now(), SIGNING_SECRET))
        .await;

    assert_eq!(status, 200);
    assert_eq!(response, json!({ "ok": true, "event_type": "reaction_added" }));

    let action = rx.recv().await.expect("action");
    assert_eq!(action.action, "slack.event.reaction_added");
    assert_eq!(action.event["reaction"], "thumbsup");
    assert_eq!(action.payload["team_id"], "T061EG9R6");
}

#[tokio::test]
async fn test_forged_and_replayed_events_are_refused_with_200() {
    let ctx = TestContext::new(&with_secret()).await;
    let mut rx = ctx.bus.subscribe();
    let body = json!({ "type": "event_callback", "event": { "type": "message" } }).to_string();

    let forged = signed(&body, now(), "not-the-secret");
    let replayed = signed(&body, now() - 600, SIGNING_SECRET);

    for headers in [forged, replayed, Vec::new()] {
        let (status, response) = ctx.post("/slack/events", body.clone(), &headers).await;
        assert_eq!(status, 200);
        assert_eq!(response, json!({ "ok": false, "error": "invalid_signature" }));
    }

    assert!(rx.try_recv().is_err(), "nothing should be re-emitted");
}

#[tokio::test]
async fn test_unsigned_event_accepted_without_signing_secret() {
    let ctx = TestContext::new(&Settings::default()).await;
    let mut rx = ctx.bus.subscribe();

    let (status, response) = ctx
        .post(
            "/slack/events",
            json!({ "type": "event_callback", "event": { "type": "message" } }).to_string(),
            &[],
        )
        .await;

    assert_eq!(status, 200);
    assert_eq!(response, json!({ "ok": true, "event_type": "message" }));
    assert_eq!(rx.recv().await.expect("action").action, "slack.event.message");
}

#[tokio::test]
async fn test_signing_secret_is_read_per_request() {
    let ctx = TestContext::new(&Settings::default()).await;
    let body = json!({ "type": "event_callback", "event": { "type": "message" } }).to_string();

    let (_, before) = ctx.post("/slack/events", body.clone(), &[]).await;
    assert_eq!(before["ok"], true);

    ctx.store.save(&with_secret()).expect("save");

    let (_, after) = ctx.post("/slack/events", body, &[]).await;
    assert_eq!(after, json!({ "ok": false, "error": "invalid_signature" }));
}

// =============================================================================
// Unknown payloads
// =============================================================================

#[tokio::test]
async fn test_unknown_and_garbage_payloads() {
    let ctx = TestContext::new(&Settings::default()).await;

    for body in [
        json!({ "type": "app_rate_limited" }).to_string(),
        "not json at all".to_string(),
        String::new(),
    ] {
        let (status, response) = ctx.post("/slack/events", body, &[]).await;
        assert_eq!(status, 200);
        assert_eq!(response, json!({ "ok": false, "error": "unknown_type" }));
    }
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let ctx = TestContext::new(&Settings::default()).await;

    let response = ctx
        .send(
            axum::http::Request::post("/slack/events")
                .header("x-request-id", "req-42")
                .body(axum::body::Body::from("{}"))
                .expect("request"),
        )
        .await;

    assert_eq!(
        response.headers().get("x-request-id").expect("header"),
        "req-42"
    );
}
