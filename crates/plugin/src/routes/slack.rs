//! Slack Events API webhook.
//!
//! Slack only needs a 200 to stop retrying; the outcome is reported in the
//! JSON body instead of the status code. Only a crashed handler task answers
//! with a 500.

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::post,
};
use serde_json::Value;
use tracing::instrument;

use crate::error::AppError;
use crate::services::WebhookResponse;
use crate::state::AppState;

/// Create Slack webhook routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/slack/events", post(handle_event))
}

/// Handle a Slack Events API request.
///
/// The body is taken raw so the signature is checked over the exact bytes
/// Slack signed. Handling reads the settings file, so it runs on the
/// blocking pool.
#[instrument(skip(state, headers, body))]
async fn handle_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResponse>, AppError> {
    let dispatcher = state.dispatcher().clone();
    let now = chrono::Utc::now().timestamp();

    let response = tokio::task::spawn_blocking(move || {
        let body = String::from_utf8_lossy(&body);
        // Unparseable bodies have no `type` and classify as unknown
        let payload: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
        dispatcher.handle(&payload, &body, &headers, now)
    })
    .await?;

    Ok(Json(response))
}
