//! Host lifecycle hooks and the notification-channel filter.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    routing::{get, post},
};
use escalated_slack_core::{Agent, LifecycleEvent, Reply, Ticket};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::error::AppError;
use crate::settings::load_settings;
use crate::services::{DeliveryOutcome, NotificationChannel};
use crate::state::AppState;

/// Create host hook routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/hooks/{event}", post(handle_hook))
        .route("/notification-channel", get(notification_channel))
}

/// Body of `ticket.created` and `ticket.resolved`.
#[derive(Debug, Deserialize)]
struct TicketHook {
    ticket: Ticket,
}

/// Body of `ticket.assigned`.
#[derive(Debug, Deserialize)]
struct AssignmentHook {
    ticket: Ticket,
    #[serde(default)]
    agent: Option<Agent>,
}

/// Body of `reply.created`.
#[derive(Debug, Deserialize)]
struct ReplyHook {
    reply: Reply,
    #[serde(default)]
    ticket: Option<Ticket>,
}

/// Handle one lifecycle hook from the host.
///
/// The notification runs on its own task so a failure in one hook can't
/// take down the connection handling others.
#[instrument(skip(state, body))]
async fn handle_hook(
    State(state): State<AppState>,
    Path(event): Path<String>,
    body: Bytes,
) -> Result<Json<DeliveryOutcome>, AppError> {
    let event: LifecycleEvent = event
        .parse()
        .map_err(|e: escalated_slack_core::UnknownEventError| AppError::NotFound(e.to_string()))?;

    let notifier = state.notifier().clone();

    let outcome = match event {
        LifecycleEvent::TicketCreated => {
            let hook: TicketHook = parse(&body)?;
            tokio::spawn(async move { notifier.ticket_created(&hook.ticket).await }).await?
        }
        LifecycleEvent::TicketAssigned => {
            let hook: AssignmentHook = parse(&body)?;
            tokio::spawn(async move {
                notifier
                    .ticket_assigned(&hook.ticket, hook.agent.as_ref())
                    .await
            })
            .await?
        }
        LifecycleEvent::ReplyCreated => {
            let hook: ReplyHook = parse(&body)?;
            tokio::spawn(async move {
                let ticket = hook.ticket.unwrap_or_default();
                notifier.reply_created(&hook.reply, &ticket).await
            })
            .await?
        }
        LifecycleEvent::TicketResolved => {
            let hook: TicketHook = parse(&body)?;
            tokio::spawn(async move { notifier.ticket_resolved(&hook.ticket).await }).await?
        }
    };

    Ok(Json(outcome))
}

/// Describe Slack as a host notification channel.
async fn notification_channel(State(state): State<AppState>) -> Json<NotificationChannel> {
    let settings = load_settings(Arc::clone(state.settings())).await;
    Json(NotificationChannel::slack(&settings))
}

fn parse<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(e.to_string()))
}
