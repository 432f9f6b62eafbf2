//! Outbound lifecycle notifications.
//!
//! Each hook follows the same path: routing gate, destination lookup,
//! composition, then a single `chat.postMessage`. Every failure is folded
//! into the returned [`DeliveryOutcome`].

use std::sync::Arc;

use escalated_slack_core::{
    Agent, ChannelId, LifecycleEvent, Reply, Settings, Ticket,
};
use reqwest::Client;
use secrecy::SecretString;
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use crate::settings::{SettingsStore, load_settings};
use crate::slack::{Notification, SlackApiConfig, SlackClient, SlackError};

/// Why a notification was not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Event routing has the event switched off.
    EventDisabled,
    /// No mapping matched and there is no default channel.
    NoChannel,
    /// The assignee has no linked Slack member.
    NoSlackUser,
    /// The ticket has no Slack thread to reply under.
    NoThread,
}

impl SkipReason {
    /// Stable identifier used in logs and responses.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EventDisabled => "event_disabled",
            Self::NoChannel => "no_channel",
            Self::NoSlackUser => "no_slack_user",
            Self::NoThread => "no_thread",
        }
    }
}

/// Result of handling one lifecycle hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    /// Slack accepted the message.
    Sent {
        channel: Option<String>,
        ts: Option<String>,
    },
    /// Nothing was sent.
    Skipped { reason: SkipReason },
    /// Delivery was attempted and failed.
    Failed { error: String },
}

impl DeliveryOutcome {
    /// Whether a message reached Slack.
    #[must_use]
    pub const fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }
}

/// Turns host lifecycle hooks into Slack messages.
#[derive(Clone)]
pub struct NotificationService {
    settings: Arc<dyn SettingsStore>,
    http: Client,
    api: SlackApiConfig,
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService")
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub fn new(settings: Arc<dyn SettingsStore>, http: Client, api: SlackApiConfig) -> Self {
        Self {
            settings,
            http,
            api,
        }
    }

    /// `ticket.created`: announce in the resolved channel.
    #[instrument(skip(self, ticket), fields(ticket_id = %ticket.id))]
    pub async fn ticket_created(&self, ticket: &Ticket) -> DeliveryOutcome {
        let settings = load_settings(Arc::clone(&self.settings)).await;
        if let Some(skip) = gate(&settings, LifecycleEvent::TicketCreated) {
            return skip;
        }

        let Some(channel) = resolve(&settings, ticket) else {
            return skipped(LifecycleEvent::TicketCreated, SkipReason::NoChannel);
        };

        self.deliver(&settings, &Notification::ticket_created(ticket, channel))
            .await
    }

    /// `ticket.assigned`: direct-message the assignee.
    #[instrument(skip(self, ticket, agent), fields(ticket_id = %ticket.id))]
    pub async fn ticket_assigned(&self, ticket: &Ticket, agent: Option<&Agent>) -> DeliveryOutcome {
        let settings = load_settings(Arc::clone(&self.settings)).await;
        if let Some(skip) = gate(&settings, LifecycleEvent::TicketAssigned) {
            return skip;
        }

        let Some(user) = agent.and_then(Agent::slack_user) else {
            return skipped(LifecycleEvent::TicketAssigned, SkipReason::NoSlackUser);
        };

        self.deliver(&settings, &Notification::ticket_assigned(ticket, user))
            .await
    }

    /// `reply.created`: mirror the reply into the ticket's Slack thread.
    #[instrument(skip(self, reply, ticket), fields(ticket_id = %ticket.id))]
    pub async fn reply_created(&self, reply: &Reply, ticket: &Ticket) -> DeliveryOutcome {
        let settings = load_settings(Arc::clone(&self.settings)).await;
        if let Some(skip) = gate(&settings, LifecycleEvent::ReplyCreated) {
            return skip;
        }

        let Some(channel) = resolve(&settings, ticket) else {
            return skipped(LifecycleEvent::ReplyCreated, SkipReason::NoChannel);
        };
        let Some(thread_ts) = ticket.thread_ts() else {
            return skipped(LifecycleEvent::ReplyCreated, SkipReason::NoThread);
        };

        self.deliver(
            &settings,
            &Notification::reply_created(reply, ticket, channel, thread_ts),
        )
        .await
    }

    /// `ticket.resolved`: announce in the resolved channel.
    #[instrument(skip(self, ticket), fields(ticket_id = %ticket.id))]
    pub async fn ticket_resolved(&self, ticket: &Ticket) -> DeliveryOutcome {
        let settings = load_settings(Arc::clone(&self.settings)).await;
        if let Some(skip) = gate(&settings, LifecycleEvent::TicketResolved) {
            return skip;
        }

        let Some(channel) = resolve(&settings, ticket) else {
            return skipped(LifecycleEvent::TicketResolved, SkipReason::NoChannel);
        };

        self.deliver(&settings, &Notification::ticket_resolved(ticket, channel))
            .await
    }

    async fn deliver(&self, settings: &Settings, notification: &Notification) -> DeliveryOutcome {
        let client = SlackClient::new(
            self.http.clone(),
            SecretString::from(settings.bot_token.clone()),
            self.api.clone(),
        );

        match client.post_message(&notification.to_message()).await {
            Ok(response) => {
                info!(event = %notification.kind(), channel = ?response.channel, "Slack notification sent");
                DeliveryOutcome::Sent {
                    channel: response.channel,
                    ts: response.ts,
                }
            }
            Err(e) => {
                match &e {
                    SlackError::NotConfigured => {
                        debug!(event = %notification.kind(), "Slack bot token not configured");
                    }
                    SlackError::Request(_) | SlackError::Timeout => {
                        error!(event = %notification.kind(), error = %e, "Slack notification failed");
                    }
                    _ => {
                        warn!(event = %notification.kind(), error = %e, "Slack notification rejected");
                    }
                }
                DeliveryOutcome::Failed {
                    error: e.code().to_string(),
                }
            }
        }
    }
}

fn gate(settings: &Settings, event: LifecycleEvent) -> Option<DeliveryOutcome> {
    if settings.is_event_enabled(event.as_str()) {
        None
    } else {
        Some(skipped(event, SkipReason::EventDisabled))
    }
}

fn resolve(settings: &Settings, ticket: &Ticket) -> Option<ChannelId> {
    ChannelId::new(settings.resolve_channel(ticket))
}

fn skipped(event: LifecycleEvent, reason: SkipReason) -> DeliveryOutcome {
    debug!(%event, reason = reason.as_str(), "Slack notification skipped");
    DeliveryOutcome::Skipped { reason }
}
