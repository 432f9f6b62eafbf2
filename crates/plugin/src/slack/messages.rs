//! Slack message builders for ticket lifecycle notifications.
//!
//! Each [`Notification`] variant carries exactly the fields its message needs,
//! so a destination or thread that is required can't be missing once one is
//! constructed. Composition never fails and performs no I/O.

use escalated_slack_core::{ChannelId, LifecycleEvent, Reply, SlackUserId, ThreadTs, Ticket, TicketId};

use super::types::{Block, SlackMessage};

/// A composed outbound notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Posted to the resolved channel.
    TicketCreated {
        channel: ChannelId,
        ticket_id: TicketId,
        subject: String,
    },
    /// Sent as a direct message to the assignee.
    TicketAssigned {
        user: SlackUserId,
        ticket_id: TicketId,
        subject: String,
    },
    /// Threaded under the ticket's Slack message.
    ReplyCreated {
        channel: ChannelId,
        thread_ts: ThreadTs,
        ticket_id: TicketId,
        author: String,
        body: String,
    },
    /// Posted to the resolved channel, threaded when the ticket has a thread.
    TicketResolved {
        channel: ChannelId,
        thread_ts: Option<ThreadTs>,
        ticket_id: TicketId,
        subject: String,
    },
}

impl Notification {
    /// New-ticket announcement.
    #[must_use]
    pub fn ticket_created(ticket: &Ticket, channel: ChannelId) -> Self {
        Self::TicketCreated {
            channel,
            ticket_id: ticket.id.clone(),
            subject: ticket.subject_or_default().to_string(),
        }
    }

    /// Assignment direct message.
    #[must_use]
    pub fn ticket_assigned(ticket: &Ticket, user: SlackUserId) -> Self {
        Self::TicketAssigned {
            user,
            ticket_id: ticket.id.clone(),
            subject: ticket.subject_or_default().to_string(),
        }
    }

    /// Threaded reply mirror.
    #[must_use]
    pub fn reply_created(
        reply: &Reply,
        ticket: &Ticket,
        channel: ChannelId,
        thread_ts: ThreadTs,
    ) -> Self {
        Self::ReplyCreated {
            channel,
            thread_ts,
            ticket_id: ticket.id.clone(),
            author: reply.author_or_default().to_string(),
            body: reply.body_or_default().to_string(),
        }
    }

    /// Resolution announcement.
    #[must_use]
    pub fn ticket_resolved(ticket: &Ticket, channel: ChannelId) -> Self {
        Self::TicketResolved {
            channel,
            thread_ts: ticket.thread_ts(),
            ticket_id: ticket.id.clone(),
            subject: ticket.subject_or_default().to_string(),
        }
    }

    /// Lifecycle event this notification reports.
    #[must_use]
    pub const fn kind(&self) -> LifecycleEvent {
        match self {
            Self::TicketCreated { .. } => LifecycleEvent::TicketCreated,
            Self::TicketAssigned { .. } => LifecycleEvent::TicketAssigned,
            Self::ReplyCreated { .. } => LifecycleEvent::ReplyCreated,
            Self::TicketResolved { .. } => LifecycleEvent::TicketResolved,
        }
    }

    /// Channel or member ID the message is posted to.
    #[must_use]
    pub fn destination(&self) -> &str {
        match self {
            Self::TicketCreated { channel, .. }
            | Self::ReplyCreated { channel, .. }
            | Self::TicketResolved { channel, .. } => channel.as_str(),
            Self::TicketAssigned { user, .. } => user.as_str(),
        }
    }

    /// Plain text body.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::TicketCreated {
                ticket_id, subject, ..
            } => format!("New ticket created: #{ticket_id} - {subject}"),
            Self::TicketAssigned {
                ticket_id, subject, ..
            } => format!("You have been assigned ticket #{ticket_id}: {subject}"),
            Self::ReplyCreated {
                ticket_id,
                author,
                body,
                ..
            } => format!("Reply from {author} on ticket #{ticket_id}: {body}"),
            Self::TicketResolved {
                ticket_id, subject, ..
            } => format!("Ticket resolved: #{ticket_id} - {subject}"),
        }
    }

    /// Block Kit rendering. Replies are plain text only.
    #[must_use]
    pub fn blocks(&self) -> Vec<Block> {
        match self {
            Self::TicketCreated {
                ticket_id, subject, ..
            } => vec![Block::mrkdwn_section(format!(
                "*New Ticket* #{ticket_id}\n*Subject:* {subject}"
            ))],
            Self::TicketAssigned {
                ticket_id, subject, ..
            } => vec![Block::mrkdwn_section(format!(
                "*Ticket Assigned to You*\n*#{ticket_id}:* {subject}"
            ))],
            Self::ReplyCreated { .. } => Vec::new(),
            Self::TicketResolved {
                ticket_id, subject, ..
            } => vec![Block::mrkdwn_section(format!(
                "*Ticket Resolved* #{ticket_id}\n*Subject:* {subject}"
            ))],
        }
    }

    /// Thread the message is posted under, if any.
    #[must_use]
    pub const fn thread_ts(&self) -> Option<&ThreadTs> {
        match self {
            Self::ReplyCreated { thread_ts, .. } => Some(thread_ts),
            Self::TicketResolved { thread_ts, .. } => thread_ts.as_ref(),
            Self::TicketCreated { .. } | Self::TicketAssigned { .. } => None,
        }
    }

    /// The `chat.postMessage` body.
    #[must_use]
    pub fn to_message(&self) -> SlackMessage {
        SlackMessage {
            channel: self.destination().to_string(),
            text: self.text(),
            blocks: self.blocks(),
            thread_ts: self.thread_ts().map(|ts| ts.as_str().to_string()),
        }
    }
}
