//! Read-only views of the host's helpdesk entities.
//!
//! The host delivers these with each lifecycle hook. Fields the integration
//! does not use are ignored; every field it does use is optional on the wire.

use serde::{Deserialize, Serialize};

use super::de::null_as_default;
use super::id::{CategoryId, TeamId, TicketId};
use super::slack::{SlackUserId, ThreadTs};

/// Subject shown for tickets created without one.
pub const DEFAULT_SUBJECT: &str = "No subject";

/// Author shown for replies without an author name.
pub const DEFAULT_AUTHOR: &str = "Agent";

/// A helpdesk ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Ticket ID (empty when the host omits it).
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: TicketId,
    /// Ticket subject line.
    #[serde(default)]
    pub subject: Option<String>,
    /// Owning team.
    #[serde(default)]
    pub team_id: Option<TeamId>,
    /// Ticket category.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Root message of the linked Slack thread, once one exists.
    #[serde(default)]
    pub slack_thread_ts: Option<String>,
}

impl Ticket {
    /// The subject, or [`DEFAULT_SUBJECT`] when absent.
    #[must_use]
    pub fn subject_or_default(&self) -> &str {
        self.subject.as_deref().unwrap_or(DEFAULT_SUBJECT)
    }

    /// The linked Slack thread, if the ticket has a non-empty one.
    #[must_use]
    pub fn thread_ts(&self) -> Option<ThreadTs> {
        self.slack_thread_ts.clone().and_then(ThreadTs::new)
    }
}

/// A helpdesk agent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    /// Linked Slack member ID. Required for direct-message delivery.
    #[serde(default)]
    pub slack_user_id: Option<String>,
}

impl Agent {
    /// The linked Slack member, if any.
    #[must_use]
    pub fn slack_user(&self) -> Option<SlackUserId> {
        self.slack_user_id.clone().and_then(SlackUserId::new)
    }
}

/// A reply posted on a ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl Reply {
    /// The author name, or [`DEFAULT_AUTHOR`] when absent.
    #[must_use]
    pub fn author_or_default(&self) -> &str {
        self.author_name.as_deref().unwrap_or(DEFAULT_AUTHOR)
    }

    /// The reply body, empty when absent.
    #[must_use]
    pub fn body_or_default(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ticket_from_host_payload() {
        let ticket: Ticket = serde_json::from_value(json!({
            "id": 42,
            "subject": "Printer down",
            "team_id": 3,
            "category_id": "billing",
            "status": "open"
        }))
        .expect("ticket");

        assert_eq!(ticket.id.as_str(), "42");
        assert_eq!(ticket.subject_or_default(), "Printer down");
        assert_eq!(ticket.team_id, Some(TeamId::from(3)));
        assert_eq!(ticket.category_id, Some(CategoryId::from("billing")));
        assert!(ticket.thread_ts().is_none());
    }

    #[test]
    fn test_ticket_defaults() {
        let ticket: Ticket = serde_json::from_value(json!({ "id": null })).expect("ticket");
        assert_eq!(ticket.id.as_str(), "");
        assert_eq!(ticket.subject_or_default(), DEFAULT_SUBJECT);
    }

    #[test]
    fn test_empty_thread_ts_is_not_a_thread() {
        let ticket = Ticket {
            slack_thread_ts: Some(String::new()),
            ..Ticket::default()
        };
        assert!(ticket.thread_ts().is_none());
    }

    #[test]
    fn test_agent_without_slack_user() {
        assert!(Agent::default().slack_user().is_none());

        let agent = Agent {
            slack_user_id: Some(String::new()),
        };
        assert!(agent.slack_user().is_none());
    }

    #[test]
    fn test_reply_defaults() {
        let reply = Reply::default();
        assert_eq!(reply.author_or_default(), DEFAULT_AUTHOR);
        assert_eq!(reply.body_or_default(), "");
    }
}
