//! Host lifecycle events the integration listens to.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named occurrence in the host ticketing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleEvent {
    #[serde(rename = "ticket.created")]
    TicketCreated,
    #[serde(rename = "ticket.assigned")]
    TicketAssigned,
    #[serde(rename = "reply.created")]
    ReplyCreated,
    #[serde(rename = "ticket.resolved")]
    TicketResolved,
}

impl LifecycleEvent {
    /// Every event with a Slack notification.
    pub const ALL: [Self; 4] = [
        Self::TicketCreated,
        Self::TicketAssigned,
        Self::ReplyCreated,
        Self::TicketResolved,
    ];

    /// The host's name for this event, also its key in event routing.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TicketCreated => "ticket.created",
            Self::TicketAssigned => "ticket.assigned",
            Self::ReplyCreated => "reply.created",
            Self::TicketResolved => "ticket.resolved",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The event name is not one the integration handles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown lifecycle event: {0}")]
pub struct UnknownEventError(pub String);

impl FromStr for LifecycleEvent {
    type Err = UnknownEventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| UnknownEventError(s.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_event_name() {
        for event in LifecycleEvent::ALL {
            assert_eq!(event.as_str().parse::<LifecycleEvent>(), Ok(event));
        }
    }

    #[test]
    fn test_unknown_event_name() {
        let err = "sla.breached".parse::<LifecycleEvent>().unwrap_err();
        assert_eq!(err.to_string(), "unknown lifecycle event: sla.breached");
    }

    #[test]
    fn test_serde_uses_host_names() {
        let json = serde_json::to_string(&LifecycleEvent::ReplyCreated).expect("serialize");
        assert_eq!(json, "\"reply.created\"");
    }
}
