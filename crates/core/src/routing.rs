//! Destination and routing rules for outbound notifications.
//!
//! Both functions are pure and total: a ticket that matches nothing resolves
//! to the default channel, and an event missing from the routing table is
//! simply disabled.

use crate::types::{ChannelMapping, EventRouting, Ticket};

/// Pick the Slack channel for a ticket.
///
/// Rules are evaluated in stored order and the first match wins. A rule with
/// an empty `slack_channel` is skipped even when its source matches. Ids are
/// compared by their string rendering, so a numeric team id on the ticket
/// matches a string `source_id` on the rule.
///
/// Returns `default_channel` when no rule matches; that may itself be empty.
#[must_use]
pub fn resolve_channel<'a>(
    ticket: &Ticket,
    mappings: &'a [ChannelMapping],
    default_channel: &'a str,
) -> &'a str {
    mappings
        .iter()
        .filter(|mapping| !mapping.slack_channel.is_empty())
        .find(|mapping| mapping.matches(ticket))
        .map_or(default_channel, |mapping| mapping.slack_channel.as_str())
}

/// Whether a lifecycle event is routed to Slack. Unknown names are disabled.
#[must_use]
pub fn is_event_enabled(event: &str, routing: &EventRouting) -> bool {
    routing.is_enabled(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CategoryId, SourceType, TeamId};

    fn ticket(team: Option<i64>, category: Option<&str>) -> Ticket {
        Ticket {
            team_id: team.map(TeamId::from),
            category_id: category.map(CategoryId::from),
            ..Ticket::default()
        }
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let mappings = vec![
            ChannelMapping::category("billing", "#billing"),
            ChannelMapping::team("7", "#team-seven"),
        ];

        let t = ticket(Some(7), Some("billing"));
        assert_eq!(resolve_channel(&t, &mappings, "#general"), "#billing");
    }

    #[test]
    fn test_numeric_team_matches_string_source() {
        let mappings = vec![ChannelMapping::team("7", "#team-seven")];

        let t = ticket(Some(7), None);
        assert_eq!(resolve_channel(&t, &mappings, "#general"), "#team-seven");
    }

    #[test]
    fn test_rule_with_empty_channel_is_skipped() {
        let mappings = vec![
            ChannelMapping::team("7", ""),
            ChannelMapping::team("7", "#fallback-team"),
        ];

        let t = ticket(Some(7), None);
        assert_eq!(resolve_channel(&t, &mappings, "#general"), "#fallback-team");
    }

    #[test]
    fn test_empty_channel_rule_never_returned() {
        let mappings = vec![ChannelMapping::team("7", "")];

        let t = ticket(Some(7), None);
        assert_eq!(resolve_channel(&t, &mappings, "#general"), "#general");
    }

    #[test]
    fn test_no_match_falls_back_to_default() {
        let mappings = vec![ChannelMapping::category("billing", "#billing")];

        let t = ticket(Some(1), Some("hardware"));
        assert_eq!(resolve_channel(&t, &mappings, "#general"), "#general");
        assert_eq!(resolve_channel(&t, &mappings, ""), "");
    }

    #[test]
    fn test_ticket_without_ids_matches_nothing() {
        let mappings = vec![
            ChannelMapping::team("", "#teamless"),
            ChannelMapping::category("", "#uncategorized"),
        ];

        let t = ticket(None, None);
        assert_eq!(resolve_channel(&t, &mappings, "#general"), "#general");
    }

    #[test]
    fn test_unknown_source_type_never_matches() {
        let mappings = vec![ChannelMapping {
            source_type: SourceType::Unknown,
            ..ChannelMapping::team("7", "#other")
        }];

        let t = ticket(Some(7), None);
        assert_eq!(resolve_channel(&t, &mappings, "#general"), "#general");
    }

    #[test]
    fn test_team_rule_does_not_match_category() {
        let mappings = vec![ChannelMapping::team("billing", "#team-billing")];

        let t = ticket(None, Some("billing"));
        assert_eq!(resolve_channel(&t, &mappings, ""), "");
    }

    #[test]
    fn test_empty_routing_disables_every_event() {
        let routing = EventRouting::empty();
        for name in ["ticket.created", "reply.created", "anything", ""] {
            assert!(!is_event_enabled(name, &routing));
        }
    }

    #[test]
    fn test_routing_lookup() {
        let mut routing = EventRouting::empty();
        routing.set("ticket.created", true);
        routing.set("reply.created", false);

        assert!(is_event_enabled("ticket.created", &routing));
        assert!(!is_event_enabled("reply.created", &routing));
        assert!(!is_event_enabled("ticket.assigned", &routing));
    }
}
