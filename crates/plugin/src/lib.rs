//! Escalated Slack integration library.
//!
//! This crate provides the plugin service as a library, allowing it to be
//! tested and embedded.
//!
//! # Directions
//!
//! - Outbound: a host lifecycle hook (`ticket.created`, `ticket.assigned`,
//!   `reply.created`, `ticket.resolved`) is gated by event routing, resolved to
//!   a Slack destination, composed into a message and posted with the bot token.
//! - Inbound: Slack Events API webhooks are signature-checked and re-emitted on
//!   the host event bus as `slack.event.<type>`.
//!
//! # Security
//!
//! The service holds the workspace bot token and signing secret. Bind it to a
//! private interface and expose only `/slack/events` to Slack.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod bus;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod settings;
pub mod slack;
pub mod state;
