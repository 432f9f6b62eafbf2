//! Slack integration.
//!
//! This module provides:
//! - [`SlackClient`] for authenticated Web API calls
//! - Block Kit and Events API wire types
//! - [`Notification`] builders for ticket lifecycle messages
//! - Webhook signature verification
//!
//! # Flow
//!
//! 1. A lifecycle hook is composed into a [`Notification`]
//! 2. The notification is posted with `chat.postMessage`
//! 3. Slack calls back on `/slack/events`; the signature is verified
//! 4. The inner event is re-emitted on the host event bus

mod client;
mod error;
mod messages;
pub mod signature;
mod types;

pub use client::{DEFAULT_TIMEOUT, SLACK_API_BASE, SlackApiConfig, SlackClient};
pub use error::SlackError;
pub use messages::Notification;
pub use signature::{compute_signature, verify_signature};
pub use types::{Block, EventEnvelope, PostMessageResponse, SlackMessage, Text};
