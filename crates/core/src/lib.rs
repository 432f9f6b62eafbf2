//! Escalated Slack Core - Shared types library.
//!
//! This crate provides the types and routing rules used by the Slack
//! integration:
//! - `plugin` - HTTP service that receives host lifecycle hooks and Slack webhooks
//! - `cli` - Command-line tools for settings and plugin lifecycle
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no settings persistence. Every function here takes its
//! configuration as an argument.
//!
//! # Modules
//!
//! - [`types`] - Loose ids, Slack references, host entities, settings, lifecycle events
//! - [`routing`] - Channel resolution and per-event routing checks

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod routing;
pub mod types;

pub use routing::{is_event_enabled, resolve_channel};
pub use types::*;
