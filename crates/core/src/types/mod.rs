//! Core types for the Slack integration.
//!
//! This module provides type-safe wrappers for the host's entities and the
//! plugin's persisted settings.

mod de;
pub mod event;
pub mod id;
pub mod settings;
pub mod slack;
pub mod ticket;

pub use event::{LifecycleEvent, UnknownEventError};
pub use id::*;
pub use settings::{ChannelMapping, EventRouting, Settings, SourceType};
pub use slack::{ChannelId, SlackUserId, ThreadTs};
pub use ticket::{Agent, Reply, Ticket};
