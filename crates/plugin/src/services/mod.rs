//! Business logic services for the plugin.
//!
//! # Services
//!
//! - `notifier` - Lifecycle hooks to Slack messages
//! - `webhook` - Slack Events API classification and re-emission
//! - `registration` - Activation, deactivation, notification channel

pub mod notifier;
pub mod registration;
pub mod webhook;

pub use notifier::{DeliveryOutcome, NotificationService, SkipReason};
pub use registration::{
    Activation, NotificationChannel, PLUGIN_VERSION, activate, deactivation_notice,
};
pub use webhook::{WebhookDispatcher, WebhookRejection, WebhookResponse};
