//! Slack destination references.
//!
//! Each reference is guaranteed non-empty: constructing one from an empty
//! string yields `None`, which is how a missing channel, an unlinked agent or
//! an unthreaded ticket is detected before a message is composed.

use serde::{Deserialize, Serialize};

macro_rules! define_slack_ref {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a non-empty value; returns `None` for an empty string.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let value = value.into();
                (!value.is_empty()).then_some(Self(value))
            }

            /// Borrow the raw value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

define_slack_ref!(
    /// A Slack channel name or ID (`#support`, `C0123456`).
    ChannelId
);

define_slack_ref!(
    /// A Slack member ID; posting to it opens a direct message.
    SlackUserId
);

define_slack_ref!(
    /// Timestamp of the root message of a Slack thread.
    ThreadTs
);
