//! Loose ids for host entity references.
//!
//! The host serializes ids inconsistently: a team id may arrive as `7` on a
//! ticket and as `"7"` in a stored channel mapping. Every id defined with
//! `define_id!` accepts either form and stores the canonical string, so ids
//! compare by their string rendering.

use serde::Deserialize;

/// Macro to define a loose, string-backed ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Deserialize` from a JSON string or number, `Serialize` as a string
/// - `Debug`, `Clone`, `Default`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`
/// - `Display`, `From<&str>`, `From<String>` and `From<i64>` implementations
///
/// # Example
///
/// ```rust
/// # use escalated_slack_core::define_id;
/// define_id!(QueueId);
///
/// let from_number: QueueId = serde_json::from_str("12").unwrap();
/// let from_string: QueueId = serde_json::from_str("\"12\"").unwrap();
/// assert_eq!(from_number, from_string);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, ::serde::Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from its string rendering.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the canonical string rendering.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id.to_string())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                <$crate::types::id::RawId as ::serde::Deserialize>::deserialize(deserializer)
                    .map(|raw| Self(raw.into_string()))
            }
        }
    };
}

/// Wire forms an id may take before normalization.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl RawId {
    /// Render the id the way the host stringifies it.
    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            Self::Str(s) => s,
            Self::Int(n) => n.to_string(),
            Self::UInt(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
        }
    }
}

define_id!(TicketId);
define_id!(TeamId);
define_id!(CategoryId);
define_id!(SourceId);
