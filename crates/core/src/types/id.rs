//! Newtype ids for Slack object references.
//!
//! Slack identifies users, channels, messages and modal triggers with opaque
//! strings. Use the `define_slack_id!` macro to wrap each kind so that a
//! channel id can never be passed where a user id is expected.

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe Slack id wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use approval_bot_core::define_slack_id;
/// define_slack_id!(TeamId);
/// define_slack_id!(AppId);
///
/// let team = TeamId::new("T123");
/// let app = AppId::new("T123");
///
/// // These are different types, so this won't compile:
/// // let _: TeamId = app;
/// assert_eq!(team.as_str(), app.as_str());
/// ```
#[macro_export]
macro_rules! define_slack_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new id from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw Slack id.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the raw Slack id.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_slack_id!(UserId);
define_slack_id!(ChannelId);
define_slack_id!(TriggerId);

impl UserId {
    /// Render the user as a Slack mention (`<@U123>`).
    #[must_use]
    pub fn mention(&self) -> String {
        format!("<@{}>", self.0)
    }
}

impl ChannelId {
    /// Address a direct message to a user.
    ///
    /// `chat.postMessage` accepts a user id as the channel and delivers to
    /// the bot's DM with that user.
    #[must_use]
    pub fn direct(user: &UserId) -> Self {
        Self(user.as_str().to_owned())
    }
}

/// Message timestamp, Slack's unique id for a message within a channel.
///
/// Kept separate from the macro ids because it is always paired with a
/// channel: `(channel, ts)` addresses exactly one message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageTs(String);

impl MessageTs {
    /// Create a message timestamp.
    #[must_use]
    pub fn new(ts: impl Into<String>) -> Self {
        Self(ts.into())
    }

    /// Borrow the raw timestamp.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MessageTs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
