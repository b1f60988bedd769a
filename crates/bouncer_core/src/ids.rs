//! Snowflake identifiers.

use serde::{Deserialize, Serialize};

macro_rules! snowflake {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Serialize,
            Deserialize,
            derive_more::Display,
            derive_more::From,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw snowflake.
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// The raw snowflake.
            pub const fn get(self) -> u64 {
                self.0
            }
        }
    };
}

snowflake! {
    /// A user or bot account.
    UserId
}

snowflake! {
    /// A guild (server).
    GuildId
}

snowflake! {
    /// A text, voice or thread channel.
    ChannelId
}

snowflake! {
    /// A guild role.
    RoleId
}

snowflake! {
    /// A channel category.
    CategoryId
}

/// Qualified name of a registered command, e.g. `admin ban`.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(transparent)]
pub struct CommandId(String);

impl CommandId {
    /// Create a command id from its qualified name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The qualified name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CommandId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for CommandId {
    fn from(name: String) -> Self {
        Self(name)
    }
}
