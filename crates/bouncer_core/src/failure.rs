//! Failure records: a kind plus the positional arguments explaining it.

use crate::{CategoryId, ChannelId, FailureKind, GuildId, Permission, RoleId, UserId};
use std::fmt;

/// A role named either by id or by its exact name in the guild.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::From)]
pub enum RoleRef {
    /// Role id
    Id(RoleId),
    /// Role name, resolved against the guild's roles
    Name(String),
}

impl From<&str> for RoleRef {
    fn from(name: &str) -> Self {
        RoleRef::Name(name.to_string())
    }
}

impl fmt::Display for RoleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleRef::Id(id) => write!(f, "{id}"),
            RoleRef::Name(name) => write!(f, "{name}"),
        }
    }
}

/// One positional argument of a [`FailureRecord`].
#[derive(Debug, Clone, PartialEq)]
pub enum FailureArg {
    /// A single configured role
    Role(RoleRef),
    /// A configured role set
    Roles(Vec<RoleRef>),
    /// The guild a check looked at, if any
    Guild(Option<GuildId>),
    /// A configured guild set
    Guilds(Vec<GuildId>),
    /// The channel a check looked at, if any
    Channel(Option<ChannelId>),
    /// A configured channel set
    Channels(Vec<ChannelId>),
    /// A configured category set
    Categories(Vec<CategoryId>),
    /// A configured user set
    Users(Vec<UserId>),
    /// A permission flag
    Permission(Permission),
    /// Free text, e.g. a username substring
    Text(String),
    /// A duration in whole seconds
    Seconds(u64),
    /// A related failure kind, e.g. the other bound of a membership range
    Kind(FailureKind),
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for FailureArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureArg::Role(role) => write!(f, "{role}"),
            FailureArg::Roles(roles) => write!(f, "[{}]", join(roles)),
            FailureArg::Guild(Some(id)) => write!(f, "{id}"),
            FailureArg::Channel(Some(id)) => write!(f, "{id}"),
            FailureArg::Guild(None) | FailureArg::Channel(None) => write!(f, "none"),
            FailureArg::Guilds(ids) => write!(f, "[{}]", join(ids)),
            FailureArg::Channels(ids) => write!(f, "[{}]", join(ids)),
            FailureArg::Categories(ids) => write!(f, "[{}]", join(ids)),
            FailureArg::Users(ids) => write!(f, "[{}]", join(ids)),
            FailureArg::Permission(permission) => write!(f, "{permission}"),
            FailureArg::Text(text) => write!(f, "{text:?}"),
            FailureArg::Seconds(seconds) => write!(f, "{seconds}s"),
            FailureArg::Kind(kind) => write!(f, "{kind}"),
        }
    }
}

/// An authorization failure: what kind, and why.
///
/// # Examples
///
/// ```
/// use bouncer_core::{FailureArg, FailureKind, FailureRecord, GuildId, RoleId};
///
/// let record = FailureRecord::new(
///     FailureKind::UserMissingRole,
///     vec![
///         FailureArg::Role(RoleId::new(42).into()),
///         FailureArg::Guild(Some(GuildId::new(7))),
///     ],
/// );
/// assert_eq!(record.to_string(), "UserMissingRole(42, 7)");
/// ```
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct FailureRecord {
    /// Failure class
    kind: FailureKind,
    /// Positional explanation
    args: Vec<FailureArg>,
}

impl FailureRecord {
    /// Create a record.
    pub fn new(kind: FailureKind, args: Vec<FailureArg>) -> Self {
        Self { kind, args }
    }

    /// A [`FailureKind::Generic`] record with no arguments.
    pub fn generic() -> Self {
        Self::new(FailureKind::Generic, Vec::new())
    }

    /// The same arguments reported under a different kind.
    pub fn with_kind(self, kind: FailureKind) -> Self {
        Self { kind, ..self }
    }

    /// Split into kind and arguments.
    pub fn into_parts(self) -> (FailureKind, Vec<FailureArg>) {
        (self.kind, self.args)
    }
}

impl fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind, join(&self.args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_display_bracketed() {
        let arg = FailureArg::Channels(vec![ChannelId::new(1), ChannelId::new(2)]);
        assert_eq!(arg.to_string(), "[1, 2]");
    }

    #[test]
    fn with_kind_keeps_arguments() {
        let record = FailureRecord::new(
            FailureKind::NotInChannel,
            vec![FailureArg::Channels(vec![ChannelId::new(3)])],
        )
        .with_kind(FailureKind::InChannel);

        assert_eq!(*record.kind(), FailureKind::InChannel);
        assert_eq!(record.args().len(), 1);
    }

    #[test]
    fn generic_has_no_arguments() {
        assert_eq!(FailureRecord::generic().to_string(), "Generic()");
    }
}
