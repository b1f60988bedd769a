//! Entities a host resolves on behalf of checks.
//!
//! These mirror the handful of fields checks actually read. Host adapters build
//! them from their platform models with the generated builders.

use crate::{CategoryId, ChannelId, CommandId, GuildId, RoleId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The account that invoked a command.
///
/// # Examples
///
/// ```
/// use bouncer_core::{ActorBuilder, UserId};
///
/// let actor = ActorBuilder::default()
///     .id(UserId::new(1))
///     .name("ferris")
///     .display_name("Ferris")
///     .build()
///     .unwrap();
///
/// assert_eq!(actor.display_name(), "Ferris");
/// assert!(actor.joined_at().is_none());
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
pub struct Actor {
    /// Account id
    id: UserId,
    /// Account name
    #[builder(setter(into))]
    name: String,
    /// Name shown in the invoking guild, or the account name in DMs
    #[builder(setter(into))]
    display_name: String,
    /// When the actor joined the invoking guild
    #[serde(default)]
    #[builder(default, setter(strip_option))]
    joined_at: Option<DateTime<Utc>>,
}

impl Actor {
    /// Create an actor whose display name is its account name.
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id,
            display_name: name.clone(),
            name,
            joined_at: None,
        }
    }

    /// The same actor under a different display name.
    pub fn with_display_name(self, display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            ..self
        }
    }

    /// The same actor with a guild join time.
    pub fn with_joined_at(self, joined_at: DateTime<Utc>) -> Self {
        Self {
            joined_at: Some(joined_at),
            ..self
        }
    }
}

/// The command being invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct CommandInfo {
    /// Qualified command name
    id: CommandId,
    /// Name of the handler function behind the command
    callback: String,
}

impl CommandInfo {
    /// Describe a command by its qualified name and handler name.
    pub fn new(id: impl Into<CommandId>, callback: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            callback: callback.into(),
        }
    }
}

/// A guild role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Role {
    /// Role id
    pub id: RoleId,
    /// Role name
    pub name: String,
}

impl Role {
    /// Create a role.
    pub fn new(id: RoleId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A guild snapshot.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
pub struct Guild {
    /// Guild id
    id: GuildId,
    /// Owner account
    owner_id: UserId,
    /// Every role defined in the guild
    #[serde(default)]
    #[builder(default)]
    roles: Vec<Role>,
}

impl Guild {
    /// Find a role by id.
    pub fn role_by_id(&self, id: RoleId) -> Option<&Role> {
        self.roles.iter().find(|role| role.id == id)
    }

    /// Find a role by exact name.
    pub fn role_by_name(&self, name: &str) -> Option<&Role> {
        self.roles.iter().find(|role| role.name == name)
    }
}

/// A guild member snapshot.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
pub struct Member {
    /// Member account
    user_id: UserId,
    /// Role ids held by the member
    #[serde(default)]
    #[builder(default)]
    roles: Vec<RoleId>,
    /// When the member joined
    #[serde(default)]
    #[builder(default, setter(strip_option))]
    joined_at: Option<DateTime<Utc>>,
}

/// A channel snapshot.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
pub struct Channel {
    /// Channel id
    id: ChannelId,
    /// Parent guild, absent for DM channels
    #[serde(default)]
    #[builder(default, setter(strip_option))]
    guild_id: Option<GuildId>,
    /// Parent category
    #[serde(default)]
    #[builder(default, setter(strip_option))]
    category_id: Option<CategoryId>,
    /// Whether the channel is age-restricted.
    ///
    /// Hosts report `false` for channel types that cannot be marked NSFW.
    #[serde(default)]
    #[builder(default)]
    nsfw: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guild_resolves_roles_by_id_and_name() {
        let guild = GuildBuilder::default()
            .id(GuildId::new(1))
            .owner_id(UserId::new(2))
            .roles(vec![
                Role::new(RoleId::new(10), "mods"),
                Role::new(RoleId::new(11), "admins"),
            ])
            .build()
            .unwrap();

        assert_eq!(guild.role_by_id(RoleId::new(11)).unwrap().name, "admins");
        assert_eq!(guild.role_by_name("mods").unwrap().id, RoleId::new(10));
        assert!(guild.role_by_name("Mods").is_none());
    }

    #[test]
    fn channel_builder_defaults() {
        let channel = ChannelBuilder::default()
            .id(ChannelId::new(5))
            .build()
            .unwrap();
        assert!(!channel.nsfw());
        assert!(channel.guild_id().is_none());
    }
}
