//! Permission flags and permission snapshots.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single permission flag.
///
/// Flags use the snake_case names hosts expose in their permission models, so
/// check configuration can be written as `("send_messages", true)`.
///
/// # Examples
///
/// ```
/// use bouncer_core::Permission;
/// use std::str::FromStr;
///
/// assert_eq!(Permission::from_str("manage_roles").unwrap(), Permission::ManageRoles);
/// assert!(Permission::from_str("manage_everything").is_err());
/// assert_eq!(Permission::KickMembers.to_string(), "kick_members");
/// ```
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
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Permission {
    /// Create channel invites
    CreateInstantInvite,
    /// Kick members
    KickMembers,
    /// Ban members
    BanMembers,
    /// All permissions, bypassing overwrites
    Administrator,
    /// Create, edit and delete channels
    ManageChannels,
    /// Edit guild settings
    ManageGuild,
    /// Add reactions to messages
    AddReactions,
    /// Read the audit log
    ViewAuditLog,
    /// Priority speaker in voice
    PrioritySpeaker,
    /// Go live in voice
    Stream,
    /// View a channel and read its messages
    #[strum(to_string = "view_channel", serialize = "read_messages")]
    ViewChannel,
    /// Send messages
    SendMessages,
    /// Send text-to-speech messages
    SendTtsMessages,
    /// Delete and pin other members' messages
    ManageMessages,
    /// Post links that embed
    EmbedLinks,
    /// Upload files
    AttachFiles,
    /// Read message history
    ReadMessageHistory,
    /// Mention @everyone and @here
    MentionEveryone,
    /// Use emojis from other guilds
    #[strum(to_string = "use_external_emojis", serialize = "external_emojis")]
    UseExternalEmojis,
    /// View guild insights
    ViewGuildInsights,
    /// Join voice channels
    Connect,
    /// Speak in voice channels
    Speak,
    /// Server-mute members
    MuteMembers,
    /// Server-deafen members
    DeafenMembers,
    /// Move members between voice channels
    MoveMembers,
    /// Use voice activity detection
    UseVoiceActivation,
    /// Change own nickname
    ChangeNickname,
    /// Change other members' nicknames
    ManageNicknames,
    /// Create and edit roles below own highest role
    ManageRoles,
    /// Manage webhooks
    ManageWebhooks,
    /// Manage emojis and stickers
    #[strum(to_string = "manage_emojis", serialize = "manage_emojis_and_stickers")]
    ManageEmojis,
    /// Use application (slash) commands
    UseApplicationCommands,
    /// Request to speak in stage channels
    RequestToSpeak,
    /// Manage scheduled events
    ManageEvents,
    /// Manage threads
    ManageThreads,
    /// Create public threads
    CreatePublicThreads,
    /// Create private threads
    CreatePrivateThreads,
    /// Use stickers from other guilds
    UseExternalStickers,
    /// Send messages in threads
    SendMessagesInThreads,
    /// Launch embedded activities
    UseEmbeddedActivities,
    /// Time out members
    ModerateMembers,
}

/// The set of permission flags a subject holds in a channel or guild.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    /// An empty permission set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the flag is held.
    ///
    /// `Administrator` implies every other flag.
    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission) || self.0.contains(&Permission::Administrator)
    }

    /// Grant a flag.
    pub fn insert(&mut self, permission: Permission) -> bool {
        self.0.insert(permission)
    }

    /// Iterate over the granted flags.
    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.0.iter()
    }

    /// Number of granted flags.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no flag is granted.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn every_flag_round_trips_through_its_name() {
        for flag in Permission::iter() {
            assert_eq!(Permission::from_str(flag.as_ref()).unwrap(), flag);
        }
    }

    #[test]
    fn legacy_aliases_parse() {
        assert_eq!(
            Permission::from_str("read_messages").unwrap(),
            Permission::ViewChannel
        );
        assert_eq!(
            Permission::from_str("external_emojis").unwrap(),
            Permission::UseExternalEmojis
        );
    }

    #[test]
    fn administrator_implies_everything() {
        let set: PermissionSet = [Permission::Administrator].into_iter().collect();
        assert!(set.contains(Permission::BanMembers));
        assert!(!PermissionSet::new().contains(Permission::BanMembers));
    }
}
