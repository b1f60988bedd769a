//! The closed taxonomy of authorization failures.

use serde::{Deserialize, Serialize};

/// A class of authorization failure.
///
/// Kinds come in semantically opposite pairs (`NotInDM` / `InDM`), which is
/// what lets a negated check explain itself. [`FailureKind::Generic`] is the
/// fallback for failures that have no single explanation.
///
/// Kinds display and parse as their PascalCase names.
///
/// # Examples
///
/// ```
/// use bouncer_core::FailureKind;
///
/// assert_eq!(FailureKind::UserMissingRole.inverse(), FailureKind::UserHasRole);
/// assert_eq!(FailureKind::NotInDm.to_string(), "NotInDM");
/// assert_eq!("ChannelIsNSFW".parse::<FailureKind>().unwrap(), FailureKind::ChannelIsNsfw);
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
    strum::IntoStaticStr,
)]
pub enum FailureKind {
    /// No specific explanation
    Generic,

    /// The invoking user lacks every configured role
    UserMissingRole,
    /// The invoking user holds a configured role
    UserHasRole,
    /// The bot lacks every configured role
    BotMissingRole,
    /// The bot holds a configured role
    BotHasRole,

    /// The invoking user's channel permissions differ from those required
    UserMissingChannelPerms,
    /// The invoking user holds forbidden channel permissions
    UserHasChannelPerms,
    /// The bot's channel permissions differ from those required
    BotMissingChannelPerms,
    /// The bot holds forbidden channel permissions
    BotHasChannelPerms,

    /// The invoking user's guild permissions differ from those required
    UserMissingGuildPerms,
    /// The invoking user holds forbidden guild permissions
    UserHasGuildPerms,
    /// The bot's guild permissions differ from those required
    BotMissingGuildPerms,
    /// The bot holds forbidden guild permissions
    BotHasGuildPerms,

    /// The command was not invoked in a DM
    #[strum(to_string = "NotInDM")]
    #[serde(rename = "NotInDM")]
    NotInDm,
    /// The command was invoked in a DM
    #[strum(to_string = "InDM")]
    #[serde(rename = "InDM")]
    InDm,

    /// The invoking user is not on the allow-list
    IsNotUser,
    /// The invoking user is on the block-list
    IsUser,

    /// The command was invoked outside the configured channels
    NotInChannel,
    /// The command was invoked inside a forbidden channel
    InChannel,

    /// The command was invoked outside the configured guilds
    NotInGuild,
    /// The command was invoked inside a forbidden guild
    InGuild,

    /// The command was invoked outside the configured categories
    NotInCategory,
    /// The command was invoked inside a forbidden category
    InCategory,

    /// The invoking user does not own the bot
    IsNotBotOwner,
    /// The invoking user owns the bot
    IsBotOwner,

    /// The channel is not age-restricted
    #[strum(to_string = "ChannelIsNotNSFW")]
    #[serde(rename = "ChannelIsNotNSFW")]
    ChannelIsNotNsfw,
    /// The channel is age-restricted
    #[strum(to_string = "ChannelIsNSFW")]
    #[serde(rename = "ChannelIsNSFW")]
    ChannelIsNsfw,

    /// The invoking user does not own the guild
    IsNotGuildOwner,
    /// The invoking user owns the guild
    IsGuildOwner,

    /// The display name lacks the configured substring
    UsernameDoesNotContain,
    /// The display name contains a forbidden substring
    UsernameContains,

    /// Membership is longer than an `at most` bound
    MembershipGT,
    /// Membership is shorter than an `at least` bound
    MembershipLT,
    /// Membership reached a `less than` bound
    MembershipGE,
    /// Membership has not passed a `greater than` bound
    MembershipLE,
}

impl FailureKind {
    /// The semantically opposite kind, or [`FailureKind::Generic`] when unpaired.
    ///
    /// Total and pure: every kind maps somewhere, and mapping twice returns the
    /// original kind for paired kinds.
    pub fn inverse(self) -> FailureKind {
        use FailureKind::*;
        match self {
            Generic => Generic,
            UserMissingRole => UserHasRole,
            UserHasRole => UserMissingRole,
            BotMissingRole => BotHasRole,
            BotHasRole => BotMissingRole,
            UserMissingChannelPerms => UserHasChannelPerms,
            UserHasChannelPerms => UserMissingChannelPerms,
            BotMissingChannelPerms => BotHasChannelPerms,
            BotHasChannelPerms => BotMissingChannelPerms,
            UserMissingGuildPerms => UserHasGuildPerms,
            UserHasGuildPerms => UserMissingGuildPerms,
            BotMissingGuildPerms => BotHasGuildPerms,
            BotHasGuildPerms => BotMissingGuildPerms,
            NotInDm => InDm,
            InDm => NotInDm,
            IsNotUser => IsUser,
            IsUser => IsNotUser,
            NotInChannel => InChannel,
            InChannel => NotInChannel,
            NotInGuild => InGuild,
            InGuild => NotInGuild,
            NotInCategory => InCategory,
            InCategory => NotInCategory,
            IsNotBotOwner => IsBotOwner,
            IsBotOwner => IsNotBotOwner,
            ChannelIsNotNsfw => ChannelIsNsfw,
            ChannelIsNsfw => ChannelIsNotNsfw,
            IsNotGuildOwner => IsGuildOwner,
            IsGuildOwner => IsNotGuildOwner,
            UsernameDoesNotContain => UsernameContains,
            UsernameContains => UsernameDoesNotContain,
            MembershipGT => MembershipLE,
            MembershipLT => MembershipGE,
            MembershipGE => MembershipLT,
            MembershipLE => MembershipGT,
        }
    }

    /// Whether this kind describes a membership duration bound.
    pub fn is_membership(self) -> bool {
        matches!(
            self,
            FailureKind::MembershipGT
                | FailureKind::MembershipLT
                | FailureKind::MembershipGE
                | FailureKind::MembershipLE
        )
    }

    /// The requirement a membership kind expresses, e.g. `greater than or equal to`.
    ///
    /// Returns `None` for kinds that are not membership bounds.
    pub fn phrase(self) -> Option<&'static str> {
        match self {
            FailureKind::MembershipLT => Some("greater than or equal to"),
            FailureKind::MembershipGT => Some("less than or equal to"),
            FailureKind::MembershipLE => Some("greater than"),
            FailureKind::MembershipGE => Some("less than"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn inverse_is_an_involution() {
        for kind in FailureKind::iter() {
            assert_eq!(kind.inverse().inverse(), kind, "{kind}");
        }
    }

    #[test]
    fn only_generic_maps_to_itself() {
        for kind in FailureKind::iter() {
            if kind != FailureKind::Generic {
                assert_ne!(kind.inverse(), kind, "{kind}");
            }
        }
        assert_eq!(FailureKind::Generic.inverse(), FailureKind::Generic);
    }

    #[test]
    fn names_parse_back() {
        for kind in FailureKind::iter() {
            let name: &'static str = kind.into();
            assert_eq!(name.parse::<FailureKind>().unwrap(), kind);
        }
    }

    #[test]
    fn membership_kinds_have_phrases() {
        for kind in FailureKind::iter() {
            assert_eq!(kind.is_membership(), kind.phrase().is_some(), "{kind}");
        }
    }
}
