//! Failure message rendering.

use bouncer_core::{FailureArg, FailureKind, FailureRecord};
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;

/// Message used when no rule explains a failure.
pub const GENERIC_MESSAGE: &str =
    "You or the bot are missing one or more of the permissions required to use this command.";

/// Turns a failure kind and its arguments into text for the invoking user.
///
/// Return `None` from [`Formatter::format`] for kinds you do not handle; the
/// dispatcher then falls back to [`Formatter::generic`].
pub trait Formatter: Send + Sync {
    /// Text for one failure, or `None` to fall back to the generic message.
    fn format(&self, kind: FailureKind, args: &[FailureArg]) -> Option<String>;

    /// Text used when [`Formatter::format`] has nothing to say.
    fn generic(&self) -> String {
        GENERIC_MESSAGE.to_string()
    }

    /// Text for a record, falling back to the generic message.
    fn render(&self, record: &FailureRecord) -> String {
        self.format(*record.kind(), record.args())
            .unwrap_or_else(|| self.generic())
    }
}

/// Break whole seconds down as `UPTIME: Nd Nh Nm Ns`.
///
/// # Examples
///
/// ```
/// use bouncer_dispatch::uptime;
///
/// assert_eq!(uptime(90_061), "UPTIME: 1d 1h 1m 1s");
/// ```
pub fn uptime(seconds: u64) -> String {
    let (minutes, s) = (seconds / 60, seconds % 60);
    let (hours, m) = (minutes / 60, minutes % 60);
    let (d, h) = (hours / 24, hours % 24);
    format!("UPTIME: {d}d {h}h {m}m {s}s")
}

fn mentions<T: Display>(ids: &[T]) -> String {
    ids.iter()
        .map(|id| format!("<#{id}>"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn plain<T: Display>(ids: &[T]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// `within <#1>` for one id, `within the following {plural}: <#1>, <#2>` for several.
fn within<T: Display>(ids: &[T], singular: &str, plural: &str, render: fn(&[T]) -> String) -> String {
    match ids {
        [one] => format!("within {singular}{}", render(std::slice::from_ref(one))),
        many => format!("within the following {plural}: {}", render(many)),
    }
}

/// The stock English messages.
///
/// Channel and category lists render as `<#id>` mentions, membership bounds as
/// [`uptime`] breakdowns.
///
/// # Examples
///
/// ```
/// use bouncer_core::{ChannelId, FailureArg, FailureKind};
/// use bouncer_dispatch::{DefaultFormatter, Formatter};
///
/// let text = DefaultFormatter
///     .format(
///         FailureKind::NotInChannel,
///         &[FailureArg::Channels(vec![ChannelId::new(1), ChannelId::new(2)])],
///     )
///     .unwrap();
/// assert_eq!(
///     text,
///     "This command may only be used within the following channels: <#1>, <#2>."
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormatter;

impl DefaultFormatter {
    fn membership(kind: FailureKind, args: &[FailureArg]) -> Option<String> {
        let phrase = kind.phrase()?;
        match args {
            [FailureArg::Seconds(seconds)] => Some(format!(
                "Your length of server membership must be {phrase} `{}` in order to use this command.",
                uptime(*seconds)
            )),
            [
                FailureArg::Seconds(seconds),
                FailureArg::Kind(other),
                FailureArg::Seconds(other_seconds),
            ] => Some(format!(
                "Your length of server membership must be {phrase} `{}` and {} `{}` in order to use this command.",
                uptime(*seconds),
                other.phrase()?,
                uptime(*other_seconds)
            )),
            _ => None,
        }
    }
}

impl Formatter for DefaultFormatter {
    fn format(&self, kind: FailureKind, args: &[FailureArg]) -> Option<String> {
        use FailureKind::*;

        let text = match (kind, args.first()) {
            (Generic, _) => GENERIC_MESSAGE.to_string(),

            (UserMissingRole, _) => {
                "You are missing one or more of the roles required to use this command.".to_string()
            }
            (UserHasRole, _) => {
                "You have one or more of the roles that are not allowed by this command.".to_string()
            }
            (BotMissingRole, _) => {
                "The bot is missing one or more of the roles required to use this command."
                    .to_string()
            }
            (BotHasRole, _) => {
                "The bot has one or more of the roles that are not allowed by this command."
                    .to_string()
            }

            (UserMissingChannelPerms, _) => "You are missing one or more of the channel \
                permissions required to use this command."
                .to_string(),
            (UserHasChannelPerms, _) => "You have one or more of the channel permissions that \
                are not allowed by this command."
                .to_string(),
            (BotMissingChannelPerms, _) => "The bot is missing one or more of the channel \
                permissions required to use this command."
                .to_string(),
            (BotHasChannelPerms, _) => "The bot has one or more of the channel permissions \
                that are not allowed by this command."
                .to_string(),

            (UserMissingGuildPerms, _) => "You are missing one or more of the guild permissions \
                required to use this command."
                .to_string(),
            (UserHasGuildPerms, _) => "You have one or more of the guild permissions that are \
                not allowed by this command."
                .to_string(),
            (BotMissingGuildPerms, _) => "The bot is missing one or more of the guild \
                permissions required to use this command."
                .to_string(),
            (BotHasGuildPerms, _) => "The bot has one or more of the guild permissions that \
                are not allowed by this command."
                .to_string(),

            (NotInDm, _) => {
                "This command can only be used through DMs (private messages).".to_string()
            }
            (InDm, _) => "This command may not be used through DMs (private messages).".to_string(),

            (IsNotUser, _) => "You are not in this command's whitelist.".to_string(),
            (IsUser, _) => "You are in this command's blacklist.".to_string(),

            (NotInChannel, Some(FailureArg::Channels(ids))) => format!(
                "This command may only be used {}.",
                within(ids, "", "channels", mentions)
            ),
            (InChannel, Some(FailureArg::Channels(ids))) => format!(
                "This command may not be used {}.",
                within(ids, "", "channels", mentions)
            ),
            (NotInGuild, Some(FailureArg::Guilds(ids))) => format!(
                "This command may only be used {}.",
                within(ids, "the guild ", "guilds", plain)
            ),
            (InGuild, Some(FailureArg::Guilds(ids))) => format!(
                "This command may not be used {}.",
                within(ids, "the guild ", "guilds", plain)
            ),
            (NotInCategory, Some(FailureArg::Categories(ids))) => format!(
                "This command may only be used {}.",
                within(ids, "the category ", "categories", mentions)
            ),
            (InCategory, Some(FailureArg::Categories(ids))) => format!(
                "This command may not be used {}.",
                within(ids, "the category ", "categories", mentions)
            ),

            (IsNotBotOwner, _) => "This command may only be used by the bot owner.".to_string(),
            (IsBotOwner, _) => "This command may not be used by the bot owner.".to_string(),

            (ChannelIsNotNsfw, _) => "This command may only be used in NSFW channels.".to_string(),
            (ChannelIsNsfw, _) => "This command may not be used in NSFW channels.".to_string(),

            (IsNotGuildOwner, _) => "This command may only be used by the guild owner.".to_string(),
            (IsGuildOwner, _) => "This command may not be used by the guild owner.".to_string(),

            (UsernameDoesNotContain, Some(FailureArg::Text(substring))) => {
                format!("Your username must contain '{substring}'.")
            }
            (UsernameContains, Some(FailureArg::Text(substring))) => {
                format!("Your username must not contain '{substring}'.")
            }

            (MembershipGT | MembershipLT | MembershipGE | MembershipLE, _) => {
                return Self::membership(kind, args);
            }

            _ => return None,
        };
        Some(text)
    }
}

/// A per-kind override.
pub type Rule = Arc<dyn Fn(&[FailureArg]) -> String + Send + Sync>;

/// Layers per-kind rules over another formatter.
///
/// Kinds without a rule go to the base formatter, or straight to the generic
/// message when there is none.
///
/// # Examples
///
/// ```
/// use bouncer_core::FailureKind;
/// use bouncer_dispatch::{DefaultFormatter, Formatter, RuleFormatter, GENERIC_MESSAGE};
///
/// let formatter = RuleFormatter::over(DefaultFormatter)
///     .rule(FailureKind::NotInDm, |_| "Slide into my DMs first.".to_string());
/// assert_eq!(
///     formatter.format(FailureKind::NotInDm, &[]).as_deref(),
///     Some("Slide into my DMs first.")
/// );
///
/// let bare = RuleFormatter::new();
/// assert_eq!(bare.format(FailureKind::IsNotBotOwner, &[]), None);
/// assert_eq!(bare.generic(), GENERIC_MESSAGE);
/// ```
#[derive(Clone, Default)]
pub struct RuleFormatter {
    base: Option<Arc<dyn Formatter>>,
    rules: HashMap<FailureKind, Rule>,
    generic: Option<String>,
}

impl RuleFormatter {
    /// Rules only; unset kinds use the generic message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules over `base`.
    pub fn over(base: impl Formatter + 'static) -> Self {
        Self {
            base: Some(Arc::new(base)),
            ..Self::default()
        }
    }

    /// Render `kind` with `rule`.
    pub fn rule<F>(mut self, kind: FailureKind, rule: F) -> Self
    where
        F: Fn(&[FailureArg]) -> String + Send + Sync + 'static,
    {
        self.rules.insert(kind, Arc::new(rule));
        self
    }

    /// Replace the generic fallback message.
    pub fn generic_message(mut self, text: impl Into<String>) -> Self {
        self.generic = Some(text.into());
        self
    }
}

impl std::fmt::Debug for RuleFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleFormatter")
            .field("rules", &self.rules.keys().collect::<Vec<_>>())
            .field("has_base", &self.base.is_some())
            .finish()
    }
}

impl Formatter for RuleFormatter {
    fn format(&self, kind: FailureKind, args: &[FailureArg]) -> Option<String> {
        match self.rules.get(&kind) {
            Some(rule) => Some(rule(args)),
            None => self.base.as_ref()?.format(kind, args),
        }
    }

    fn generic(&self) -> String {
        match (&self.generic, &self.base) {
            (Some(text), _) => text.clone(),
            (None, Some(base)) => base.generic(),
            (None, None) => GENERIC_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bouncer_core::{CategoryId, ChannelId, GuildId, RoleId};
    use strum::IntoEnumIterator;

    fn sample_args(kind: FailureKind) -> Vec<FailureArg> {
        use FailureKind::*;
        match kind {
            NotInChannel | InChannel => vec![FailureArg::Channels(vec![ChannelId::new(5)])],
            NotInGuild | InGuild => vec![FailureArg::Guilds(vec![GuildId::new(5)])],
            NotInCategory | InCategory => vec![FailureArg::Categories(vec![CategoryId::new(5)])],
            UsernameDoesNotContain | UsernameContains => vec![FailureArg::Text("mod".into())],
            MembershipGT | MembershipLT | MembershipGE | MembershipLE => {
                vec![FailureArg::Seconds(60)]
            }
            _ => vec![FailureArg::Role(RoleId::new(1).into())],
        }
    }

    #[test]
    fn every_kind_has_a_default_message() {
        for kind in FailureKind::iter() {
            assert!(
                DefaultFormatter.format(kind, &sample_args(kind)).is_some(),
                "{kind}"
            );
        }
    }

    #[test]
    fn single_channel_is_a_bare_mention() {
        let text = DefaultFormatter
            .format(FailureKind::InChannel, &[FailureArg::Channels(vec![ChannelId::new(5)])])
            .unwrap();
        assert_eq!(text, "This command may not be used within <#5>.");
    }

    #[test]
    fn single_guild_and_category_name_the_place() {
        let text = DefaultFormatter
            .format(FailureKind::NotInGuild, &[FailureArg::Guilds(vec![GuildId::new(5)])])
            .unwrap();
        assert_eq!(text, "This command may only be used within the guild 5.");

        let text = DefaultFormatter
            .format(
                FailureKind::NotInCategory,
                &[FailureArg::Categories(vec![CategoryId::new(8), CategoryId::new(9)])],
            )
            .unwrap();
        assert_eq!(
            text,
            "This command may only be used within the following categories: <#8>, <#9>."
        );
    }

    #[test]
    fn membership_range_names_both_bounds() {
        let text = DefaultFormatter
            .format(
                FailureKind::MembershipLT,
                &[
                    FailureArg::Seconds(7 * 86_400),
                    FailureArg::Kind(FailureKind::MembershipGT),
                    FailureArg::Seconds(30 * 86_400),
                ],
            )
            .unwrap();
        assert_eq!(
            text,
            "Your length of server membership must be greater than or equal to \
             `UPTIME: 7d 0h 0m 0s` and less than or equal to `UPTIME: 30d 0h 0m 0s` \
             in order to use this command."
        );
    }

    #[test]
    fn malformed_arguments_fall_back() {
        assert_eq!(DefaultFormatter.format(FailureKind::NotInChannel, &[]), None);
        let record = FailureRecord::new(FailureKind::MembershipGE, Vec::new());
        assert_eq!(DefaultFormatter.render(&record), GENERIC_MESSAGE);
    }

    #[test]
    fn rules_see_the_arguments() {
        let formatter = RuleFormatter::over(DefaultFormatter).rule(FailureKind::UserMissingRole, |args| {
            format!("Ask a moderator for {}.", args[0])
        });
        let record = FailureRecord::new(
            FailureKind::UserMissingRole,
            vec![FailureArg::Role("trusted".into())],
        );
        assert_eq!(formatter.render(&record), "Ask a moderator for trusted.");
        assert_eq!(
            formatter.render(&FailureRecord::new(FailureKind::IsNotBotOwner, Vec::new())),
            "This command may only be used by the bot owner."
        );
    }
}
