//! Channel and guild permission checks.

use crate::{Check, Subject, Verdict};
use async_trait::async_trait;
use bouncer_core::{
    ChannelId, ExecutionContext, FailureArg, FailureKind, FailureRecord, GuildId, Permission,
    PermissionSet,
};
use bouncer_error::{BouncerResult, CheckConfigError, CheckConfigErrorKind};
use std::str::FromStr;
use tracing::{debug, instrument};

/// Parse `(flag name, expected)` pairs, rejecting unknown names together.
fn parse_flags<I, S>(scope: &str, flags: I) -> Result<Vec<(Permission, bool)>, CheckConfigError>
where
    I: IntoIterator<Item = (S, bool)>,
    S: AsRef<str>,
{
    let mut parsed = Vec::new();
    let mut invalid = Vec::new();
    for (name, expected) in flags {
        match Permission::from_str(name.as_ref()) {
            Ok(permission) => parsed.push((permission, expected)),
            Err(_) => invalid.push(name.as_ref().to_string()),
        }
    }
    if !invalid.is_empty() {
        invalid.sort();
        return Err(CheckConfigError::new(CheckConfigErrorKind::InvalidPermission(
            invalid,
        )));
    }
    if parsed.is_empty() {
        return Err(CheckConfigError::new(CheckConfigErrorKind::NoPermissions(
            scope.to_string(),
        )));
    }
    Ok(parsed)
}

/// Flags whose presence differs from the expectation.
fn mismatched(required: &[(Permission, bool)], held: &PermissionSet) -> Vec<FailureArg> {
    required
        .iter()
        .filter(|(permission, expected)| held.contains(*permission) != *expected)
        .map(|(permission, _)| FailureArg::Permission(*permission))
        .collect()
}

fn compare(
    kind: FailureKind,
    target: FailureArg,
    required: &[(Permission, bool)],
    held: Option<PermissionSet>,
) -> Verdict {
    let Some(held) = held else {
        return Verdict::fail(FailureRecord::new(kind, vec![target]));
    };
    let missing = mismatched(required, &held);
    if missing.is_empty() {
        let mut args = vec![target];
        args.extend(
            required
                .iter()
                .map(|(permission, _)| FailureArg::Permission(*permission)),
        );
        return Verdict::pass(FailureRecord::new(kind, args));
    }
    let mut args = vec![target];
    args.extend(missing);
    Verdict::fail(FailureRecord::new(kind, args))
}

/// Compares the subject's effective permissions in a channel to a required map.
///
/// Each flag maps to whether it must be held (`true`) or must not be
/// (`false`). Reports `(channel, mismatched flags...)`.
///
/// # Examples
///
/// ```
/// use bouncer_check::ChannelPermissionCheck;
/// use bouncer_core::ChannelId;
///
/// let check = ChannelPermissionCheck::user([("send_messages", true), ("mention_everyone", false)])
///     .unwrap()
///     .in_channel(ChannelId::new(3));
/// # let _ = check;
///
/// let err = ChannelPermissionCheck::bot([("send_everything", true)]).unwrap_err();
/// assert!(err.to_string().contains("send_everything"));
/// ```
#[derive(Debug, Clone)]
pub struct ChannelPermissionCheck {
    subject: Subject,
    channel: Option<ChannelId>,
    required: Vec<(Permission, bool)>,
}

impl ChannelPermissionCheck {
    /// Require channel permissions of the invoking user.
    pub fn user<I, S>(flags: I) -> Result<Self, CheckConfigError>
    where
        I: IntoIterator<Item = (S, bool)>,
        S: AsRef<str>,
    {
        Ok(Self {
            subject: Subject::User,
            channel: None,
            required: parse_flags("channel", flags)?,
        })
    }

    /// Require channel permissions of the bot.
    pub fn bot<I, S>(flags: I) -> Result<Self, CheckConfigError>
    where
        I: IntoIterator<Item = (S, bool)>,
        S: AsRef<str>,
    {
        Ok(Self {
            subject: Subject::Bot,
            channel: None,
            required: parse_flags("channel", flags)?,
        })
    }

    /// Inspect `channel` instead of the invoking channel.
    pub fn in_channel(mut self, channel: ChannelId) -> Self {
        self.channel = Some(channel);
        self
    }

    fn kind(&self) -> FailureKind {
        match self.subject {
            Subject::User => FailureKind::UserMissingChannelPerms,
            Subject::Bot => FailureKind::BotMissingChannelPerms,
        }
    }
}

#[async_trait]
impl Check for ChannelPermissionCheck {
    fn name(&self) -> String {
        format!("{}_has_channel_perms", self.subject)
    }

    #[instrument(skip_all, fields(check = "channel_perms", subject = %self.subject))]
    async fn evaluate(&self, ctx: &dyn ExecutionContext) -> BouncerResult<Verdict> {
        let target = self.channel.or(ctx.channel_id());
        let held = match target {
            Some(channel) => ctx.channel_permissions(channel, self.subject.id(ctx)).await?,
            None => None,
        };
        let verdict = compare(self.kind(), FailureArg::Channel(target), &self.required, held);
        debug!(passed = verdict.passed(), "Evaluated channel permissions");
        Ok(verdict)
    }
}

/// Compares the subject's guild-level permissions to a required map.
///
/// Fails with `(none)` in DMs. Reports `(guild, mismatched flags...)`.
#[derive(Debug, Clone)]
pub struct GuildPermissionCheck {
    subject: Subject,
    guild: Option<GuildId>,
    required: Vec<(Permission, bool)>,
}

impl GuildPermissionCheck {
    /// Require guild permissions of the invoking user.
    pub fn user<I, S>(flags: I) -> Result<Self, CheckConfigError>
    where
        I: IntoIterator<Item = (S, bool)>,
        S: AsRef<str>,
    {
        Ok(Self {
            subject: Subject::User,
            guild: None,
            required: parse_flags("guild", flags)?,
        })
    }

    /// Require guild permissions of the bot.
    pub fn bot<I, S>(flags: I) -> Result<Self, CheckConfigError>
    where
        I: IntoIterator<Item = (S, bool)>,
        S: AsRef<str>,
    {
        Ok(Self {
            subject: Subject::Bot,
            guild: None,
            required: parse_flags("guild", flags)?,
        })
    }

    /// Inspect `guild` instead of the invoking guild.
    pub fn in_guild(mut self, guild: GuildId) -> Self {
        self.guild = Some(guild);
        self
    }

    fn kind(&self) -> FailureKind {
        match self.subject {
            Subject::User => FailureKind::UserMissingGuildPerms,
            Subject::Bot => FailureKind::BotMissingGuildPerms,
        }
    }
}

#[async_trait]
impl Check for GuildPermissionCheck {
    fn name(&self) -> String {
        format!("{}_has_guild_perms", self.subject)
    }

    #[instrument(skip_all, fields(check = "guild_perms", subject = %self.subject))]
    async fn evaluate(&self, ctx: &dyn ExecutionContext) -> BouncerResult<Verdict> {
        let target = self.guild.or(ctx.guild_id());
        let held = match target {
            Some(guild) => ctx.guild_permissions(guild, self.subject.id(ctx)).await?,
            None => None,
        };
        let verdict = compare(self.kind(), FailureArg::Guild(target), &self.required, held);
        debug!(passed = verdict.passed(), "Evaluated guild permissions");
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bouncer_core::{MockContext, UserId};

    #[test]
    fn unknown_flags_are_reported_together() {
        let err = GuildPermissionCheck::user([("fly", true), ("ban_members", true), ("dig", false)])
            .unwrap_err();
        assert_eq!(
            err.kind(),
            &CheckConfigErrorKind::InvalidPermission(vec!["dig".to_string(), "fly".to_string()])
        );
    }

    #[test]
    fn empty_flag_map_is_rejected() {
        let err = ChannelPermissionCheck::user(Vec::<(&str, bool)>::new()).unwrap_err();
        assert!(matches!(err.kind(), CheckConfigErrorKind::NoPermissions(_)));
    }

    #[tokio::test]
    async fn forbidden_flags_count_as_mismatches() {
        let user = UserId::new(5);
        let channel = ChannelId::new(1);
        let held: PermissionSet = [Permission::SendMessages, Permission::MentionEveryone]
            .into_iter()
            .collect();
        let ctx = MockContext::in_guild(user, GuildId::new(7))
            .with_channel_permissions(channel, user, held);

        let check =
            ChannelPermissionCheck::user([("send_messages", true), ("mention_everyone", false)])
                .unwrap();
        let verdict = check.evaluate(&ctx).await.unwrap();

        assert!(!verdict.passed());
        assert_eq!(
            verdict.record().args(),
            &vec![
                FailureArg::Channel(Some(channel)),
                FailureArg::Permission(Permission::MentionEveryone),
            ]
        );
    }

    #[tokio::test]
    async fn guild_check_fails_in_dms() {
        let ctx = MockContext::dm(UserId::new(5));
        let verdict = GuildPermissionCheck::bot([("manage_roles", true)])
            .unwrap()
            .evaluate(&ctx)
            .await
            .unwrap();
        assert!(!verdict.passed());
        assert_eq!(verdict.record().args(), &vec![FailureArg::Guild(None)]);
    }

    #[tokio::test]
    async fn administrator_satisfies_requirements() {
        let ctx = MockContext::in_guild(UserId::new(5), GuildId::new(7));
        let bot = ctx.bot_id();
        let ctx = ctx.with_guild_permissions(
            GuildId::new(7),
            bot,
            [Permission::Administrator].into_iter().collect(),
        );
        let verdict = GuildPermissionCheck::bot([("manage_roles", true), ("kick_members", true)])
            .unwrap()
            .evaluate(&ctx)
            .await
            .unwrap();
        assert!(verdict.passed());
    }
}
