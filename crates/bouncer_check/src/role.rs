//! Role membership checks.

use crate::{Check, Subject, Verdict};
use async_trait::async_trait;
use bouncer_core::{
    ExecutionContext, FailureArg, FailureKind, FailureRecord, Guild, GuildId, RoleId, RoleRef,
};
use bouncer_error::{BouncerResult, CheckConfigError, CheckConfigErrorKind};
use tracing::{debug, instrument};

/// Passes when the subject holds at least one of the configured roles.
///
/// Roles are given by id or by exact name; both are resolved against the
/// guild's role list, so an id the guild does not define never matches. The
/// guild is the invoking one unless set with [`RoleCheck::in_guild`].
///
/// Fails (without error) when there is no guild, the guild cannot be found,
/// or the subject is not a member. Reports `(role-or-roles, guild)`.
///
/// # Examples
///
/// ```
/// use bouncer_check::RoleCheck;
/// use bouncer_core::RoleId;
///
/// let moderators = RoleCheck::user_any([RoleId::new(1).into(), "moderator".into()]).unwrap();
/// assert!(RoleCheck::user("").is_err());
/// # let _ = moderators;
/// ```
#[derive(Debug, Clone)]
pub struct RoleCheck {
    subject: Subject,
    roles: Vec<RoleRef>,
    single: bool,
    guild: Option<GuildId>,
}

impl RoleCheck {
    fn build(subject: Subject, roles: Vec<RoleRef>, single: bool) -> Result<Self, CheckConfigError> {
        if roles.is_empty() {
            return Err(CheckConfigError::new(CheckConfigErrorKind::EmptySet("role")));
        }
        if let Some(RoleRef::Name(name)) = roles
            .iter()
            .find(|role| matches!(role, RoleRef::Name(name) if name.trim().is_empty()))
        {
            return Err(CheckConfigError::new(CheckConfigErrorKind::InvalidRole(
                name.clone(),
            )));
        }
        Ok(Self {
            subject,
            roles,
            single,
            guild: None,
        })
    }

    /// The invoking user must hold `role`.
    pub fn user(role: impl Into<RoleRef>) -> Result<Self, CheckConfigError> {
        Self::build(Subject::User, vec![role.into()], true)
    }

    /// The invoking user must hold one of `roles`.
    pub fn user_any(roles: impl IntoIterator<Item = RoleRef>) -> Result<Self, CheckConfigError> {
        Self::build(Subject::User, roles.into_iter().collect(), false)
    }

    /// The bot must hold `role`.
    pub fn bot(role: impl Into<RoleRef>) -> Result<Self, CheckConfigError> {
        Self::build(Subject::Bot, vec![role.into()], true)
    }

    /// The bot must hold one of `roles`.
    pub fn bot_any(roles: impl IntoIterator<Item = RoleRef>) -> Result<Self, CheckConfigError> {
        Self::build(Subject::Bot, roles.into_iter().collect(), false)
    }

    /// Look the roles up in `guild` instead of the invoking guild.
    pub fn in_guild(mut self, guild: GuildId) -> Self {
        self.guild = Some(guild);
        self
    }

    fn kind(&self) -> FailureKind {
        match self.subject {
            Subject::User => FailureKind::UserMissingRole,
            Subject::Bot => FailureKind::BotMissingRole,
        }
    }

    fn role_arg(&self) -> FailureArg {
        match self.roles.as_slice() {
            [role] if self.single => FailureArg::Role(role.clone()),
            roles => FailureArg::Roles(roles.to_vec()),
        }
    }

    fn resolve(&self, guild: &Guild) -> Vec<RoleId> {
        self.roles
            .iter()
            .filter_map(|role| match role {
                RoleRef::Id(id) => guild.role_by_id(*id),
                RoleRef::Name(name) => guild.role_by_name(name),
            })
            .map(|role| role.id)
            .collect()
    }

    async fn holds_role(
        &self,
        ctx: &dyn ExecutionContext,
        guild_id: Option<GuildId>,
    ) -> BouncerResult<bool> {
        let Some(guild_id) = guild_id else {
            debug!("No guild to look roles up in");
            return Ok(false);
        };
        let Some(guild) = ctx.guild(guild_id).await? else {
            debug!(%guild_id, "Guild not found");
            return Ok(false);
        };
        let user = self.subject.id(ctx);
        let Some(member) = ctx.member(guild_id, user).await? else {
            debug!(%guild_id, %user, "Subject is not a member");
            return Ok(false);
        };

        let wanted = self.resolve(&guild);
        Ok(member.roles().iter().any(|held| wanted.contains(held)))
    }
}

#[async_trait]
impl Check for RoleCheck {
    fn name(&self) -> String {
        format!("{}_has_role", self.subject)
    }

    #[instrument(skip_all, fields(check = "role", subject = %self.subject))]
    async fn evaluate(&self, ctx: &dyn ExecutionContext) -> BouncerResult<Verdict> {
        let guild_id = self.guild.or(ctx.guild_id());
        let passed = self.holds_role(ctx, guild_id).await?;
        debug!(passed, "Evaluated role check");
        Ok(Verdict::new(
            passed,
            FailureRecord::new(self.kind(), vec![self.role_arg(), FailureArg::Guild(guild_id)]),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bouncer_core::{GuildBuilder, MemberBuilder, MockContext, Role, UserId};

    fn guild() -> Guild {
        GuildBuilder::default()
            .id(GuildId::new(7))
            .owner_id(UserId::new(100))
            .roles(vec![
                Role::new(RoleId::new(1), "member"),
                Role::new(RoleId::new(2), "moderator"),
                Role::new(RoleId::new(42), "admin"),
            ])
            .build()
            .unwrap()
    }

    fn ctx(user: u64, roles: Vec<RoleId>) -> MockContext {
        let member = MemberBuilder::default()
            .user_id(UserId::new(user))
            .roles(roles)
            .build()
            .unwrap();
        MockContext::in_guild(UserId::new(user), GuildId::new(7))
            .with_guild(guild())
            .with_member(GuildId::new(7), member)
    }

    #[tokio::test]
    async fn matches_by_name() {
        let ctx = ctx(5, vec![RoleId::new(2)]);
        let check = RoleCheck::user("moderator").unwrap();
        assert!(check.evaluate(&ctx).await.unwrap().passed());
    }

    #[tokio::test]
    async fn any_role_from_a_set() {
        let ctx = ctx(5, vec![RoleId::new(1)]);
        let check = RoleCheck::user_any([RoleId::new(42).into(), "member".into()]).unwrap();
        assert!(check.evaluate(&ctx).await.unwrap().passed());
    }

    #[tokio::test]
    async fn bot_is_looked_up_separately() {
        let ctx = ctx(5, vec![RoleId::new(42)]);
        let verdict = RoleCheck::bot(RoleId::new(42)).unwrap().evaluate(&ctx).await.unwrap();
        assert!(!verdict.passed());
        assert_eq!(*verdict.record().kind(), FailureKind::BotMissingRole);
    }

    #[tokio::test]
    async fn dm_fails_without_lookups() {
        let ctx = MockContext::dm(UserId::new(5));
        let verdict = RoleCheck::user(RoleId::new(1)).unwrap().evaluate(&ctx).await.unwrap();
        assert!(!verdict.passed());
        assert_eq!(verdict.record().args()[1], FailureArg::Guild(None));
        assert_eq!(ctx.lookups(), 0);
    }

    #[test]
    fn rejects_empty_configuration() {
        let err = RoleCheck::user_any([]).unwrap_err();
        assert_eq!(err.kind(), &CheckConfigErrorKind::EmptySet("role"));
        let err = RoleCheck::bot("  ").unwrap_err();
        assert!(matches!(err.kind(), CheckConfigErrorKind::InvalidRole(_)));
    }
}
