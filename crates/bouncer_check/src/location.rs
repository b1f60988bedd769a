//! Where a command was invoked, and by whom.

use crate::{Check, Verdict};
use async_trait::async_trait;
use bouncer_core::{
    CategoryId, ChannelId, ExecutionContext, FailureArg, FailureKind, FailureRecord, GuildId,
    UserId,
};
use bouncer_error::{BouncerResult, CheckConfigError, CheckConfigErrorKind};
use tracing::{debug, instrument};

fn non_empty<T>(set: &'static str, ids: impl IntoIterator<Item = T>) -> Result<Vec<T>, CheckConfigError> {
    let ids: Vec<T> = ids.into_iter().collect();
    if ids.is_empty() {
        return Err(CheckConfigError::new(CheckConfigErrorKind::EmptySet(set)));
    }
    Ok(ids)
}

/// The places a [`LocationCheck`] accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Direct messages only
    Dm,
    /// Any of these channels
    Channels(Vec<ChannelId>),
    /// Any of these guilds
    Guilds(Vec<GuildId>),
    /// Any channel in these categories
    Categories(Vec<CategoryId>),
}

/// Passes when the invocation happened in an accepted place.
///
/// Reports `NotInDM()`, or `NotInChannel`/`NotInGuild`/`NotInCategory` with
/// the configured id list.
///
/// # Examples
///
/// ```
/// use bouncer_check::LocationCheck;
/// use bouncer_core::ChannelId;
///
/// let lounges = LocationCheck::in_channels([ChannelId::new(1), ChannelId::new(2)]).unwrap();
/// # let _ = lounges;
/// assert!(LocationCheck::in_channels([]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationCheck {
    location: Location,
}

impl LocationCheck {
    /// Only in direct messages.
    pub fn dm() -> Self {
        Self {
            location: Location::Dm,
        }
    }

    /// Only in `channel`.
    pub fn in_channel(channel: ChannelId) -> Self {
        Self {
            location: Location::Channels(vec![channel]),
        }
    }

    /// Only in one of `channels`.
    pub fn in_channels(
        channels: impl IntoIterator<Item = ChannelId>,
    ) -> Result<Self, CheckConfigError> {
        Ok(Self {
            location: Location::Channels(non_empty("channel", channels)?),
        })
    }

    /// Only in `guild`.
    pub fn in_guild(guild: GuildId) -> Self {
        Self {
            location: Location::Guilds(vec![guild]),
        }
    }

    /// Only in one of `guilds`.
    pub fn in_guilds(guilds: impl IntoIterator<Item = GuildId>) -> Result<Self, CheckConfigError> {
        Ok(Self {
            location: Location::Guilds(non_empty("guild", guilds)?),
        })
    }

    /// Only in channels under `category`.
    pub fn in_category(category: CategoryId) -> Self {
        Self {
            location: Location::Categories(vec![category]),
        }
    }

    /// Only in channels under one of `categories`.
    pub fn in_categories(
        categories: impl IntoIterator<Item = CategoryId>,
    ) -> Result<Self, CheckConfigError> {
        Ok(Self {
            location: Location::Categories(non_empty("category", categories)?),
        })
    }

    /// The accepted places.
    pub fn location(&self) -> &Location {
        &self.location
    }
}

#[async_trait]
impl Check for LocationCheck {
    fn name(&self) -> String {
        match self.location {
            Location::Dm => "in_dm",
            Location::Channels(_) => "in_channel",
            Location::Guilds(_) => "in_guild",
            Location::Categories(_) => "in_category",
        }
        .to_string()
    }

    #[instrument(skip_all, fields(check = "location"))]
    async fn evaluate(&self, ctx: &dyn ExecutionContext) -> BouncerResult<Verdict> {
        let (passed, record) = match &self.location {
            Location::Dm => (
                ctx.is_dm(),
                FailureRecord::new(FailureKind::NotInDm, Vec::new()),
            ),
            Location::Channels(ids) => (
                ctx.channel_id().is_some_and(|id| ids.contains(&id)),
                FailureRecord::new(FailureKind::NotInChannel, vec![FailureArg::Channels(ids.clone())]),
            ),
            Location::Guilds(ids) => (
                ctx.guild_id().is_some_and(|id| ids.contains(&id)),
                FailureRecord::new(FailureKind::NotInGuild, vec![FailureArg::Guilds(ids.clone())]),
            ),
            Location::Categories(ids) => (
                ctx.category_id().is_some_and(|id| ids.contains(&id)),
                FailureRecord::new(
                    FailureKind::NotInCategory,
                    vec![FailureArg::Categories(ids.clone())],
                ),
            ),
        };
        debug!(passed, "Evaluated location");
        Ok(Verdict::new(passed, record))
    }
}

/// Passes when the invoking user is on an allow-list.
///
/// Reports `IsNotUser([ids])`; negate it for a block-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCheck {
    users: Vec<UserId>,
}

impl UserCheck {
    /// Only `user` may invoke.
    pub fn user(user: UserId) -> Self {
        Self { users: vec![user] }
    }

    /// Only one of `users` may invoke.
    pub fn users(users: impl IntoIterator<Item = UserId>) -> Result<Self, CheckConfigError> {
        Ok(Self {
            users: non_empty("user", users)?,
        })
    }
}

#[async_trait]
impl Check for UserCheck {
    fn name(&self) -> String {
        "is_user".to_string()
    }

    #[instrument(skip_all, fields(check = "user"))]
    async fn evaluate(&self, ctx: &dyn ExecutionContext) -> BouncerResult<Verdict> {
        let passed = self.users.contains(ctx.actor().id());
        debug!(passed, "Evaluated user allow-list");
        Ok(Verdict::new(
            passed,
            FailureRecord::new(FailureKind::IsNotUser, vec![FailureArg::Users(self.users.clone())]),
        ))
    }
}
