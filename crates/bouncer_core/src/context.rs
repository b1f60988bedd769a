//! The execution context boundary.

use crate::{
    Actor, CategoryId, Channel, ChannelId, CommandInfo, Guild, GuildId, Member, Message,
    PermissionSet, UserId,
};
use async_trait::async_trait;
use bouncer_error::BouncerResult;
use chrono::{DateTime, Utc};

/// Everything checks and the dispatcher need to know about one command invocation.
///
/// Hosts implement this once per platform (message commands and slash
/// interactions share one adapter) and construct a fresh value per invocation.
/// Implementations must not change what they report during an invocation.
///
/// Lookups return `Ok(None)` when the entity simply does not exist or is not
/// visible, and `Err` only when the host itself failed. Checks treat the former
/// as a denial and propagate the latter as an unexpected error.
///
/// # Example Implementation
///
/// ```rust,ignore
/// struct SerenityContext { /* ... */ }
///
/// #[async_trait]
/// impl ExecutionContext for SerenityContext {
///     fn actor(&self) -> &Actor {
///         &self.actor
///     }
///
///     async fn member(&self, guild: GuildId, user: UserId) -> BouncerResult<Option<Member>> {
///         let cached = self.cache.member(guild.get(), user.get());
///         Ok(cached.map(to_member))
///     }
///
///     // ...
/// }
/// ```
#[async_trait]
pub trait ExecutionContext: Send + Sync {
    /// The invoking account.
    fn actor(&self) -> &Actor;

    /// The bot's own account.
    fn bot_id(&self) -> UserId;

    /// The invoking guild, `None` in DMs.
    fn guild_id(&self) -> Option<GuildId>;

    /// The invoking channel, if known.
    fn channel_id(&self) -> Option<ChannelId>;

    /// The category of the invoking channel, if any.
    fn category_id(&self) -> Option<CategoryId>;

    /// The command being invoked.
    fn command(&self) -> &CommandInfo;

    /// Current UTC time.
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    /// Whether the command was invoked in a direct message.
    fn is_dm(&self) -> bool {
        self.guild_id().is_none()
    }

    /// Look up a guild.
    async fn guild(&self, id: GuildId) -> BouncerResult<Option<Guild>>;

    /// Look up a guild member.
    async fn member(&self, guild: GuildId, user: UserId) -> BouncerResult<Option<Member>>;

    /// Look up a channel.
    async fn channel(&self, id: ChannelId) -> BouncerResult<Option<Channel>>;

    /// Effective permissions of `user` in `channel`, after overwrites.
    async fn channel_permissions(
        &self,
        channel: ChannelId,
        user: UserId,
    ) -> BouncerResult<Option<PermissionSet>>;

    /// Guild-level permissions of `user`.
    async fn guild_permissions(
        &self,
        guild: GuildId,
        user: UserId,
    ) -> BouncerResult<Option<PermissionSet>>;

    /// Whether `user` owns (or is on the team owning) the bot application.
    async fn is_bot_owner(&self, user: UserId) -> BouncerResult<bool>;

    /// Send a response to the invoking actor.
    ///
    /// Adapters for interactions pick between the initial response and a
    /// follow-up themselves.
    async fn respond(&self, message: Message) -> BouncerResult<()>;

    /// Send a message to an arbitrary channel.
    async fn deliver(&self, channel: ChannelId, message: Message) -> BouncerResult<()>;
}
