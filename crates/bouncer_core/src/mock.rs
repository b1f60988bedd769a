//! An in-memory execution context.

use crate::{
    Actor, CategoryId, Channel, ChannelId, CommandInfo, ExecutionContext, Guild,
    GuildId, Member, Message, PermissionSet, UserId,
};
use async_trait::async_trait;
use bouncer_error::{BouncerResult, ContextError, ContextErrorKind};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

/// An [`ExecutionContext`] backed by plain maps.
///
/// Records every response and delivery, and counts host lookups so tests can
/// assert that short-circuiting skipped work.
///
/// # Examples
///
/// ```
/// use bouncer_core::{ExecutionContext, GuildId, MockContext, UserId};
///
/// let ctx = MockContext::in_guild(UserId::new(1), GuildId::new(7));
/// assert!(!ctx.is_dm());
/// assert_eq!(ctx.guild_id(), Some(GuildId::new(7)));
/// ```
#[derive(Debug)]
pub struct MockContext {
    actor: Actor,
    bot_id: UserId,
    guild_id: Option<GuildId>,
    channel_id: Option<ChannelId>,
    category_id: Option<CategoryId>,
    command: CommandInfo,
    now: DateTime<Utc>,
    guilds: HashMap<GuildId, Guild>,
    members: HashMap<(GuildId, UserId), Member>,
    channels: HashMap<ChannelId, Channel>,
    channel_permissions: HashMap<(ChannelId, UserId), PermissionSet>,
    guild_permissions: HashMap<(GuildId, UserId), PermissionSet>,
    owners: HashSet<UserId>,
    failing_channels: HashSet<ChannelId>,
    fail_lookups: bool,
    lookups: AtomicUsize,
    responses: Mutex<Vec<Message>>,
    deliveries: Mutex<Vec<(ChannelId, Message)>>,
}

/// Bot account id used by the constructors.
const MOCK_BOT_ID: UserId = UserId::new(999);

impl MockContext {
    /// A direct-message invocation by `user`.
    pub fn dm(user: UserId) -> Self {
        Self {
            actor: Actor::new(user, format!("user{user}")),
            bot_id: MOCK_BOT_ID,
            guild_id: None,
            channel_id: Some(ChannelId::new(1)),
            category_id: None,
            command: CommandInfo::new("test", "test_command"),
            now: Utc::now(),
            guilds: HashMap::new(),
            members: HashMap::new(),
            channels: HashMap::new(),
            channel_permissions: HashMap::new(),
            guild_permissions: HashMap::new(),
            owners: HashSet::new(),
            failing_channels: HashSet::new(),
            fail_lookups: false,
            lookups: AtomicUsize::new(0),
            responses: Mutex::new(Vec::new()),
            deliveries: Mutex::new(Vec::new()),
        }
    }

    /// A guild invocation by `user` in channel 1 of `guild`.
    pub fn in_guild(user: UserId, guild: GuildId) -> Self {
        Self {
            guild_id: Some(guild),
            ..Self::dm(user)
        }
    }

    /// Replace the invoking actor.
    pub fn with_actor(mut self, actor: Actor) -> Self {
        self.actor = actor;
        self
    }

    /// Set the actor's display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.actor = self.actor.with_display_name(name);
        self
    }

    /// Set when the actor joined the invoking guild.
    pub fn with_joined_at(mut self, joined_at: DateTime<Utc>) -> Self {
        self.actor = self.actor.with_joined_at(joined_at);
        self
    }

    /// Set the invoking channel.
    pub fn with_channel_id(mut self, channel: ChannelId) -> Self {
        self.channel_id = Some(channel);
        self
    }

    /// Set the invoking channel's category.
    pub fn with_category_id(mut self, category: CategoryId) -> Self {
        self.category_id = Some(category);
        self
    }

    /// Set the command being invoked.
    pub fn with_command(mut self, command: CommandInfo) -> Self {
        self.command = command;
        self
    }

    /// Pin the clock.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Make a guild visible.
    pub fn with_guild(mut self, guild: Guild) -> Self {
        self.guilds.insert(*guild.id(), guild);
        self
    }

    /// Make a member visible in `guild`.
    pub fn with_member(mut self, guild: GuildId, member: Member) -> Self {
        self.members.insert((guild, *member.user_id()), member);
        self
    }

    /// Make a channel visible.
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channels.insert(*channel.id(), channel);
        self
    }

    /// Grant `user` a permission set in `channel`.
    pub fn with_channel_permissions(
        mut self,
        channel: ChannelId,
        user: UserId,
        permissions: PermissionSet,
    ) -> Self {
        self.channel_permissions.insert((channel, user), permissions);
        self
    }

    /// Grant `user` a permission set in `guild`.
    pub fn with_guild_permissions(
        mut self,
        guild: GuildId,
        user: UserId,
        permissions: PermissionSet,
    ) -> Self {
        self.guild_permissions.insert((guild, user), permissions);
        self
    }

    /// Mark `user` as a bot owner.
    pub fn with_owner(mut self, user: UserId) -> Self {
        self.owners.insert(user);
        self
    }

    /// Make deliveries to `channel` fail.
    pub fn with_failing_channel(mut self, channel: ChannelId) -> Self {
        self.failing_channels.insert(channel);
        self
    }

    /// Make every lookup fail with a host error.
    pub fn with_failing_lookups(mut self) -> Self {
        self.fail_lookups = true;
        self
    }

    /// Number of host lookups performed so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Messages sent to the invoking actor, in order.
    pub fn responses(&self) -> Vec<Message> {
        self.responses.lock().clone()
    }

    /// Messages delivered to other channels, in order.
    pub fn deliveries(&self) -> Vec<(ChannelId, Message)> {
        self.deliveries.lock().clone()
    }

    #[track_caller]
    fn lookup(&self, what: &str) -> BouncerResult<()> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookups {
            return Err(ContextError::new(ContextErrorKind::Lookup(what.to_string())).into());
        }
        Ok(())
    }
}

#[async_trait]
impl ExecutionContext for MockContext {
    fn actor(&self) -> &Actor {
        &self.actor
    }

    fn bot_id(&self) -> UserId {
        self.bot_id
    }

    fn guild_id(&self) -> Option<GuildId> {
        self.guild_id
    }

    fn channel_id(&self) -> Option<ChannelId> {
        self.channel_id
    }

    fn category_id(&self) -> Option<CategoryId> {
        self.category_id
    }

    fn command(&self) -> &CommandInfo {
        &self.command
    }

    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    async fn guild(&self, id: GuildId) -> BouncerResult<Option<Guild>> {
        self.lookup("guild")?;
        Ok(self.guilds.get(&id).cloned())
    }

    async fn member(&self, guild: GuildId, user: UserId) -> BouncerResult<Option<Member>> {
        self.lookup("member")?;
        Ok(self.members.get(&(guild, user)).cloned())
    }

    async fn channel(&self, id: ChannelId) -> BouncerResult<Option<Channel>> {
        self.lookup("channel")?;
        Ok(self.channels.get(&id).cloned())
    }

    async fn channel_permissions(
        &self,
        channel: ChannelId,
        user: UserId,
    ) -> BouncerResult<Option<PermissionSet>> {
        self.lookup("channel permissions")?;
        Ok(self.channel_permissions.get(&(channel, user)).cloned())
    }

    async fn guild_permissions(
        &self,
        guild: GuildId,
        user: UserId,
    ) -> BouncerResult<Option<PermissionSet>> {
        self.lookup("guild permissions")?;
        Ok(self.guild_permissions.get(&(guild, user)).cloned())
    }

    async fn is_bot_owner(&self, user: UserId) -> BouncerResult<bool> {
        self.lookup("application owners")?;
        Ok(self.owners.contains(&user))
    }

    async fn respond(&self, message: Message) -> BouncerResult<()> {
        self.responses.lock().push(message);
        Ok(())
    }

    async fn deliver(&self, channel: ChannelId, message: Message) -> BouncerResult<()> {
        if self.failing_channels.contains(&channel) {
            return Err(ContextError::new(ContextErrorKind::Delivery(format!(
                "channel {channel} is unreachable"
            )))
            .into());
        }
        self.deliveries.lock().push((channel, message));
        Ok(())
    }
}
