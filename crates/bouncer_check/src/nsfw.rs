//! Age-restricted channel checks.

use crate::{Check, Verdict};
use async_trait::async_trait;
use bouncer_core::{ChannelId, ExecutionContext, FailureArg, FailureKind, FailureRecord};
use bouncer_error::BouncerResult;
use tracing::{debug, instrument};

/// Passes when the channel is marked NSFW.
///
/// Direct messages always count as NSFW. Reports `ChannelIsNotNSFW(channel)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NsfwCheck {
    channel: Option<ChannelId>,
}

impl NsfwCheck {
    /// Inspect the invoking channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect `channel` instead of the invoking channel.
    pub fn in_channel(channel: ChannelId) -> Self {
        Self {
            channel: Some(channel),
        }
    }
}

#[async_trait]
impl Check for NsfwCheck {
    fn name(&self) -> String {
        "channel_is_nsfw".to_string()
    }

    #[instrument(skip_all, fields(check = "nsfw"))]
    async fn evaluate(&self, ctx: &dyn ExecutionContext) -> BouncerResult<Verdict> {
        let target = self.channel.or(ctx.channel_id());
        let record = FailureRecord::new(FailureKind::ChannelIsNotNsfw, vec![FailureArg::Channel(target)]);
        if ctx.is_dm() {
            debug!("Direct messages are unrestricted");
            return Ok(Verdict::pass(record));
        }
        let nsfw = match target {
            Some(channel) => ctx
                .channel(channel)
                .await?
                .is_some_and(|channel| *channel.nsfw()),
            None => false,
        };
        debug!(nsfw, "Evaluated channel restriction");
        Ok(Verdict::new(nsfw, record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bouncer_core::{ChannelBuilder, GuildId, MockContext, UserId};

    #[tokio::test]
    async fn dms_are_always_nsfw() {
        let ctx = MockContext::dm(UserId::new(1));
        assert!(NsfwCheck::new().evaluate(&ctx).await.unwrap().passed());
        assert_eq!(ctx.lookups(), 0);
    }

    #[tokio::test]
    async fn reads_the_channel_flag() {
        let channel = ChannelBuilder::default()
            .id(ChannelId::new(1))
            .guild_id(GuildId::new(2))
            .nsfw(true)
            .build()
            .unwrap();
        let ctx = MockContext::in_guild(UserId::new(1), GuildId::new(2)).with_channel(channel);
        assert!(NsfwCheck::new().evaluate(&ctx).await.unwrap().passed());

        let verdict = NsfwCheck::in_channel(ChannelId::new(9)).evaluate(&ctx).await.unwrap();
        assert!(!verdict.passed());
        assert_eq!(verdict.record().to_string(), "ChannelIsNotNSFW(9)");
    }
}
