//! Ownership checks.

use crate::{Check, Verdict};
use async_trait::async_trait;
use bouncer_core::{ExecutionContext, FailureArg, FailureKind, FailureRecord, GuildId};
use bouncer_error::BouncerResult;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Owned {
    Bot,
    Guild(Option<GuildId>),
}

/// Passes when the invoking user owns the bot or a guild.
///
/// Bot ownership includes membership of the team owning the application, as
/// reported by the host. Reports `IsNotBotOwner()` or `IsNotGuildOwner(guild)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerCheck {
    owned: Owned,
}

impl OwnerCheck {
    /// The invoking user must own the bot.
    pub fn bot_owner() -> Self {
        Self { owned: Owned::Bot }
    }

    /// The invoking user must own the invoking guild.
    pub fn guild_owner() -> Self {
        Self {
            owned: Owned::Guild(None),
        }
    }

    /// The invoking user must own `guild`.
    pub fn owner_of(guild: GuildId) -> Self {
        Self {
            owned: Owned::Guild(Some(guild)),
        }
    }
}

#[async_trait]
impl Check for OwnerCheck {
    fn name(&self) -> String {
        match self.owned {
            Owned::Bot => "is_bot_owner",
            Owned::Guild(_) => "is_guild_owner",
        }
        .to_string()
    }

    #[instrument(skip_all, fields(check = "owner"))]
    async fn evaluate(&self, ctx: &dyn ExecutionContext) -> BouncerResult<Verdict> {
        let actor = *ctx.actor().id();
        let verdict = match self.owned {
            Owned::Bot => Verdict::new(
                ctx.is_bot_owner(actor).await?,
                FailureRecord::new(FailureKind::IsNotBotOwner, Vec::new()),
            ),
            Owned::Guild(explicit) => {
                let target = explicit.or(ctx.guild_id());
                let owner = match target {
                    Some(guild) => ctx.guild(guild).await?.map(|guild| *guild.owner_id()),
                    None => None,
                };
                Verdict::new(
                    owner == Some(actor),
                    FailureRecord::new(FailureKind::IsNotGuildOwner, vec![FailureArg::Guild(target)]),
                )
            }
        };
        debug!(passed = verdict.passed(), "Evaluated ownership");
        Ok(verdict)
    }
}
