//! The check abstraction and its results.

use crate::{All, Any, Not};
use async_trait::async_trait;
use bouncer_core::{CommandError, ExecutionContext, FailureRecord, UserId};
use bouncer_error::BouncerResult;
use std::sync::Arc;
use tracing::{debug, instrument};

/// The result of evaluating a check.
///
/// A verdict always carries a record, even when the check passed: it is what
/// the check would have reported had it failed, which is what [`Not`] needs to
/// explain itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    passed: bool,
    record: FailureRecord,
}

impl Verdict {
    /// Create a verdict.
    pub fn new(passed: bool, record: FailureRecord) -> Self {
        Self { passed, record }
    }

    /// A passing verdict.
    pub fn pass(record: FailureRecord) -> Self {
        Self::new(true, record)
    }

    /// A failing verdict.
    pub fn fail(record: FailureRecord) -> Self {
        Self::new(false, record)
    }

    /// Whether the check passed.
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// The failure record the check reports.
    pub fn record(&self) -> &FailureRecord {
        &self.record
    }

    /// The logical negation, reported under the inverse kind.
    pub fn negate(self) -> Self {
        let kind = self.record.kind().inverse();
        Self {
            passed: !self.passed,
            record: self.record.with_kind(kind),
        }
    }

    /// Drop the record of a passing verdict.
    pub fn into_outcome(self) -> Outcome {
        if self.passed {
            Outcome::Passed
        } else {
            Outcome::Failed(self.record)
        }
    }
}

/// What a host sees after running a check.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Access granted
    Passed,
    /// Access denied, with the reason
    Failed(FailureRecord),
}

impl Outcome {
    /// Whether access was granted.
    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }
}

impl From<Verdict> for Outcome {
    fn from(verdict: Verdict) -> Self {
        verdict.into_outcome()
    }
}

/// Whose roles or permissions a check inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Subject {
    /// The invoking user
    User,
    /// The bot itself
    Bot,
}

impl Subject {
    /// The account id this subject refers to in `ctx`.
    pub fn id(self, ctx: &dyn ExecutionContext) -> UserId {
        match self {
            Subject::User => *ctx.actor().id(),
            Subject::Bot => ctx.bot_id(),
        }
    }
}

/// A unit of authorization logic.
///
/// Checks are built once, hold only static configuration, and are evaluated
/// against a fresh [`ExecutionContext`] per invocation. Evaluation never
/// mutates the context.
///
/// `Err` is reserved for host failures (a lookup that errored). A denial is an
/// `Ok` verdict that did not pass.
///
/// # Examples
///
/// ```
/// use bouncer_check::{Check, CheckExt, LocationCheck};
/// use bouncer_core::{MockContext, UserId};
///
/// # let rt = tokio::runtime::Runtime::new().unwrap();
/// # rt.block_on(async {
/// let check = LocationCheck::dm().not();
/// let ctx = MockContext::dm(UserId::new(1));
///
/// let verdict = check.evaluate(&ctx).await.unwrap();
/// assert!(!verdict.passed());
/// assert_eq!(verdict.record().to_string(), "InDM()");
/// # });
/// ```
#[async_trait]
pub trait Check: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> String;

    /// Evaluate the check against an invocation.
    async fn evaluate(&self, ctx: &dyn ExecutionContext) -> BouncerResult<Verdict>;

    /// Evaluate and keep only what a host needs.
    async fn outcome(&self, ctx: &dyn ExecutionContext) -> BouncerResult<Outcome> {
        Ok(self.evaluate(ctx).await?.into_outcome())
    }
}

/// A shared, type-erased check.
pub type BoxedCheck = Arc<dyn Check>;

#[async_trait]
impl<C: Check + ?Sized> Check for Arc<C> {
    fn name(&self) -> String {
        (**self).name()
    }

    async fn evaluate(&self, ctx: &dyn ExecutionContext) -> BouncerResult<Verdict> {
        (**self).evaluate(ctx).await
    }
}

#[async_trait]
impl<C: Check + ?Sized> Check for Box<C> {
    fn name(&self) -> String {
        (**self).name()
    }

    async fn evaluate(&self, ctx: &dyn ExecutionContext) -> BouncerResult<Verdict> {
        (**self).evaluate(ctx).await
    }
}

/// Fluent composition for every check.
///
/// # Examples
///
/// ```
/// use bouncer_check::{Check, CheckExt, LocationCheck, OwnerCheck};
/// use bouncer_core::GuildId;
///
/// let check = LocationCheck::in_guild(GuildId::new(7))
///     .and(OwnerCheck::guild_owner())
///     .or(OwnerCheck::bot_owner());
/// assert_eq!(check.name(), "any(all(in_guild, is_guild_owner), is_bot_owner)");
/// ```
pub trait CheckExt: Check + Sized + 'static {
    /// Negate this check.
    fn not(self) -> Not {
        Not::new(self)
    }

    /// Require both this check and `other`.
    fn and(self, other: impl Check + 'static) -> All {
        All::new([self.boxed(), other.boxed()])
    }

    /// Require this check or `other`.
    fn or(self, other: impl Check + 'static) -> Any {
        Any::new([self.boxed(), other.boxed()])
    }

    /// Erase the concrete type.
    fn boxed(self) -> BoxedCheck {
        Arc::new(self)
    }
}

impl<C: Check + Sized + 'static> CheckExt for C {}

/// Run a check before a command body.
///
/// Denials become [`CommandError::Check`] and host failures become
/// [`CommandError::Unexpected`], ready for the dispatcher.
///
/// # Examples
///
/// ```
/// use bouncer_check::{guard, LocationCheck};
/// use bouncer_core::{CommandError, MockContext, UserId, GuildId};
///
/// # let rt = tokio::runtime::Runtime::new().unwrap();
/// # rt.block_on(async {
/// let ctx = MockContext::in_guild(UserId::new(1), GuildId::new(2));
/// let err = guard(&LocationCheck::dm(), &ctx).await.unwrap_err();
/// assert!(matches!(err, CommandError::Check(_)));
/// # });
/// ```
#[instrument(skip_all, fields(check = %check.name(), command = %ctx.command().id()))]
pub async fn guard(check: &dyn Check, ctx: &dyn ExecutionContext) -> Result<(), CommandError> {
    match check.evaluate(ctx).await?.into_outcome() {
        Outcome::Passed => {
            debug!("Check passed");
            Ok(())
        }
        Outcome::Failed(record) => {
            debug!(%record, "Check denied access");
            Err(CommandError::Check(record))
        }
    }
}
