//! Bouncer - composable command checks and error dispatch for chat bots
//!
//! Guard commands with checks that explain themselves, then turn every failure
//! into a message for the user and every crash into a diagnostic for the
//! operators.
//!
//! # Quick Start
//!
//! ```
//! use bouncer::{guard, CheckExt, ErrorDispatcher, LocationCheck, RoleCheck, UserId};
//! # use bouncer_core::MockContext;
//!
//! # let rt = tokio::runtime::Runtime::new().unwrap();
//! # rt.block_on(async {
//! let check = LocationCheck::dm().not().and(RoleCheck::user("moderator").unwrap());
//! let dispatcher = ErrorDispatcher::default();
//!
//! let ctx = MockContext::dm(UserId::new(1));
//! if let Err(err) = guard(&check, &ctx).await {
//!     dispatcher.handle(&ctx, err).await;
//! }
//! assert_eq!(ctx.responses().len(), 1);
//! # });
//! ```
//!
//! # Architecture
//!
//! - `bouncer_error` - Error types
//! - `bouncer_core` - Ids, entities, the failure taxonomy and the execution context
//! - `bouncer_check` - Checks and combinators
//! - `bouncer_dispatch` - Formatters, diagnostics and escalation
//!
//! This crate re-exports everything for convenience.
//!
//! # Cargo Features
//!
//! - `mock` - re-export the in-memory `MockContext`

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod telemetry;

pub use telemetry::{init_tracing, init_tracing_with, DEFAULT_FILTER};

pub use bouncer_error::{
    BouncerError, BouncerErrorKind, BouncerResult, CheckConfigError, CheckConfigErrorKind,
    ConfigError, ConfigErrorKind, ContextError, ContextErrorKind,
};

pub use bouncer_core::{
    Actor, ActorBuilder, Attachment, CategoryId, Channel, ChannelBuilder, ChannelId, CommandError,
    CommandId, CommandInfo, Embed, EmbedBuilder, EmbedField, ExecutionContext, FailureArg,
    FailureKind, FailureRecord, FileAttachment, Guild, GuildBuilder, GuildId, Member,
    MemberBuilder, Message, Permission, PermissionSet, Role, RoleId, RoleRef, UnexpectedError,
    UserId, NEGATIVE_COLOR,
};

#[cfg(feature = "mock")]
pub use bouncer_core::MockContext;

pub use bouncer_check::{
    guard, All, And, Any, BoxedCheck, ChannelPermissionCheck, Check, CheckExt, CustomCheck,
    GuildPermissionCheck, Location, LocationCheck, MembershipCheck, NameTest, Not, NsfwCheck,
    Or, Outcome, OwnerCheck, Predicate, RoleCheck, Subject, TimeUnit, UserCheck, UsernameCheck,
    Verdict,
};

pub use bouncer_dispatch::{
    render_attachment, uptime, DefaultFormatter, DiagnosticReport, DispatchConfig,
    DispatchConfigBuilder, DispatchRegistry, ErrorDispatcher, EscalationSink, Formatter, Rule,
    RuleFormatter, FENCE_OVERHEAD, GENERIC_MESSAGE, MIN_MESSAGE_LEN, TRUNCATION_MARKER,
};
