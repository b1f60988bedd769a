//! Composable authorization checks for chat-bot commands.
//!
//! A [`Check`] evaluates one invocation's [`ExecutionContext`](bouncer_core::ExecutionContext)
//! and returns a [`Verdict`]: pass or fail, plus the
//! [`FailureRecord`](bouncer_core::FailureRecord) explaining it.
//!
//! # Checks
//!
//! - [`RoleCheck`] - the user or bot holds a role
//! - [`ChannelPermissionCheck`] / [`GuildPermissionCheck`] - permission flags match
//! - [`MembershipCheck`] - how long the actor has been in the guild
//! - [`LocationCheck`] - DM, channel, guild or category
//! - [`UserCheck`] - the actor is on an allow-list
//! - [`OwnerCheck`] - the actor owns the bot or the guild
//! - [`NsfwCheck`] - the channel is age-restricted
//! - [`UsernameCheck`] - the display name satisfies a rule
//! - [`CustomCheck`] - any async predicate
//!
//! # Combinators
//!
//! [`Not`], [`Any`] and [`All`] compose checks, also available fluently through
//! [`CheckExt`]. A negated check reports the inverse failure kind with the
//! same arguments; `All` reports its first failing child; `Any` reports
//! `Generic`.
//!
//! # Example
//!
//! ```
//! use bouncer_check::{guard, CheckExt, LocationCheck, MembershipCheck, RoleCheck, TimeUnit};
//! use bouncer_core::{CommandError, FailureKind, MockContext, UserId};
//!
//! # let rt = tokio::runtime::Runtime::new().unwrap();
//! # rt.block_on(async {
//! let check = LocationCheck::dm()
//!     .not()
//!     .and(MembershipCheck::new(TimeUnit::Days).at_least(7.0).unwrap())
//!     .or(RoleCheck::user("moderator").unwrap());
//!
//! let ctx = MockContext::dm(UserId::new(1));
//! match guard(&check, &ctx).await {
//!     Err(CommandError::Check(record)) => assert_eq!(*record.kind(), FailureKind::Generic),
//!     other => panic!("unexpected: {other:?}"),
//! }
//! # });
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod check;
mod combinator;
mod custom;
mod location;
mod membership;
mod nsfw;
mod owner;
mod permission;
mod role;
mod username;

pub use check::{guard, BoxedCheck, Check, CheckExt, Outcome, Subject, Verdict};
pub use combinator::{All, And, Any, Not, Or};
pub use custom::{CustomCheck, Predicate};
pub use location::{Location, LocationCheck, UserCheck};
pub use membership::{MembershipCheck, TimeUnit};
pub use nsfw::NsfwCheck;
pub use owner::OwnerCheck;
pub use permission::{ChannelPermissionCheck, GuildPermissionCheck};
pub use role::RoleCheck;
pub use username::{NameTest, UsernameCheck};
