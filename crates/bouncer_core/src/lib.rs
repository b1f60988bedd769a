//! Core data types for the Bouncer command check library.
//!
//! This crate provides the vocabulary shared by checks and the error dispatcher:
//!
//! - Snowflake identifiers and the entities a host can look up
//! - The closed [`FailureKind`] taxonomy and its reverse mapping
//! - [`FailureRecord`], the positional explanation a failed check produces
//! - Outgoing [`Message`]s and supplementary [`Attachment`]s
//! - The [`ExecutionContext`] boundary a host implements per invocation
//! - [`CommandError`], the single input the dispatcher accepts

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod command_error;
mod context;
mod entity;
mod failure;
mod ids;
mod message;
#[cfg(feature = "mock")]
mod mock;
mod permission;
mod taxonomy;

pub use command_error::{CommandError, UnexpectedError};
pub use context::ExecutionContext;
pub use entity::{
    Actor, ActorBuilder, Channel, ChannelBuilder, CommandInfo, Guild, GuildBuilder, Member,
    MemberBuilder, Role,
};
pub use failure::{FailureArg, FailureRecord, RoleRef};
pub use ids::{CategoryId, ChannelId, CommandId, GuildId, RoleId, UserId};
pub use message::{Attachment, Embed, EmbedBuilder, EmbedField, FileAttachment, Message, NEGATIVE_COLOR};
#[cfg(feature = "mock")]
pub use mock::MockContext;
pub use permission::{Permission, PermissionSet};
pub use taxonomy::FailureKind;
