//! Failure rendering and error escalation for Bouncer.
//!
//! An [`ErrorDispatcher`] receives every [`CommandError`](bouncer_core::CommandError)
//! a guarded command raises:
//!
//! - Check failures are rendered by a [`Formatter`] and sent to the actor.
//! - Unexpected errors get a notice for the actor, and a size-bounded
//!   [`DiagnosticReport`] plus any attached items go to each
//!   [`EscalationSink`].
//!
//! [`DispatchRegistry`] picks a dispatcher per command id.
//!
//! # Configuration
//!
//! [`DispatchConfig::load`] reads the bundled defaults, then
//! `~/.config/bouncer/bouncer.toml`, then `./bouncer.toml`:
//!
//! ```toml
//! max_message_len = 4096
//! delivery_delay_ms = 100
//!
//! [[escalation]]
//! channel = 123456789012345678
//! notify = [234567890123456789]
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod diagnostic;
mod dispatcher;
mod formatter;
mod registry;

pub use config::{DispatchConfig, DispatchConfigBuilder, EscalationSink, MIN_MESSAGE_LEN};
pub use diagnostic::{render_attachment, DiagnosticReport, FENCE_OVERHEAD, TRUNCATION_MARKER};
pub use dispatcher::ErrorDispatcher;
pub use formatter::{uptime, DefaultFormatter, Formatter, Rule, RuleFormatter, GENERIC_MESSAGE};
pub use registry::DispatchRegistry;
