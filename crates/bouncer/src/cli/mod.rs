//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the bouncer binary.

mod commands;
mod handlers;

pub use commands::{Cli, Commands};
pub use handlers::{list_kinds, render_kind, show_config};
