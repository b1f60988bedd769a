//! Error types for the Bouncer library.
//!
//! This crate provides the foundation error types used throughout the Bouncer workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! Authorization failures are *not* errors. A check that denies access returns
//! a verdict; the types here cover misconfiguration and host-side faults.
//!
//! # Examples
//!
//! ```
//! use bouncer_error::{BouncerResult, ContextError, ContextErrorKind};
//!
//! fn fetch_guild() -> BouncerResult<String> {
//!     Err(ContextError::new(ContextErrorKind::Lookup("guild 42".to_string())))?
//! }
//!
//! assert!(fetch_guild().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod check_config;
mod config;
mod context;
mod error;

pub use check_config::{CheckConfigError, CheckConfigErrorKind};
pub use config::{ConfigError, ConfigErrorKind};
pub use context::{ContextError, ContextErrorKind};
pub use error::{BouncerError, BouncerErrorKind, BouncerResult};
