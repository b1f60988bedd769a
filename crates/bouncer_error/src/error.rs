//! Top-level error wrapper types.

use crate::{CheckConfigError, ConfigError, ContextError};

/// The foundation error enum for the workspace.
///
/// # Examples
///
/// ```
/// use bouncer_error::{BouncerError, ConfigError, ConfigErrorKind};
///
/// let err: BouncerError = ConfigError::new(ConfigErrorKind::Build("missing sink".into())).into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum BouncerErrorKind {
    /// Check construction error
    #[from(CheckConfigError)]
    CheckConfig(CheckConfigError),
    /// Dispatcher configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Host execution context error
    #[from(ContextError)]
    Context(ContextError),
}

/// Bouncer error with kind discrimination.
///
/// # Examples
///
/// ```
/// use bouncer_error::{BouncerResult, CheckConfigError, CheckConfigErrorKind};
///
/// fn build() -> BouncerResult<()> {
///     Err(CheckConfigError::new(CheckConfigErrorKind::EmptySet("channel")))?
/// }
///
/// assert!(build().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Bouncer Error: {}", _0)]
pub struct BouncerError(Box<BouncerErrorKind>);

impl BouncerError {
    /// Create a new error from a kind.
    pub fn new(kind: BouncerErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &BouncerErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to BouncerErrorKind
impl<T> From<T> for BouncerError
where
    T: Into<BouncerErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Bouncer operations.
pub type BouncerResult<T> = std::result::Result<T, BouncerError>;
