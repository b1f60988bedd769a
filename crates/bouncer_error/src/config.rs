//! Dispatcher configuration errors.

/// Ways a dispatcher configuration can be unusable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ConfigErrorKind {
    /// The message size cannot hold a diagnostic.
    #[display("max_message_len must be at least {}, got {}", minimum, actual)]
    MessageTooSmall {
        /// Smallest accepted size
        minimum: usize,
        /// Size that was configured
        actual: usize,
    },

    /// A configuration file could not be read.
    #[display("Failed to read configuration from {}: {}", path, reason)]
    Read {
        /// File that was requested
        path: String,
        /// What went wrong
        reason: String,
    },

    /// The layered sources could not be merged.
    #[display("Failed to build configuration: {}", _0)]
    Build(String),

    /// The merged sources did not describe a configuration.
    #[display("Failed to parse configuration: {}", _0)]
    Parse(String),
}

/// Configuration error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    kind: ConfigErrorKind,
    line: u32,
    file: &'static str,
}

impl ConfigError {
    /// Create a new configuration error with caller location tracking.
    ///
    /// # Examples
    ///
    /// ```
    /// use bouncer_error::{ConfigError, ConfigErrorKind};
    ///
    /// let err = ConfigError::new(ConfigErrorKind::Parse("escalation must be a list".into()));
    /// assert!(err.to_string().starts_with("Configuration Error: Failed to parse"));
    /// assert!(matches!(err.kind(), ConfigErrorKind::Parse(_)));
    /// ```
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ConfigErrorKind {
        &self.kind
    }
}
