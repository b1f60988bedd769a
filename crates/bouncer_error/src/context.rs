//! Errors raised by the host through an execution context.

/// Host-side failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ContextErrorKind {
    /// An entity lookup (guild, member, channel, permissions) failed outright.
    ///
    /// A lookup that merely finds nothing is not an error.
    #[display("Lookup failed: {}", _0)]
    Lookup(String),

    /// A message could not be delivered.
    #[display("Delivery failed: {}", _0)]
    Delivery(String),

    /// A host predicate (custom check) raised an error.
    #[display("Predicate failed: {}", _0)]
    Predicate(String),
}

/// Execution context error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Context Error: {} at line {} in {}", kind, line, file)]
pub struct ContextError {
    kind: ContextErrorKind,
    line: u32,
    file: &'static str,
}

impl ContextError {
    /// Create a new context error with caller location tracking.
    #[track_caller]
    pub fn new(kind: ContextErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ContextErrorKind {
        &self.kind
    }
}
