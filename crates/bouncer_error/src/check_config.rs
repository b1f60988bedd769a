//! Construction-time check configuration errors.

/// Specific check configuration conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum CheckConfigErrorKind {
    /// One or more permission flag names are not recognised.
    #[display("Invalid permission(s): {}", _0.join(", "))]
    InvalidPermission(Vec<String>),

    /// A permission check was built without any flags.
    #[display("Permission check for {} requires at least one flag", _0)]
    NoPermissions(String),

    /// A role identifier could not be used.
    #[display("Malformed role identifier: {:?}", _0)]
    InvalidRole(String),

    /// An id or role set was empty.
    #[display("Empty {} set", _0)]
    EmptySet(&'static str),

    /// A username substring was empty.
    #[display("Username substring must not be empty")]
    EmptySubstring,

    /// A membership bound was negative, NaN or infinite.
    #[display("Invalid membership bound: {}", _0)]
    InvalidBound(String),

    /// A membership range already has both of its bounds.
    #[display("Membership range already has two bounds")]
    RangeFull,
}

/// Check configuration error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Check Config Error: {} at line {} in {}", kind, line, file)]
pub struct CheckConfigError {
    kind: CheckConfigErrorKind,
    line: u32,
    file: &'static str,
}

impl CheckConfigError {
    /// Create a new check configuration error with caller location tracking.
    #[track_caller]
    pub fn new(kind: CheckConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &CheckConfigErrorKind {
        &self.kind
    }
}
