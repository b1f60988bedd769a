//! The error a host forwards to the dispatcher.

use crate::{Attachment, FailureRecord};
use bouncer_error::BouncerError;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;
use std::fmt;

/// An error that is not an authorization failure.
///
/// Wraps any error raised while running a command, captures a backtrace at the
/// point of wrapping, and owns the ordered list of supplementary items that
/// are escalated with it.
///
/// # Examples
///
/// ```
/// use bouncer_core::{Attachment, UnexpectedError};
///
/// let io = std::io::Error::other("disk full");
/// let mut err = UnexpectedError::new(io);
/// err.attach(["queue length: 12".into(), Attachment::Text("worker 3".to_string())]);
///
/// assert_eq!(err.attachments().len(), 2);
/// assert!(err.trace().ends_with("disk full"));
/// ```
pub struct UnexpectedError {
    source: Box<dyn Error + Send + Sync>,
    backtrace: Backtrace,
    attachments: Vec<Attachment>,
}

impl UnexpectedError {
    /// Wrap an error, capturing a backtrace if enabled (`RUST_BACKTRACE`).
    pub fn new(err: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self {
            source: err.into(),
            backtrace: Backtrace::capture(),
            attachments: Vec::new(),
        }
    }

    /// Wrap an error, capturing a backtrace whatever the environment says.
    pub fn force_capture(err: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self {
            source: err.into(),
            backtrace: Backtrace::force_capture(),
            attachments: Vec::new(),
        }
    }

    /// Append supplementary items, preserving their order.
    pub fn attach(&mut self, items: impl IntoIterator<Item = Attachment>) -> &mut Self {
        self.attachments.extend(items);
        self
    }

    /// Append one supplementary item, builder style.
    pub fn with(mut self, item: impl Into<Attachment>) -> Self {
        self.attachments.push(item.into());
        self
    }

    /// The wrapped error.
    pub fn inner(&self) -> &(dyn Error + Send + Sync + 'static) {
        &*self.source
    }

    /// The backtrace captured when the error was wrapped.
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    /// Supplementary items in attachment order.
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Remove and return the supplementary items, leaving none behind.
    pub fn take_attachments(&mut self) -> Vec<Attachment> {
        std::mem::take(&mut self.attachments)
    }

    /// Render the backtrace and cause chain as text.
    ///
    /// The oldest context comes first: backtrace frames (when captured) from the
    /// thread entry down to the wrapping site, then the cause chain from root
    /// cause outwards, ending with the wrapped error itself.
    pub fn trace(&self) -> String {
        let mut lines = Vec::new();
        if self.backtrace.status() == BacktraceStatus::Captured {
            lines.push(format!(
                "stack backtrace (most recent call last):\n{}",
                oldest_first(&self.backtrace.to_string())
            ));
        }

        let mut chain = Vec::new();
        let mut current: Option<&(dyn Error + 'static)> = Some(&*self.source);
        while let Some(err) = current {
            chain.push(err.to_string());
            current = err.source();
        }
        let root = chain.len().saturating_sub(1);
        for (depth, message) in chain.iter().enumerate().rev() {
            if depth == 0 {
                lines.push(format!("Error: {message}"));
            } else if depth == root {
                lines.push(format!("Caused by: {message}"));
            } else {
                lines.push(format!("Which caused: {message}"));
            }
        }
        lines.join("\n")
    }
}

/// Reorder rendered backtrace frames so the outermost frame comes first.
///
/// A frame starts at a numbered line (`  3: symbol`) and owns the `at file:line`
/// lines that follow it.
fn oldest_first(rendered: &str) -> String {
    let mut preamble = Vec::new();
    let mut frames: Vec<Vec<&str>> = Vec::new();
    for line in rendered.lines() {
        if is_frame_header(line) {
            frames.push(vec![line]);
        } else if let Some(frame) = frames.last_mut() {
            frame.push(line);
        } else {
            preamble.push(line);
        }
    }
    preamble
        .into_iter()
        .chain(frames.into_iter().rev().flatten())
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_frame_header(line: &str) -> bool {
    match line.trim_start().split_once(':') {
        Some((index, _)) => !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

impl fmt::Debug for UnexpectedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnexpectedError")
            .field("source", &self.source)
            .field("attachments", &self.attachments.len())
            .finish()
    }
}

impl fmt::Display for UnexpectedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl Error for UnexpectedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&*self.source)
    }
}

impl From<BouncerError> for UnexpectedError {
    fn from(err: BouncerError) -> Self {
        Self::new(err)
    }
}

/// The error a host hands to the dispatcher.
#[derive(Debug, derive_more::From, derive_more::Display)]
pub enum CommandError {
    /// A check denied access
    #[display("Check failed: {}", _0)]
    Check(FailureRecord),
    /// Anything else went wrong
    #[display("Unexpected error: {}", _0)]
    Unexpected(UnexpectedError),
}

impl CommandError {
    /// Wrap any error as unexpected.
    pub fn unexpected(err: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        CommandError::Unexpected(UnexpectedError::new(err))
    }

    /// Append supplementary items to an unexpected error.
    ///
    /// Authorization failures are never escalated, so items attached to one
    /// are dropped.
    pub fn attach(&mut self, items: impl IntoIterator<Item = Attachment>) -> &mut Self {
        match self {
            CommandError::Unexpected(err) => {
                err.attach(items);
            }
            CommandError::Check(record) => {
                tracing::debug!(%record, "Ignoring attachments on an authorization failure");
            }
        }
        self
    }

    /// Whether this is an authorization failure.
    pub fn is_check(&self) -> bool {
        matches!(self, CommandError::Check(_))
    }
}

impl From<BouncerError> for CommandError {
    fn from(err: BouncerError) -> Self {
        CommandError::Unexpected(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FailureKind;

    #[derive(Debug, derive_more::Display, derive_more::Error)]
    #[display("outer failure")]
    struct Outer {
        source: std::io::Error,
    }

    #[test]
    fn trace_lists_root_cause_first() {
        let err = UnexpectedError::new(Outer {
            source: std::io::Error::other("socket closed"),
        });
        let trace = err.trace();
        let root = trace.find("Caused by: socket closed").unwrap();
        let outer = trace.find("Error: outer failure").unwrap();
        assert!(root < outer);
        assert!(trace.ends_with("Error: outer failure"));
    }

    #[test]
    fn frames_are_reordered_outermost_first() {
        let rendered = "   0: app::raise\n             at ./src/app.rs:10:5\n   1: app::handler\n             at ./src/app.rs:20:9\n   2: main";
        assert_eq!(
            oldest_first(rendered),
            "   2: main\n   1: app::handler\n             at ./src/app.rs:20:9\n   0: app::raise\n             at ./src/app.rs:10:5"
        );
    }

    #[test]
    fn captured_frames_end_at_the_wrapping_site() {
        let err = UnexpectedError::force_capture("boom");
        let trace = err.trace();
        let indices: Vec<usize> = trace
            .lines()
            .filter(|line| is_frame_header(line))
            .filter_map(|line| line.trim_start().split_once(':'))
            .filter_map(|(index, _)| index.parse().ok())
            .collect();

        assert!(!indices.is_empty());
        assert_eq!(indices.last(), Some(&0));
        assert!(indices.windows(2).all(|pair| pair[0] > pair[1]));
        assert!(trace.ends_with("Error: boom"));
    }

    #[test]
    fn attachments_keep_order() {
        let mut err = UnexpectedError::new("boom");
        err.attach(["first".into()]);
        err.attach(["second".into(), "third".into()]);

        let texts: Vec<_> = err
            .attachments()
            .iter()
            .map(|item| match item {
                Attachment::Text(text) => text.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(texts, ["first", "second", "third"]);
    }

    #[test]
    fn check_failures_drop_attachments() {
        let mut err = CommandError::from(FailureRecord::generic());
        err.attach(["ignored".into()]);
        assert!(err.is_check());

        let mut err = CommandError::unexpected("boom");
        err.attach(["kept".into()]);
        match err {
            CommandError::Unexpected(inner) => assert_eq!(inner.attachments().len(), 1),
            CommandError::Check(_) => panic!("expected unexpected error"),
        }
    }

    #[test]
    fn display_names_the_branch() {
        let err = CommandError::from(FailureRecord::new(FailureKind::NotInDm, Vec::new()));
        assert_eq!(err.to_string(), "Check failed: NotInDM()");
    }
}
