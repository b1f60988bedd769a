//! Diagnostics for unexpected errors.

use bouncer_core::{Attachment, Embed, ExecutionContext, Message, UnexpectedError, UserId};
use chrono::SecondsFormat;

/// Prepended to a trace whose oldest part was cut.
pub const TRUNCATION_MARKER: &str = "[!!!]";

const INFO_OPEN: &str = "```diff\n";
const TRACE_OPEN: &str = "``````yaml\n";
const TRACE_CLOSE: &str = "```";

/// Characters spent on code fences around the header and trace.
pub const FENCE_OVERHEAD: usize = INFO_OPEN.len() + TRACE_OPEN.len() + TRACE_CLOSE.len();

/// Who invoked what, when, and how it failed.
///
/// # Examples
///
/// ```
/// use bouncer_core::{MockContext, UnexpectedError, UserId};
/// use bouncer_dispatch::{DiagnosticReport, TRUNCATION_MARKER};
///
/// let ctx = MockContext::dm(UserId::new(5));
/// let err = UnexpectedError::new(std::io::Error::other("x".repeat(5000)));
/// let report = DiagnosticReport::capture(&ctx, &err);
///
/// let content = report.render(4096);
/// assert_eq!(content.chars().count(), 4096);
/// assert!(content.contains(TRUNCATION_MARKER));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct DiagnosticReport {
    /// Invoking user id
    actor_id: UserId,
    /// Invoking user account name
    actor_name: String,
    /// Invoking user display name
    display_name: String,
    /// Handler function name
    callback: String,
    /// Qualified command name
    command: String,
    /// Capture time, ISO 8601 to the second
    timestamp: String,
    /// Backtrace and cause chain, oldest first
    trace: String,
}

impl DiagnosticReport {
    /// Describe `err` as raised in `ctx`.
    pub fn capture(ctx: &dyn ExecutionContext, err: &UnexpectedError) -> Self {
        let actor = ctx.actor();
        Self {
            actor_id: *actor.id(),
            actor_name: actor.name().clone(),
            display_name: actor.display_name().clone(),
            callback: ctx.command().callback().clone(),
            command: ctx.command().id().to_string(),
            timestamp: ctx.now().to_rfc3339_opts(SecondsFormat::Secs, true),
            trace: err.trace(),
        }
    }

    /// The `- field` / `+ value` lines describing the invocation.
    pub fn header(&self) -> String {
        [
            ("ctx.author.id", self.actor_id.to_string()),
            ("ctx.author.name", self.actor_name.clone()),
            ("ctx.author.display_name", self.display_name.clone()),
            ("ctx.command.callback.__name__", self.callback.clone()),
            ("ctx.command.qualified_name", self.command.clone()),
            ("invokation timestamp", self.timestamp.clone()),
        ]
        .iter()
        .map(|(field, value)| format!("- {field}\n+ {value}"))
        .collect::<Vec<_>>()
        .join("\n")
    }

    /// Header and trace in code fences, at most `max_len` characters.
    ///
    /// When too long, the oldest part of the trace is dropped and replaced by
    /// [`TRUNCATION_MARKER`], so the most recent context survives. A limit too
    /// small for the fences and marker yields the marker alone, cut to fit.
    pub fn render(&self, max_len: usize) -> String {
        let mut header = self.header();
        let header_len = header.chars().count();
        let trace_len = self.trace.chars().count();

        if header_len + FENCE_OVERHEAD + trace_len <= max_len {
            return format!("{INFO_OPEN}{header}{TRACE_OPEN}{}{TRACE_CLOSE}", self.trace);
        }

        let fixed = FENCE_OVERHEAD + TRUNCATION_MARKER.len();
        if max_len < fixed {
            return TRUNCATION_MARKER.chars().take(max_len).collect();
        }
        let trace = match max_len.checked_sub(header_len + fixed) {
            Some(budget) => tail(&self.trace, budget),
            None => {
                header = header
                    .chars()
                    .take(max_len.saturating_sub(fixed))
                    .collect();
                ""
            }
        };
        format!("{INFO_OPEN}{header}{TRACE_OPEN}{TRUNCATION_MARKER}{trace}{TRACE_CLOSE}")
    }

    /// The diagnostic as an embed.
    pub fn to_message(&self, max_len: usize) -> Message {
        Message::Embed(Embed::negative(self.render(max_len)))
    }
}

/// The last `count` characters of `text`.
fn tail(text: &str, count: usize) -> &str {
    let skip = text.chars().count().saturating_sub(count);
    match text.char_indices().nth(skip) {
        Some((index, _)) => &text[index..],
        None => "",
    }
}

/// The message an escalation sink receives for one attachment.
///
/// Text and errors go in code blocks inside an embed; embeds and files go as-is.
pub fn render_attachment(attachment: Attachment) -> Message {
    match attachment {
        Attachment::Text(text) => Message::Embed(Embed::negative(format!("```\n{text}```"))),
        Attachment::Error(err) => Message::Embed(Embed::negative(format!("```\nERROR: {err}```"))),
        Attachment::Embed(embed) => Message::Embed(embed),
        Attachment::File(file) => Message::File(file),
    }
}
