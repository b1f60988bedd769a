//! Turning command errors into responses and escalations.

use crate::{render_attachment, DefaultFormatter, DiagnosticReport, DispatchConfig, Formatter};
use bouncer_core::{
    CommandError, Embed, ExecutionContext, FailureRecord, Message, UnexpectedError,
};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Handles every error a guarded command raises.
///
/// Authorization failures are rendered through the [`Formatter`] and sent back
/// to the actor. Unexpected errors get a generic notice, and a diagnostic
/// bundle goes to each escalation sink.
///
/// # Examples
///
/// ```
/// use bouncer_core::{CommandError, FailureKind, FailureRecord, MockContext, UserId};
/// use bouncer_dispatch::{DispatchConfig, ErrorDispatcher};
///
/// # let rt = tokio::runtime::Runtime::new().unwrap();
/// # rt.block_on(async {
/// let dispatcher = ErrorDispatcher::new(DispatchConfig::default());
/// let ctx = MockContext::dm(UserId::new(1));
///
/// dispatcher
///     .handle(&ctx, CommandError::Check(FailureRecord::new(FailureKind::IsNotBotOwner, vec![])))
///     .await;
///
/// let reply = &ctx.responses()[0];
/// assert_eq!(
///     reply.as_embed().unwrap().description(),
///     "*Error: This command may only be used by the bot owner.*"
/// );
/// # });
/// ```
#[derive(Clone)]
pub struct ErrorDispatcher {
    formatter: Arc<dyn Formatter>,
    config: DispatchConfig,
}

impl ErrorDispatcher {
    /// A dispatcher with the stock messages.
    pub fn new(config: DispatchConfig) -> Self {
        Self {
            formatter: Arc::new(DefaultFormatter),
            config,
        }
    }

    /// Replace the formatter.
    pub fn with_formatter(mut self, formatter: impl Formatter + 'static) -> Self {
        self.formatter = Arc::new(formatter);
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// The message an actor sees for an authorization failure.
    pub fn failure_message(&self, record: &FailureRecord) -> Message {
        let text = self.formatter.render(record);
        Message::Embed(Embed::negative(self.config.decorate(&text)))
    }

    /// The message an actor sees for an unexpected error.
    pub fn notice(&self) -> Message {
        Message::Embed(Embed::negative(self.config.unexpected_notice().clone()))
    }

    /// Messages delivered to every sink for `err`, diagnostic first.
    pub fn escalation_payload(
        &self,
        ctx: &dyn ExecutionContext,
        mut err: UnexpectedError,
    ) -> Vec<Message> {
        let report = DiagnosticReport::capture(ctx, &err);
        let mut payload = vec![report.to_message(*self.config.max_message_len())];
        payload.extend(err.take_attachments().into_iter().map(render_attachment));
        payload
    }

    /// Respond to, and for unexpected errors escalate, `error`.
    ///
    /// Never fails: delivery problems are logged and the remaining messages
    /// are still sent.
    #[instrument(
        skip_all,
        fields(
            command = %ctx.command().id(),
            actor = %ctx.actor().id(),
            sinks = self.config.escalation().len()
        )
    )]
    pub async fn handle(&self, ctx: &dyn ExecutionContext, error: CommandError) {
        match error {
            CommandError::Check(record) => {
                debug!(kind = %record.kind(), "Rendering check failure");
                if let Err(e) = ctx.respond(self.failure_message(&record)).await {
                    error!(error = %e, "Failed to send check failure to actor");
                    return;
                }
                info!(kind = %record.kind(), "Check failure reported");
            }
            CommandError::Unexpected(err) => {
                error!(error = %err, "Command failed unexpectedly");
                if let Err(e) = ctx.respond(self.notice()).await {
                    error!(error = %e, "Failed to send notice to actor");
                }
                let payload = self.escalation_payload(ctx, err);
                self.escalate(ctx, &payload).await;
            }
        }
    }

    async fn escalate(&self, ctx: &dyn ExecutionContext, payload: &[Message]) {
        let delay = self.config.delivery_delay();
        let mut first = true;
        let mut failed = 0usize;

        for sink in self.config.escalation() {
            let mention = sink.mention().map(Message::Text);
            for message in mention.iter().chain(payload) {
                if !first {
                    tokio::time::sleep(delay).await;
                }
                first = false;
                if let Err(e) = ctx.deliver(sink.channel, message.clone()).await {
                    failed += 1;
                    error!(channel = %sink.channel, error = %e, "Failed to deliver diagnostic");
                }
            }
        }

        info!(
            sinks = self.config.escalation().len(),
            messages = payload.len(),
            failed,
            "Escalation finished"
        );
    }
}

impl std::fmt::Debug for ErrorDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorDispatcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for ErrorDispatcher {
    fn default() -> Self {
        Self::new(DispatchConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EscalationSink, RuleFormatter};
    use bouncer_core::{ChannelId, FailureKind, MockContext, UserId};

    fn quick(config: crate::DispatchConfigBuilder) -> ErrorDispatcher {
        ErrorDispatcher::new(config.delivery_delay_ms(0).build().unwrap())
    }

    #[tokio::test]
    async fn check_failures_use_the_formatter() {
        let dispatcher = quick(DispatchConfig::builder().error_prefix("> ").error_postfix(""))
            .with_formatter(RuleFormatter::new().rule(FailureKind::InDm, |_| "Not here.".into()));
        let ctx = MockContext::dm(UserId::new(1));

        dispatcher
            .handle(&ctx, FailureRecord::new(FailureKind::InDm, Vec::new()).into())
            .await;

        let responses = ctx.responses();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].as_embed().unwrap().description(), "> Not here.");
    }

    #[tokio::test]
    async fn unset_kinds_fall_back_to_generic() {
        let dispatcher = quick(DispatchConfig::builder())
            .with_formatter(RuleFormatter::new().generic_message("Nope."));
        let ctx = MockContext::dm(UserId::new(1));

        dispatcher
            .handle(&ctx, FailureRecord::new(FailureKind::IsUser, Vec::new()).into())
            .await;

        assert_eq!(
            ctx.responses()[0].as_embed().unwrap().description(),
            "*Error: Nope.*"
        );
    }

    #[tokio::test]
    async fn unexpected_errors_notify_the_actor() {
        let dispatcher = quick(
            DispatchConfig::builder().escalation(EscalationSink::new(ChannelId::new(50))),
        );
        let ctx = MockContext::dm(UserId::new(1));

        dispatcher
            .handle(&ctx, CommandError::unexpected("database is gone"))
            .await;

        assert_eq!(ctx.responses(), vec![dispatcher.notice()]);
        let deliveries = ctx.deliveries();
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].0, ChannelId::new(50));
        let diagnostic = deliveries[0].1.as_embed().unwrap().description();
        assert!(diagnostic.contains("database is gone"));
    }

    #[tokio::test]
    async fn no_sinks_means_no_deliveries() {
        let dispatcher = quick(DispatchConfig::builder());
        let ctx = MockContext::dm(UserId::new(1));
        dispatcher.handle(&ctx, CommandError::unexpected("boom")).await;
        assert_eq!(ctx.responses().len(), 1);
        assert!(ctx.deliveries().is_empty());
    }
}
