//! End-to-end tests: checks raising failures, dispatchers handling them.

use bouncer_check::{guard, CheckExt, LocationCheck, RoleCheck};
use bouncer_core::{
    Attachment, ChannelId, CommandError, CommandInfo, Embed, FailureKind, FailureRecord,
    FileAttachment, GuildBuilder, GuildId, MemberBuilder, Message, MockContext, Role, RoleId,
    UnexpectedError, UserId,
};
use bouncer_dispatch::{
    DiagnosticReport, DispatchConfig, DispatchRegistry, ErrorDispatcher, EscalationSink,
    FENCE_OVERHEAD, TRUNCATION_MARKER,
};

fn member_context() -> MockContext {
    let guild = GuildBuilder::default()
        .id(GuildId::new(2))
        .owner_id(UserId::new(100))
        .roles(vec![
            Role::new(RoleId::new(1), "member"),
            Role::new(RoleId::new(42), "moderator"),
        ])
        .build()
        .unwrap();
    let member = MemberBuilder::default()
        .user_id(UserId::new(1))
        .roles(vec![RoleId::new(1)])
        .build()
        .unwrap();
    MockContext::in_guild(UserId::new(1), GuildId::new(2))
        .with_guild(guild)
        .with_member(GuildId::new(2), member)
}

fn escalating(sinks: Vec<EscalationSink>, max_message_len: usize) -> ErrorDispatcher {
    let mut builder = DispatchConfig::builder()
        .max_message_len(max_message_len)
        .delivery_delay_ms(1);
    for sink in sinks {
        builder = builder.escalation(sink);
    }
    ErrorDispatcher::new(builder.build().unwrap())
}

fn descriptions(deliveries: &[(ChannelId, Message)]) -> Vec<(u64, String)> {
    deliveries
        .iter()
        .map(|(channel, message)| {
            let text = match message {
                Message::Text(text) => text.clone(),
                Message::Embed(embed) => embed.description().clone(),
                Message::File(file) => format!("file:{}", file.filename()),
            };
            (channel.get(), text)
        })
        .collect()
}

#[tokio::test]
async fn missing_role_reaches_the_actor() {
    let ctx = member_context();
    let dispatcher = ErrorDispatcher::default();

    let err = guard(&RoleCheck::user("moderator").unwrap(), &ctx)
        .await
        .unwrap_err();
    assert!(err.is_check());
    dispatcher.handle(&ctx, err).await;

    let responses = ctx.responses();
    assert_eq!(responses.len(), 1);
    assert_eq!(
        responses[0].as_embed().unwrap().description(),
        "*Error: You are missing one or more of the roles required to use this command.*"
    );
    assert!(ctx.deliveries().is_empty());
}

#[tokio::test]
async fn negated_location_reaches_the_actor() {
    let ctx = MockContext::dm(UserId::new(1));
    let err = guard(&LocationCheck::dm().not(), &ctx).await.unwrap_err();

    ErrorDispatcher::default().handle(&ctx, err).await;

    assert_eq!(
        ctx.responses()[0].as_embed().unwrap().description(),
        "*Error: This command may not be used through DMs (private messages).*"
    );
}

#[tokio::test]
async fn check_failures_are_never_escalated() {
    let ctx = MockContext::dm(UserId::new(1));
    let dispatcher = escalating(
        vec![EscalationSink::new(ChannelId::new(50)).notify([UserId::new(9)])],
        4096,
    );

    dispatcher
        .handle(&ctx, FailureRecord::new(FailureKind::IsNotUser, Vec::new()).into())
        .await;

    assert_eq!(ctx.responses().len(), 1);
    assert!(ctx.deliveries().is_empty());
}

#[tokio::test]
async fn escalation_sends_mention_diagnostic_then_attachments() {
    let ctx = MockContext::in_guild(UserId::new(1), GuildId::new(2))
        .with_command(CommandInfo::new("report", "report_command"));
    let dispatcher = escalating(
        vec![
            EscalationSink::new(ChannelId::new(50)).notify([UserId::new(7), UserId::new(8)]),
            EscalationSink::new(ChannelId::new(60)),
        ],
        4096,
    );

    let mut err = CommandError::unexpected(std::io::Error::other("socket closed"));
    err.attach([
        Attachment::from("retry budget: 0"),
        Attachment::error(std::io::Error::other("pool exhausted")),
        Attachment::Embed(Embed::negative("raw state")),
        Attachment::File(FileAttachment::new("state.json", b"{}".to_vec())),
    ]);
    dispatcher.handle(&ctx, err).await;

    assert_eq!(ctx.responses(), vec![dispatcher.notice()]);

    let delivered = descriptions(&ctx.deliveries());
    let expected_tail = |channel: u64| {
        vec![
            (channel, "```\nretry budget: 0```".to_string()),
            (channel, "```\nERROR: pool exhausted```".to_string()),
            (channel, "raw state".to_string()),
            (channel, "file:state.json".to_string()),
        ]
    };

    assert_eq!(delivered.len(), 11);
    assert_eq!(delivered[0], (50, "<@7> <@8>".to_string()));
    assert!(delivered[1].1.starts_with("```diff\n- ctx.author.id\n+ 1\n"));
    assert!(delivered[1].1.contains("+ report\n"));
    assert!(delivered[1].1.contains("socket closed"));
    assert_eq!(delivered[2..6], expected_tail(50)[..]);

    // No mention for a sink without accounts to notify
    assert_eq!(delivered[6].0, 60);
    assert!(delivered[6].1.starts_with("```diff\n"));
    assert_eq!(delivered[7..11], expected_tail(60)[..]);
}

#[tokio::test]
async fn long_traces_are_truncated_to_the_message_size() {
    let ctx = MockContext::dm(UserId::new(1));
    let dispatcher = escalating(vec![EscalationSink::new(ChannelId::new(50))], 512);

    let message = format!("{}most recent frame", "older frame\n".repeat(200));
    dispatcher
        .handle(&ctx, UnexpectedError::new(message).into())
        .await;

    let deliveries = ctx.deliveries();
    let diagnostic = deliveries[0].1.as_embed().unwrap().description();
    assert_eq!(diagnostic.chars().count(), 512);
    assert!(diagnostic.contains(&format!("``````yaml\n{TRUNCATION_MARKER}")));
    assert!(diagnostic.ends_with("most recent frame```"));
}

#[inline(never)]
fn innermost_raise_site() -> UnexpectedError {
    UnexpectedError::force_capture(std::io::Error::other("replica lag"))
}

#[test]
fn truncation_keeps_the_raise_site_frames() {
    let ctx = MockContext::dm(UserId::new(1));
    let report = DiagnosticReport::capture(&ctx, &innermost_raise_site());
    let trace = report.trace();

    let site = trace.find("innermost_raise_site").expect("symbolized raise site");
    let frame_start = trace[..site].rfind('\n').map_or(0, |index| index + 1);
    assert!(frame_start > 0, "outer frames precede the raise site");

    let kept = trace[frame_start..].chars().count();
    let max_len =
        report.header().chars().count() + FENCE_OVERHEAD + TRUNCATION_MARKER.len() + kept;
    let content = report.render(max_len);

    assert_eq!(content.chars().count(), max_len);
    assert!(content.contains(TRUNCATION_MARKER));
    assert!(content.contains("innermost_raise_site"));
    assert!(content.ends_with("Error: replica lag```"));
}

#[tokio::test]
async fn failing_sink_does_not_stop_the_others() {
    let ctx = MockContext::dm(UserId::new(1)).with_failing_channel(ChannelId::new(50));
    let dispatcher = escalating(
        vec![
            EscalationSink::new(ChannelId::new(50)).notify([UserId::new(7)]),
            EscalationSink::new(ChannelId::new(60)).notify([UserId::new(7)]),
        ],
        4096,
    );

    dispatcher
        .handle(&ctx, CommandError::unexpected("boom"))
        .await;

    let delivered = descriptions(&ctx.deliveries());
    assert_eq!(delivered.len(), 2);
    assert!(delivered.iter().all(|(channel, _)| *channel == 60));
    assert_eq!(delivered[0].1, "<@7>");
    assert_eq!(ctx.responses().len(), 1);
}

#[tokio::test]
async fn registry_routes_by_command_with_fallback() {
    let strict = ErrorDispatcher::new(
        DispatchConfig::builder()
            .error_prefix("!! ")
            .build()
            .unwrap(),
    );
    let registry = DispatchRegistry::new()
        .register("ban", strict)
        .with_fallback(ErrorDispatcher::default());

    let ban = MockContext::dm(UserId::new(1)).with_command(CommandInfo::new("ban", "ban"));
    let ping = MockContext::dm(UserId::new(1)).with_command(CommandInfo::new("ping", "ping"));
    let record = || FailureRecord::new(FailureKind::IsNotBotOwner, Vec::new());

    assert!(registry.route(&ban, record().into()).await);
    assert!(registry.route(&ping, record().into()).await);

    let ban_text = ban.responses()[0].as_embed().unwrap().description().clone();
    let ping_text = ping.responses()[0].as_embed().unwrap().description().clone();
    assert!(ban_text.starts_with("!! "));
    assert!(ping_text.starts_with("*Error: "));
}
