//! A host wiring checks and dispatch together through the facade.

use bouncer::{
    guard, Any, CheckExt, ChannelId, ChannelPermissionCheck, CommandError, DispatchConfig,
    DispatchRegistry, ErrorDispatcher, EscalationSink, FailureKind, OwnerCheck, Permission,
    PermissionSet, RuleFormatter, UnexpectedError, UserId, UsernameCheck,
};
use bouncer_core::MockContext;

#[tokio::test]
async fn guarded_command_reports_missing_permissions() {
    let ctx = MockContext::dm(UserId::new(1));
    let check = ChannelPermissionCheck::user([("manage_messages", true)])
        .unwrap()
        .and(UsernameCheck::contains("admin").unwrap());

    let err = guard(&check, &ctx).await.unwrap_err();
    match &err {
        CommandError::Check(record) => {
            assert_eq!(*record.kind(), FailureKind::UserMissingChannelPerms)
        }
        other => panic!("expected a check failure, got {other}"),
    }

    ErrorDispatcher::default().handle(&ctx, err).await;
    assert_eq!(
        ctx.responses()[0].as_embed().unwrap().description(),
        "*Error: You are missing one or more of the channel permissions required to use this command.*"
    );
}

#[tokio::test]
async fn any_of_owner_or_permission() {
    let mut granted = PermissionSet::new();
    granted.insert(Permission::ManageMessages);
    let ctx = MockContext::dm(UserId::new(1)).with_channel_permissions(
        ChannelId::new(1),
        UserId::new(1),
        granted,
    );

    let check = Any::new([
        OwnerCheck::bot_owner().boxed(),
        ChannelPermissionCheck::user([("manage_messages", true)])
            .unwrap()
            .boxed(),
    ]);
    assert!(guard(&check, &ctx).await.is_ok());
}

#[tokio::test]
async fn registry_escalates_crashes_with_custom_messages() {
    let dispatcher = ErrorDispatcher::new(
        DispatchConfig::builder()
            .delivery_delay_ms(0)
            .unexpected_notice("Something broke.")
            .escalation(EscalationSink::new(ChannelId::new(77)).notify([UserId::new(5)]))
            .build()
            .unwrap(),
    )
    .with_formatter(RuleFormatter::new());
    let registry = DispatchRegistry::new().with_fallback(dispatcher);
    let ctx = MockContext::dm(UserId::new(1));

    let err = UnexpectedError::new("cache poisoned").with("shard 4");
    assert!(registry.route(&ctx, err.into()).await);

    assert_eq!(
        ctx.responses()[0].as_embed().unwrap().description(),
        "Something broke."
    );
    let deliveries = ctx.deliveries();
    assert_eq!(deliveries.len(), 3);
    assert_eq!(deliveries[0].1.as_text(), Some("<@5>"));
    assert_eq!(
        deliveries[2].1.as_embed().unwrap().description(),
        "```\nshard 4```"
    );
}
