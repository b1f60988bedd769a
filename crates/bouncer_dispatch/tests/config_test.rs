//! Tests for dispatcher configuration loading.

use bouncer_core::{ChannelId, UserId};
use bouncer_dispatch::{DispatchConfig, EscalationSink};
use std::fs;

fn write_config(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bouncer.toml");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn test_file_overrides_bundled_defaults() {
    let (_dir, path) = write_config(
        r#"
max_message_len = 2000

[[escalation]]
channel = 111
notify = [7, 8]

[[escalation]]
channel = 222
"#,
    );

    let config = DispatchConfig::from_file(&path).unwrap();

    assert_eq!(*config.max_message_len(), 2000);
    // Untouched values come from the bundled file
    assert_eq!(*config.delivery_delay_ms(), 100);
    assert_eq!(config.error_prefix(), "*Error: ");
    assert_eq!(
        config.escalation(),
        &vec![
            EscalationSink::new(ChannelId::new(111)).notify([UserId::new(7), UserId::new(8)]),
            EscalationSink::new(ChannelId::new(222)),
        ]
    );
}

#[test]
fn test_invalid_message_size_is_rejected() {
    let (_dir, path) = write_config("max_message_len = 10\n");

    let err = DispatchConfig::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("max_message_len"));
}

#[test]
fn test_builder_rejects_tiny_message_sizes() {
    let err = DispatchConfig::builder()
        .max_message_len(10)
        .escalation(EscalationSink::new(ChannelId::new(1)))
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("max_message_len must be at least 64, got 10"));
}

#[test]
fn test_malformed_file_is_a_config_error() {
    let (_dir, path) = write_config("delivery_delay_ms = \"soon\"\n");

    let err = DispatchConfig::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("Configuration Error"));
}

#[test]
fn test_missing_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(DispatchConfig::from_file(dir.path().join("absent.toml")).is_err());
}

#[test]
fn test_load_without_overrides() {
    let config = DispatchConfig::load().unwrap();
    assert!(*config.max_message_len() >= bouncer_dispatch::MIN_MESSAGE_LEN);
}
