//! Dispatcher configuration.
//!
//! Configuration is layered:
//! - Bundled defaults (`include_str!` of `bouncer.toml`)
//! - `~/.config/bouncer/bouncer.toml`
//! - `./bouncer.toml`, taking precedence over both

use bouncer_core::{ChannelId, UserId};
use bouncer_error::{BouncerError, BouncerResult, ConfigError, ConfigErrorKind};
use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../bouncer.toml");

/// Smallest accepted message size, enough for the diagnostic fences and marker.
pub const MIN_MESSAGE_LEN: usize = 64;

fn default_max_message_len() -> usize {
    4096
}

fn default_delivery_delay_ms() -> u64 {
    100
}

fn default_error_prefix() -> String {
    "*Error: ".to_string()
}

fn default_error_postfix() -> String {
    "*".to_string()
}

fn default_unexpected_notice() -> String {
    "**An unknown error has occured. The developers have been notified and will attempt to fix \
     the issue as soon as possible. Thank you for your patience.**"
        .to_string()
}

/// A channel that receives diagnostics for unexpected errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationSink {
    /// Where diagnostics are delivered
    pub channel: ChannelId,
    /// Accounts mentioned before the diagnostics
    #[serde(default)]
    pub notify: Vec<UserId>,
}

impl EscalationSink {
    /// A sink that notifies nobody.
    pub fn new(channel: ChannelId) -> Self {
        Self {
            channel,
            notify: Vec::new(),
        }
    }

    /// Mention `users` before each diagnostic.
    pub fn notify(mut self, users: impl IntoIterator<Item = UserId>) -> Self {
        self.notify.extend(users);
        self
    }

    /// The mention line sent ahead of the diagnostics, if anyone is notified.
    pub fn mention(&self) -> Option<String> {
        if self.notify.is_empty() {
            return None;
        }
        Some(
            self.notify
                .iter()
                .map(|user| format!("<@{user}>"))
                .collect::<Vec<_>>()
                .join(" "),
        )
    }
}

/// Settings for an [`ErrorDispatcher`](crate::ErrorDispatcher).
///
/// # Examples
///
/// ```
/// use bouncer_dispatch::{DispatchConfig, EscalationSink};
/// use bouncer_core::ChannelId;
///
/// let config = DispatchConfig::builder()
///     .max_message_len(2000)
///     .escalation(EscalationSink::new(ChannelId::new(55)))
///     .build()?;
///
/// assert_eq!(*config.max_message_len(), 2000);
/// assert_eq!(config.error_prefix(), "*Error: ");
/// # Ok::<(), bouncer_error::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct DispatchConfig {
    /// Longest message the chat service accepts, in characters.
    #[serde(default = "default_max_message_len")]
    max_message_len: usize,

    /// Pause between consecutive escalation messages, in milliseconds.
    #[serde(default = "default_delivery_delay_ms")]
    delivery_delay_ms: u64,

    /// Text placed before every failure message.
    #[serde(default = "default_error_prefix")]
    error_prefix: String,

    /// Text placed after every failure message.
    #[serde(default = "default_error_postfix")]
    error_postfix: String,

    /// Notice shown to the actor when a command fails unexpectedly.
    #[serde(default = "default_unexpected_notice")]
    unexpected_notice: String,

    /// Escalation sinks, in delivery order.
    #[serde(default)]
    escalation: Vec<EscalationSink>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_message_len: default_max_message_len(),
            delivery_delay_ms: default_delivery_delay_ms(),
            error_prefix: default_error_prefix(),
            error_postfix: default_error_postfix(),
            unexpected_notice: default_unexpected_notice(),
            escalation: Vec::new(),
        }
    }
}

impl DispatchConfig {
    /// Creates a new dispatch config builder.
    pub fn builder() -> DispatchConfigBuilder {
        DispatchConfigBuilder::default()
    }

    /// The inter-message delay as a [`Duration`].
    pub fn delivery_delay(&self) -> Duration {
        Duration::from_millis(self.delivery_delay_ms)
    }

    /// Wrap a failure message in the configured prefix and postfix.
    pub fn decorate(&self, text: &str) -> String {
        format!("{}{}{}", self.error_prefix, text, self.error_postfix)
    }

    /// Checks the values a dispatcher depends on.
    ///
    /// # Errors
    ///
    /// Returns an error if the message size cannot hold a diagnostic.
    #[track_caller]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_message_len < MIN_MESSAGE_LEN {
            return Err(ConfigError::new(ConfigErrorKind::MessageTooSmall {
                minimum: MIN_MESSAGE_LEN,
                actual: self.max_message_len,
            }));
        }
        Ok(())
    }

    /// Loads configuration from a specific file, on top of the bundled defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> BouncerResult<Self> {
        debug!("Loading dispatcher configuration from file");

        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()));
        Self::finish(builder.build().map_err(|e| {
            BouncerError::from(ConfigError::new(ConfigErrorKind::Read {
                path: path.as_ref().display().to_string(),
                reason: e.to_string(),
            }))
        })?)
    }

    /// Loads configuration with precedence: current dir > home dir > bundled defaults.
    #[instrument]
    pub fn load() -> BouncerResult<Self> {
        debug!("Loading dispatcher configuration");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/bouncer/bouncer.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("bouncer").required(false));

        Self::finish(builder.build().map_err(|e| {
            BouncerError::from(ConfigError::new(ConfigErrorKind::Build(e.to_string())))
        })?)
    }

    fn finish(config: Config) -> BouncerResult<Self> {
        let loaded: Self = config.try_deserialize().map_err(|e| {
            BouncerError::from(ConfigError::new(ConfigErrorKind::Parse(e.to_string())))
        })?;
        loaded.validate()?;
        debug!(
            sinks = loaded.escalation.len(),
            max_message_len = loaded.max_message_len,
            "Configuration loaded"
        );
        Ok(loaded)
    }
}

/// Builder for [`DispatchConfig`].
#[derive(Debug, Default)]
pub struct DispatchConfigBuilder {
    max_message_len: Option<usize>,
    delivery_delay_ms: Option<u64>,
    error_prefix: Option<String>,
    error_postfix: Option<String>,
    unexpected_notice: Option<String>,
    escalation: Vec<EscalationSink>,
}

impl DispatchConfigBuilder {
    /// Sets the maximum message size.
    pub fn max_message_len(mut self, value: usize) -> Self {
        self.max_message_len = Some(value);
        self
    }

    /// Sets the inter-message delay in milliseconds.
    pub fn delivery_delay_ms(mut self, value: u64) -> Self {
        self.delivery_delay_ms = Some(value);
        self
    }

    /// Sets the failure message prefix.
    pub fn error_prefix(mut self, value: impl Into<String>) -> Self {
        self.error_prefix = Some(value.into());
        self
    }

    /// Sets the failure message postfix.
    pub fn error_postfix(mut self, value: impl Into<String>) -> Self {
        self.error_postfix = Some(value.into());
        self
    }

    /// Sets the unexpected-error notice.
    pub fn unexpected_notice(mut self, value: impl Into<String>) -> Self {
        self.unexpected_notice = Some(value.into());
        self
    }

    /// Appends an escalation sink.
    pub fn escalation(mut self, sink: EscalationSink) -> Self {
        self.escalation.push(sink);
        self
    }

    /// Builds the `DispatchConfig`.
    ///
    /// # Errors
    ///
    /// Returns an error if the result fails [`DispatchConfig::validate`].
    #[track_caller]
    pub fn build(self) -> Result<DispatchConfig, ConfigError> {
        let config = DispatchConfig {
            max_message_len: self.max_message_len.unwrap_or_else(default_max_message_len),
            delivery_delay_ms: self
                .delivery_delay_ms
                .unwrap_or_else(default_delivery_delay_ms),
            error_prefix: self.error_prefix.unwrap_or_else(default_error_prefix),
            error_postfix: self.error_postfix.unwrap_or_else(default_error_postfix),
            unexpected_notice: self
                .unexpected_notice
                .unwrap_or_else(default_unexpected_notice),
            escalation: self.escalation,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_defaults_match_default() {
        let bundled: DispatchConfig = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(bundled, DispatchConfig::default());
    }

    #[test]
    fn mention_joins_with_spaces() {
        let sink = EscalationSink::new(ChannelId::new(1)).notify([UserId::new(2), UserId::new(3)]);
        assert_eq!(sink.mention().as_deref(), Some("<@2> <@3>"));
        assert!(EscalationSink::new(ChannelId::new(1)).mention().is_none());
    }

    #[test]
    fn tiny_messages_are_rejected() {
        let err = DispatchConfig::builder().max_message_len(10).build().unwrap_err();
        assert_eq!(
            err.kind(),
            &ConfigErrorKind::MessageTooSmall {
                minimum: MIN_MESSAGE_LEN,
                actual: 10
            }
        );
        assert!(DispatchConfig::builder()
            .max_message_len(MIN_MESSAGE_LEN)
            .build()
            .is_ok());
    }

    #[test]
    fn decorate_wraps_text() {
        let config = DispatchConfig::default();
        assert_eq!(config.decorate("No."), "*Error: No.*");
    }
}
