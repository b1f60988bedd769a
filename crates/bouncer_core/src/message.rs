//! Outgoing messages and supplementary diagnostic items.

use serde::{Deserialize, Serialize};

/// Embed colour used for failures and diagnostics.
pub const NEGATIVE_COLOR: u32 = 0xED4245;

fn negative_color() -> u32 {
    NEGATIVE_COLOR
}

/// A titled field inside an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    /// Field title
    pub name: String,
    /// Field body
    pub value: String,
    /// Render side by side with neighbouring inline fields
    #[serde(default)]
    pub inline: bool,
}

/// A structured rich-content message.
///
/// # Examples
///
/// ```
/// use bouncer_core::{Embed, NEGATIVE_COLOR};
///
/// let embed = Embed::from_json(serde_json::json!({
///     "title": "Queue state",
///     "description": "3 jobs pending",
/// }))
/// .unwrap();
///
/// assert_eq!(embed.title().as_deref(), Some("Queue state"));
/// assert_eq!(*embed.color(), NEGATIVE_COLOR);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
pub struct Embed {
    /// Optional heading
    #[serde(default)]
    #[builder(default, setter(into, strip_option))]
    title: Option<String>,
    /// Body text
    #[serde(default)]
    #[builder(default, setter(into))]
    description: String,
    /// Side-bar colour as `0xRRGGBB`
    #[serde(default = "negative_color")]
    #[builder(default = "NEGATIVE_COLOR")]
    color: u32,
    /// Titled fields
    #[serde(default)]
    #[builder(default)]
    fields: Vec<EmbedField>,
}

impl Embed {
    /// A negative-colour embed with only a description.
    pub fn negative(description: impl Into<String>) -> Self {
        Self {
            title: None,
            description: description.into(),
            color: NEGATIVE_COLOR,
            fields: Vec::new(),
        }
    }

    /// Build an embed from a JSON object, defaulting the colour to [`NEGATIVE_COLOR`].
    pub fn from_json(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}

/// A binary file to upload alongside a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct FileAttachment {
    /// File name shown to readers
    filename: String,
    /// File contents
    bytes: Vec<u8>,
}

impl FileAttachment {
    /// Create a file attachment.
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

/// A single message sent through the host transport.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::From)]
pub enum Message {
    /// Plain text
    Text(String),
    /// Rich embed
    Embed(Embed),
    /// File upload
    File(FileAttachment),
}

impl Message {
    /// The plain text, if this is a text message.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Message::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The embed, if this is an embed message.
    pub fn as_embed(&self) -> Option<&Embed> {
        match self {
            Message::Embed(embed) => Some(embed),
            _ => None,
        }
    }
}

/// A supplementary item attached to an unexpected error before dispatch.
///
/// Items are delivered to escalation sinks after the main diagnostic, in the
/// order they were attached.
#[derive(Debug, derive_more::From)]
pub enum Attachment {
    /// Free-form text, delivered in a code block
    Text(String),
    /// Structured rich content, delivered as-is
    Embed(Embed),
    /// A nested error, delivered as its message
    Error(Box<dyn std::error::Error + Send + Sync>),
    /// A binary file, uploaded as-is
    File(FileAttachment),
}

impl Attachment {
    /// Attach a JSON object as an embed.
    pub fn json(value: serde_json::Value) -> serde_json::Result<Self> {
        Embed::from_json(value).map(Attachment::Embed)
    }

    /// Attach a nested error.
    pub fn error(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Attachment::Error(Box::new(err))
    }
}

impl From<&str> for Attachment {
    fn from(text: &str) -> Self {
        Attachment::Text(text.to_string())
    }
}
