//! Pelican chat message

use crate::StreamChunk;
use compact_str::{CompactString, format_compact};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use smallvec::SmallVec;

/// A message in the chat
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct Message {
    /// The role of the message
    pub role: Role,

    /// The content of the message
    pub content: Content,
}

impl Message {
    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: Content::Text(content.into()),
        }
    }

    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Content::Text(content.into()),
        }
    }

    /// Create a new user message from content parts
    pub fn user_parts(parts: impl IntoIterator<Item = Part>) -> Self {
        Self {
            role: Role::User,
            content: Content::Parts(parts.into_iter().collect()),
        }
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: Content::Text(content.into()),
        }
    }

    /// Create a new assistant message tagged with the model that produced it
    pub fn ai(model: impl Into<CompactString>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Ai(model.into()),
            content: Content::Text(content.into()),
        }
    }

    /// Create a new message builder
    pub fn builder(role: Role) -> MessageBuilder {
        MessageBuilder::new(role)
    }

    /// Estimate the number of tokens in this message.
    ///
    /// Uses a simple heuristic: ~4 characters per token.
    pub fn estimate_tokens(&self) -> usize {
        (self.content.text_len() / 4).max(1)
    }
}

/// Estimate total tokens across a slice of messages.
pub fn estimate_tokens(messages: &[Message]) -> usize {
    messages.iter().map(|m| m.estimate_tokens()).sum()
}

/// Message content: plain text or an ordered sequence of parts.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Content {
    /// Plain text content
    Text(String),
    /// Multi-part content (text fragments and image references)
    Parts(SmallVec<[Part; 2]>),
}

impl Content {
    /// The full text of this content. Image parts contribute nothing;
    /// multiple text parts are joined with newlines.
    pub fn text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Parts(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    Part::Text { text } => Some(text.as_str()),
                    Part::ImageUrl { .. } => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Whether any part references an image.
    pub fn has_image(&self) -> bool {
        match self {
            Self::Text(_) => false,
            Self::Parts(parts) => parts
                .iter()
                .any(|part| matches!(part, Part::ImageUrl { .. })),
        }
    }

    /// Apply `f` to every text segment in place.
    pub fn for_each_text_mut(&mut self, mut f: impl FnMut(&mut String)) {
        match self {
            Self::Text(text) => f(text),
            Self::Parts(parts) => {
                for part in parts.iter_mut() {
                    if let Part::Text { text } = part {
                        f(text);
                    }
                }
            }
        }
    }

    fn text_len(&self) -> usize {
        match self {
            Self::Text(text) => text.len(),
            Self::Parts(parts) => parts
                .iter()
                .map(|part| match part {
                    Part::Text { text } => text.len(),
                    Part::ImageUrl { .. } => 0,
                })
                .sum(),
        }
    }
}

impl Default for Content {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

/// A single content part.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Part {
    /// A text fragment
    Text {
        /// The fragment text
        text: String,
    },
    /// An image reference by URL
    ImageUrl {
        /// The image URL
        url: String,
    },
}

/// A builder that folds stream chunks back into a message
pub struct MessageBuilder {
    message: Message,
    buffer: String,
}

impl MessageBuilder {
    /// Create a new message builder
    pub fn new(role: Role) -> Self {
        Self {
            message: Message {
                role,
                ..Default::default()
            },
            buffer: String::new(),
        }
    }

    /// Accept a chunk from the stream. Returns whether the chunk carried
    /// any content.
    pub fn accept(&mut self, chunk: &StreamChunk) -> bool {
        if let Some(content) = chunk.content() {
            self.push(content);
            true
        } else {
            false
        }
    }

    /// Append a raw text fragment to the accumulation.
    pub fn push(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Build the message
    pub fn build(mut self) -> Message {
        self.message.content = Content::Text(self.buffer);
        self.message
    }
}

/// The role of a message.
///
/// `Ai` is the application-level tagged-assistant role recording which
/// model produced a reply. It is serialized as `ai-<model>` and must be
/// rewritten to `Assistant` by [`crate::normalize_roles`] before a
/// history reaches any provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Role {
    /// The user role
    #[default]
    User,
    /// The assistant role
    Assistant,
    /// The system role
    System,
    /// An assistant reply tagged with the producing model
    Ai(CompactString),
}

impl Role {
    /// The transcript tag for this role (`"ai-<model>"` for tagged
    /// assistant turns).
    pub fn as_tag(&self) -> CompactString {
        match self {
            Self::User => CompactString::const_new("user"),
            Self::Assistant => CompactString::const_new("assistant"),
            Self::System => CompactString::const_new("system"),
            Self::Ai(model) => format_compact!("ai-{model}"),
        }
    }

    /// Parse a transcript tag back into a role.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            "system" => Some(Self::System),
            _ => tag.strip_prefix("ai-").map(|model| Self::Ai(model.into())),
        }
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_tag())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = CompactString::deserialize(deserializer)?;
        Self::from_tag(&tag)
            .ok_or_else(|| de::Error::custom(format_compact!("unknown message role '{tag}'")))
    }
}
