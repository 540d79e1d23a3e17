//! Anthropic Messages API payload parsing.
//!
//! Anthropic streaming events differ from the OpenAI chunk format:
//! - `message_start` — initial message metadata
//! - `content_block_start` — begin a content block
//! - `content_block_delta` — incremental text
//! - `content_block_stop` — end of a content block
//! - `message_delta` — final stop_reason and usage
//! - `message_stop` — end of message
//!
//! Events are converted into the unified [`StreamChunk`] so the
//! delivery loop is dialect-agnostic.

use compact_str::CompactString;
use llm::{ChunkChoice, CompletionMeta, FinishReason, StreamChunk, Usage};
use serde::Deserialize;

/// A raw SSE event from the Anthropic streaming API.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Initial message metadata.
    #[serde(rename = "message_start")]
    MessageStart { message: MessageMeta },
    /// Begin a content block.
    #[serde(rename = "content_block_start")]
    ContentBlockStart { content_block: ContentBlock },
    /// Incremental content within a block.
    #[serde(rename = "content_block_delta")]
    ContentBlockDelta { delta: BlockDelta },
    /// End of a content block.
    #[serde(rename = "content_block_stop")]
    ContentBlockStop {},
    /// Final message delta (stop reason + usage).
    #[serde(rename = "message_delta")]
    MessageDelta {
        delta: MessageDeltaBody,
        usage: MessageDeltaUsage,
    },
    /// End of message.
    #[serde(rename = "message_stop")]
    MessageStop,
    /// Ping (keep-alive).
    #[serde(rename = "ping")]
    Ping,
    /// Catch-all for unknown event types.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
pub struct MessageMeta {
    pub id: CompactString,
    pub model: CompactString,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum BlockDelta {
    #[serde(rename = "text_delta")]
    TextDelta { text: String },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
pub struct MessageDeltaBody {
    pub stop_reason: Option<CompactString>,
}

#[derive(Debug, Deserialize)]
pub struct MessageDeltaUsage {
    #[serde(default)]
    pub output_tokens: u32,
}

impl Event {
    /// Convert this Anthropic event to a unified `StreamChunk`.
    /// Returns `None` for events that don't produce output.
    pub fn into_chunk(self) -> Option<StreamChunk> {
        match self {
            Self::MessageStart { message } => Some(StreamChunk {
                meta: CompletionMeta {
                    id: message.id,
                    object: "chat.completion.chunk".into(),
                    model: message.model,
                    ..Default::default()
                },
                ..Default::default()
            }),
            Self::ContentBlockStart {
                content_block: ContentBlock::Text { text },
            } => {
                if text.is_empty() {
                    None
                } else {
                    Some(StreamChunk::text(text))
                }
            }
            Self::ContentBlockDelta {
                delta: BlockDelta::TextDelta { text },
            } => Some(StreamChunk::text(text)),
            Self::MessageDelta { delta, usage } => Some(StreamChunk {
                choices: vec![ChunkChoice {
                    finish_reason: delta.stop_reason.as_deref().map(to_finish_reason),
                    ..Default::default()
                }],
                usage: Some(Usage {
                    completion_tokens: usage.output_tokens,
                    total_tokens: usage.output_tokens,
                    ..Default::default()
                }),
                ..Default::default()
            }),
            Self::ContentBlockStart {
                content_block: ContentBlock::Unknown,
            }
            | Self::ContentBlockDelta {
                delta: BlockDelta::Unknown,
            }
            | Self::ContentBlockStop {}
            | Self::MessageStop
            | Self::Ping
            | Self::Unknown => None,
        }
    }
}

/// Raw Anthropic non-streaming response.
#[derive(Debug, Deserialize)]
pub struct Completion {
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<CompactString>,
}

impl Completion {
    /// The concatenated text of all text blocks.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for block in &self.content {
            if let ContentBlock::Text { text } = block {
                if !out.is_empty() {
                    out.push('\n');
                }
                out.push_str(text);
            }
        }
        out
    }

    /// The mapped finish reason.
    pub fn reason(&self) -> Option<FinishReason> {
        self.stop_reason.as_deref().map(to_finish_reason)
    }
}

fn to_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "end_turn" | "stop" => FinishReason::Stop,
        "max_tokens" => FinishReason::Length,
        _ => FinishReason::Other,
    }
}
