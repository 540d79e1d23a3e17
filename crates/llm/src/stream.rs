//! Streaming response abstractions for the unified LLM interfaces

use crate::{
    FinishReason, Usage,
    response::{CompletionMeta, Delta},
};
use serde::Deserialize;

/// A streaming chat completion chunk
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StreamChunk {
    /// Completion metadata
    #[serde(flatten)]
    pub meta: CompletionMeta,

    /// The list of completion choices (with delta content)
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,

    /// Token usage statistics (only in final chunk)
    pub usage: Option<Usage>,
}

impl StreamChunk {
    /// Create a chunk carrying a single text fragment.
    pub fn text(fragment: impl Into<String>) -> Self {
        Self {
            choices: vec![ChunkChoice {
                delta: Delta {
                    content: Some(fragment.into()),
                    ..Default::default()
                },
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    /// Get the content of the first choice
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.delta.content.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// Get the reason the model stopped generating
    pub fn reason(&self) -> Option<FinishReason> {
        self.choices.first().and_then(|choice| choice.finish_reason)
    }
}

/// A completion choice in a streaming chunk
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ChunkChoice {
    /// The index of this choice in the list
    pub index: u32,

    /// The incremental message content
    pub delta: Delta,

    /// The reason the model stopped generating
    pub finish_reason: Option<FinishReason>,
}
