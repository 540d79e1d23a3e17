//! Wire request body for chat completions.
//!
//! One body type covers both dialects: the OpenAI chat-completions
//! shape and the Anthropic Messages shape (which carries the system
//! prompt as a top-level field). Null-like fields are skipped so the
//! same struct serializes cleanly for either API.

use crate::{Dialect, ProviderProfile};
use compact_str::CompactString;
use llm::{Content, Message, Part, Role};
use serde::Serialize;
use serde_json::{Value, json};

/// The request body for a chat completion.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// The model we are using
    pub model: CompactString,

    /// The system prompt (Anthropic dialect only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// The messages to send to the API
    pub messages: Vec<WireMessage>,

    /// The maximum number of tokens to generate
    pub max_tokens: usize,

    /// The temperature to use for the response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Whether to stream the response
    pub stream: bool,
}

/// A single message as serialized on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct WireMessage {
    /// The wire role ("system", "user", or "assistant")
    pub role: &'static str,

    /// String content or a part array
    pub content: Value,
}

/// Build the request body for one completion.
///
/// The system prompt is placed per the profile: converted to a leading
/// user message when `convert_system_to_user` matches the model,
/// otherwise as a system message (OpenAI dialect) or the top-level
/// `system` field (Anthropic dialect). History roles collapse to plain
/// wire roles; any stray system message inside an Anthropic history is
/// folded into the system field since that API rejects a system role
/// in `messages`.
pub fn build_request(
    dialect: Dialect,
    profile: &ProviderProfile,
    system_prompt: &str,
    history: &[Message],
    model: &str,
    max_tokens: usize,
    temperature: Option<f32>,
) -> ChatRequest {
    let convert = profile.should_convert_system_to_user(model);
    let mut system = None;
    let mut messages = Vec::with_capacity(history.len() + 1);

    if !system_prompt.is_empty() {
        match (dialect, convert) {
            (_, true) => messages.push(WireMessage {
                role: "user",
                content: Value::String(system_prompt.to_owned()),
            }),
            (Dialect::OpenAi, false) => messages.push(WireMessage {
                role: "system",
                content: Value::String(system_prompt.to_owned()),
            }),
            (Dialect::Anthropic, false) => system = Some(system_prompt.to_owned()),
        }
    }

    for message in history {
        let role = match &message.role {
            Role::System if dialect == Dialect::Anthropic && !convert => {
                let folded = system.get_or_insert_default();
                if !folded.is_empty() {
                    folded.push_str("\n\n");
                }
                folded.push_str(&message.content.text());
                continue;
            }
            Role::System if convert => "user",
            Role::System => "system",
            Role::User => "user",
            Role::Assistant | Role::Ai(_) => "assistant",
        };
        messages.push(WireMessage {
            role,
            content: wire_content(dialect, &message.content),
        });
    }

    ChatRequest {
        model: model.into(),
        system,
        messages,
        max_tokens,
        temperature,
        stream: false,
    }
}

impl ChatRequest {
    /// Enable streaming for the request.
    pub fn stream(mut self) -> Self {
        self.stream = true;
        self
    }
}

fn wire_content(dialect: Dialect, content: &Content) -> Value {
    match content {
        Content::Text(text) => Value::String(text.clone()),
        Content::Parts(parts) => Value::Array(
            parts
                .iter()
                .map(|part| wire_part(dialect, part))
                .collect(),
        ),
    }
}

fn wire_part(dialect: Dialect, part: &Part) -> Value {
    match (dialect, part) {
        (_, Part::Text { text }) => json!({ "type": "text", "text": text }),
        (Dialect::OpenAi, Part::ImageUrl { url }) => {
            json!({ "type": "image_url", "image_url": { "url": url } })
        }
        (Dialect::Anthropic, Part::ImageUrl { url }) => {
            json!({ "type": "image", "source": { "type": "url", "url": url } })
        }
    }
}
