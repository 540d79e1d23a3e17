//! Per-provider capability data.
//!
//! Provider quirks are configuration, not code: every predicate an
//! adapter answers about a model (system-role support, streaming,
//! temperature, image input) is a substring table matched against the
//! model id, so the tables can ship as versioned TOML and evolve with
//! provider catalogues independently of the engine.

use crate::{Pricing, ProviderKind};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Capability and catalogue data for one provider.
///
/// All substring tables match case-insensitively against model ids;
/// `priority` and the override tables match exact ids.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderProfile {
    /// Model families whose system prompt must be sent under the user role.
    pub convert_system_to_user: Vec<CompactString>,

    /// Model families that reject streaming responses.
    pub disable_streaming: Vec<CompactString>,

    /// Model families that reject a temperature parameter.
    pub disable_temperature: Vec<CompactString>,

    /// Model families that reject image input.
    pub no_image_input: Vec<CompactString>,

    /// Catalogue ids matching any of these substrings are never surfaced.
    pub exclude: Vec<CompactString>,

    /// Exact catalogue ids listed first, in this order.
    pub priority: Vec<CompactString>,

    /// Context length overrides by exact model id.
    pub context_length: BTreeMap<CompactString, usize>,

    /// Max output token overrides by exact model id.
    pub max_output_tokens: BTreeMap<CompactString, usize>,

    /// Pricing by exact model id (USD per million tokens).
    pub pricing: BTreeMap<CompactString, Pricing>,
}

impl ProviderProfile {
    /// The built-in profile for a provider kind.
    pub fn for_kind(kind: ProviderKind) -> Self {
        match kind {
            ProviderKind::OpenAI => Self::openai(),
            ProviderKind::Claude => Self::claude(),
            ProviderKind::DeepSeek => Self::deepseek(),
            ProviderKind::Grok | ProviderKind::Qwen | ProviderKind::Kimi => Self::default(),
        }
    }

    /// Parse a profile from TOML.
    pub fn from_toml(input: &str) -> crate::Result<Self> {
        toml::from_str(input).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Whether the system prompt must be sent under the user role.
    pub fn should_convert_system_to_user(&self, model: &str) -> bool {
        matches(&self.convert_system_to_user, model)
    }

    /// Whether streaming must be replaced with a one-shot call.
    pub fn should_disable_streaming(&self, model: &str) -> bool {
        matches(&self.disable_streaming, model)
    }

    /// Whether the temperature parameter must be omitted.
    pub fn should_disable_temperature(&self, model: &str) -> bool {
        matches(&self.disable_temperature, model)
    }

    /// Whether the model accepts image input.
    pub fn supports_image_input(&self, model: &str) -> bool {
        !matches(&self.no_image_input, model)
    }

    /// Whether a catalogue id must never be surfaced.
    pub fn is_excluded(&self, id: &str) -> bool {
        matches(&self.exclude, id)
    }

    /// Priority rank of a catalogue id; ids off the priority list sort
    /// after every listed id.
    pub fn priority_rank(&self, id: &str) -> usize {
        self.priority
            .iter()
            .position(|p| p == id)
            .unwrap_or(usize::MAX)
    }

    /// Context length override for an exact model id.
    pub fn context_length(&self, model: &str) -> Option<usize> {
        self.context_length.get(model).copied()
    }

    /// Max output token override for an exact model id.
    pub fn max_output_tokens(&self, model: &str) -> Option<usize> {
        self.max_output_tokens.get(model).copied()
    }

    /// Pricing for an exact model id.
    pub fn pricing(&self, model: &str) -> Option<Pricing> {
        self.pricing.get(model).copied()
    }

    fn openai() -> Self {
        Self {
            convert_system_to_user: ["o1-mini", "o1-preview"].map(Into::into).into(),
            disable_streaming: ["o1-pro"].map(Into::into).into(),
            disable_temperature: ["o1", "o3", "o4-mini"].map(Into::into).into(),
            no_image_input: ["gpt-3.5", "o1-mini", "o1-preview", "o3-mini"]
                .map(Into::into)
                .into(),
            exclude: [
                "whisper",
                "tts",
                "dall-e",
                "embedding",
                "moderation",
                "davinci",
                "babbage",
                "audio",
                "realtime",
                "transcribe",
                "instruct",
            ]
            .map(Into::into)
            .into(),
            priority: [
                "gpt-4o",
                "gpt-4o-mini",
                "o1",
                "o3-mini",
                "gpt-4-turbo",
                "gpt-4",
                "gpt-3.5-turbo",
            ]
            .map(Into::into)
            .into(),
            context_length: [
                ("gpt-4o", 128_000),
                ("gpt-4o-mini", 128_000),
                ("o1", 200_000),
                ("o3-mini", 200_000),
                ("gpt-4-turbo", 128_000),
                ("gpt-4", 8_192),
                ("gpt-3.5-turbo", 16_385),
            ]
            .map(|(k, v)| (k.into(), v))
            .into(),
            max_output_tokens: [
                ("gpt-4o", 16_384),
                ("gpt-4o-mini", 16_384),
                ("o1", 100_000),
                ("o3-mini", 100_000),
                ("gpt-4-turbo", 4_096),
                ("gpt-4", 8_192),
                ("gpt-3.5-turbo", 4_096),
            ]
            .map(|(k, v)| (k.into(), v))
            .into(),
            pricing: [
                ("gpt-4o", Pricing::new(2.5, 10.0)),
                ("gpt-4o-mini", Pricing::new(0.15, 0.6)),
                ("o1", Pricing::new(15.0, 60.0)),
            ]
            .map(|(k, v)| (k.into(), v))
            .into(),
        }
    }

    fn claude() -> Self {
        Self {
            exclude: ["claude-1", "claude-2", "claude-instant"].map(Into::into).into(),
            priority: [
                "claude-sonnet-4-0",
                "claude-opus-4-0",
                "claude-3-7-sonnet-latest",
                "claude-3-5-haiku-latest",
            ]
            .map(Into::into)
            .into(),
            context_length: [
                ("claude-sonnet-4-0", 200_000),
                ("claude-opus-4-0", 200_000),
                ("claude-3-7-sonnet-latest", 200_000),
                ("claude-3-5-haiku-latest", 200_000),
            ]
            .map(|(k, v)| (k.into(), v))
            .into(),
            max_output_tokens: [
                ("claude-sonnet-4-0", 64_000),
                ("claude-opus-4-0", 32_000),
                ("claude-3-7-sonnet-latest", 64_000),
                ("claude-3-5-haiku-latest", 8_192),
            ]
            .map(|(k, v)| (k.into(), v))
            .into(),
            pricing: [
                ("claude-sonnet-4-0", Pricing::new(3.0, 15.0)),
                ("claude-opus-4-0", Pricing::new(15.0, 75.0)),
                ("claude-3-5-haiku-latest", Pricing::new(0.8, 4.0)),
            ]
            .map(|(k, v)| (k.into(), v))
            .into(),
            ..Default::default()
        }
    }

    fn deepseek() -> Self {
        Self {
            disable_temperature: ["deepseek-reasoner"].map(Into::into).into(),
            no_image_input: ["deepseek"].map(Into::into).into(),
            priority: ["deepseek-chat", "deepseek-reasoner"].map(Into::into).into(),
            context_length: [("deepseek-chat", 65_536), ("deepseek-reasoner", 65_536)]
                .map(|(k, v)| (k.into(), v))
                .into(),
            max_output_tokens: [("deepseek-chat", 8_192), ("deepseek-reasoner", 65_536)]
                .map(|(k, v)| (k.into(), v))
                .into(),
            ..Default::default()
        }
    }
}

/// Case-insensitive substring match of `model` against `table`.
fn matches(table: &[CompactString], model: &str) -> bool {
    let model = model.to_ascii_lowercase();
    table
        .iter()
        .any(|entry| model.contains(entry.to_ascii_lowercase().as_str()))
}
