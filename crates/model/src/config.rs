//! Provider configuration loaded from TOML.

use crate::{Error, ProviderProfile, Result};
use anyhow::Context;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Supported LLM provider kinds.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// DeepSeek API (default).
    #[default]
    DeepSeek,
    /// OpenAI API.
    OpenAI,
    /// Grok (xAI) API — OpenAI-compatible.
    Grok,
    /// Qwen (Alibaba DashScope) API — OpenAI-compatible.
    Qwen,
    /// Kimi (Moonshot) API — OpenAI-compatible.
    Kimi,
    /// Claude (Anthropic) Messages API.
    Claude,
}

impl ProviderKind {
    /// Stable provider tag, used for adapter selection and transcripts.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DeepSeek => "deepseek",
            Self::OpenAI => "openai",
            Self::Grok => "grok",
            Self::Qwen => "qwen",
            Self::Kimi => "kimi",
            Self::Claude => "claude",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for a single provider entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Model identifier; also the key under which the adapter registers.
    pub model: CompactString,

    /// API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Optional base URL override for an OpenAI-compatible endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Sampling temperature; profiles may force it off per model family.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ProviderConfig {
    /// Detect the provider kind from the model id prefix.
    pub fn kind(&self) -> Result<ProviderKind> {
        let model = self.model.to_ascii_lowercase();
        let kind = if model.starts_with("deepseek") {
            ProviderKind::DeepSeek
        } else if model.starts_with("gpt")
            || model.starts_with("chatgpt")
            || model.starts_with("o1")
            || model.starts_with("o3")
            || model.starts_with("o4")
        {
            ProviderKind::OpenAI
        } else if model.starts_with("claude") {
            ProviderKind::Claude
        } else if model.starts_with("grok") {
            ProviderKind::Grok
        } else if model.starts_with("qwen") || model.starts_with("qwq") {
            ProviderKind::Qwen
        } else if model.starts_with("kimi") || model.starts_with("moonshot") {
            ProviderKind::Kimi
        } else {
            return Err(Error::Config(format!(
                "cannot detect provider from model '{}'",
                self.model
            )));
        };
        Ok(kind)
    }

    /// Validate the configuration.
    ///
    /// Remote providers need an API key unless a base URL points at an
    /// endpoint that does its own auth (e.g. a local proxy).
    pub fn validate(&self) -> Result<()> {
        if self.model.is_empty() {
            return Err(Error::Config("model is required".into()));
        }
        self.kind()?;
        if self.api_key.is_none() && self.base_url.is_none() {
            return Err(Error::Config(format!(
                "provider for '{}' requires api_key or base_url",
                self.model
            )));
        }
        Ok(())
    }
}

/// Top-level application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Provider entries; the first becomes the active provider.
    pub providers: Vec<ProviderConfig>,

    /// Capability-table overrides keyed by provider tag. Absent kinds
    /// use the built-in profiles.
    pub profiles: BTreeMap<CompactString, ProviderProfile>,
}

impl AppConfig {
    /// Parse a TOML string, expanding `${ENV_VAR}` references in
    /// supported fields.
    pub fn from_toml(toml_str: &str) -> anyhow::Result<Self> {
        let expanded = expand_env_vars(toml_str);
        let config: Self = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// The profile to use for a provider kind: the configured override
    /// when present, the built-in profile otherwise.
    pub fn profile(&self, kind: ProviderKind) -> ProviderProfile {
        self.profiles
            .get(kind.as_str())
            .cloned()
            .unwrap_or_else(|| ProviderProfile::for_kind(kind))
    }
}

/// Expand `${VAR}` references from the environment.
///
/// Unknown variables are replaced with an empty string.
fn expand_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'
            let mut var_name = String::new();
            for c in chars.by_ref() {
                if c == '}' {
                    break;
                }
                var_name.push(c);
            }
            if let Ok(val) = std::env::var(&var_name) {
                result.push_str(&val);
            }
        } else {
            result.push(ch);
        }
    }

    result
}
