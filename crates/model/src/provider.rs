//! The shared provider engine.
//!
//! One engine serves every backend: a provider is a `Dialect` (which
//! wire format to speak) plus a `ProviderProfile` (capability and
//! catalogue data). `build_adapter()` routes a `ProviderConfig` to the
//! right dialect, profile, and endpoints; a `base_url` override always
//! routes to an OpenAI-compatible custom endpoint.

use crate::{
    Error, HttpEngine, ModelCatalogEntry, ProviderAdapter, ProviderConfig, ProviderKind,
    ProviderProfile, Result, anthropic,
    catalog::{self, ModelList},
    request::build_request,
    token,
};
use futures_util::StreamExt;
use llm::{FinishReason, Message, Response, StreamChunk};
use reqwest::Client;
use std::pin::pin;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Sampling temperature applied when the config does not set one.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Anthropic API version header value.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Provider endpoint URLs.
pub mod endpoint {
    use crate::ProviderKind;

    /// DeepSeek chat completions.
    pub const DEEPSEEK_CHAT: &str = "https://api.deepseek.com/chat/completions";
    /// DeepSeek model catalogue.
    pub const DEEPSEEK_MODELS: &str = "https://api.deepseek.com/models";
    /// OpenAI chat completions.
    pub const OPENAI_CHAT: &str = "https://api.openai.com/v1/chat/completions";
    /// OpenAI model catalogue.
    pub const OPENAI_MODELS: &str = "https://api.openai.com/v1/models";
    /// Grok (xAI) chat completions.
    pub const GROK_CHAT: &str = "https://api.x.ai/v1/chat/completions";
    /// Grok (xAI) model catalogue.
    pub const GROK_MODELS: &str = "https://api.x.ai/v1/models";
    /// Qwen (Alibaba DashScope) chat completions.
    pub const QWEN_CHAT: &str =
        "https://dashscope.aliyuncs.com/compatible-mode/v1/chat/completions";
    /// Qwen (Alibaba DashScope) model catalogue.
    pub const QWEN_MODELS: &str = "https://dashscope.aliyuncs.com/compatible-mode/v1/models";
    /// Kimi (Moonshot) chat completions.
    pub const KIMI_CHAT: &str = "https://api.moonshot.cn/v1/chat/completions";
    /// Kimi (Moonshot) model catalogue.
    pub const KIMI_MODELS: &str = "https://api.moonshot.cn/v1/models";
    /// Anthropic Messages API.
    pub const ANTHROPIC_CHAT: &str = "https://api.anthropic.com/v1/messages";
    /// Anthropic model catalogue.
    pub const ANTHROPIC_MODELS: &str = "https://api.anthropic.com/v1/models";

    /// The default (chat, models) endpoints for a provider kind.
    pub fn for_kind(kind: ProviderKind) -> (&'static str, &'static str) {
        match kind {
            ProviderKind::DeepSeek => (DEEPSEEK_CHAT, DEEPSEEK_MODELS),
            ProviderKind::OpenAI => (OPENAI_CHAT, OPENAI_MODELS),
            ProviderKind::Grok => (GROK_CHAT, GROK_MODELS),
            ProviderKind::Qwen => (QWEN_CHAT, QWEN_MODELS),
            ProviderKind::Kimi => (KIMI_CHAT, KIMI_MODELS),
            ProviderKind::Claude => (ANTHROPIC_CHAT, ANTHROPIC_MODELS),
        }
    }
}

/// The wire format a provider speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// OpenAI chat-completions format (OpenAI, DeepSeek, Grok, Qwen,
    /// Kimi, and any compatible custom endpoint).
    OpenAi,
    /// Anthropic Messages format.
    Anthropic,
}

impl Dialect {
    /// Parse one SSE payload into a unified chunk. Unparseable payloads
    /// are logged and skipped — a malformed keep-alive must not kill
    /// the stream.
    fn parse_chunk(self, data: &str) -> Option<StreamChunk> {
        match self {
            Self::OpenAi => match serde_json::from_str::<StreamChunk>(data) {
                Ok(chunk) => Some(chunk),
                Err(e) => {
                    tracing::warn!("failed to parse chunk: {e}, data: {data}");
                    None
                }
            },
            Self::Anthropic => match serde_json::from_str::<anthropic::Event>(data) {
                Ok(event) => event.into_chunk(),
                Err(e) => {
                    tracing::warn!("failed to parse anthropic event: {e}, data: {data}");
                    None
                }
            },
        }
    }
}

/// A provider adapter: the shared engine bound to one provider's
/// dialect, profile, and endpoints.
#[derive(Clone)]
pub struct Adapter {
    kind: ProviderKind,
    dialect: Dialect,
    profile: Arc<ProviderProfile>,
    http: HttpEngine,
    client: Client,
    temperature: f32,
}

/// Construct an [`Adapter`] from config and a shared HTTP client,
/// using the built-in profile for the detected provider kind.
pub fn build_adapter(config: &ProviderConfig, client: Client) -> Result<Adapter> {
    let kind = config.kind()?;
    build_adapter_with_profile(config, ProviderProfile::for_kind(kind), client)
}

/// Construct an [`Adapter`] with an explicit capability profile.
pub fn build_adapter_with_profile(
    config: &ProviderConfig,
    profile: ProviderProfile,
    client: Client,
) -> Result<Adapter> {
    let kind = config.kind()?;
    let api_key = config.api_key.as_deref().unwrap_or("");

    // A base_url override always targets an OpenAI-compatible endpoint.
    let (dialect, chat, models) = match (config.base_url.as_deref(), kind) {
        (Some(base), _) => {
            let base = base.trim_end_matches('/');
            (
                Dialect::OpenAi,
                format!("{base}/chat/completions"),
                format!("{base}/models"),
            )
        }
        (None, kind) => {
            let (chat, models) = endpoint::for_kind(kind);
            let dialect = match kind {
                ProviderKind::Claude => Dialect::Anthropic,
                _ => Dialect::OpenAi,
            };
            (dialect, chat.to_owned(), models.to_owned())
        }
    };

    let http = match dialect {
        Dialect::OpenAi => HttpEngine::bearer(client.clone(), api_key, &chat, &models)?,
        Dialect::Anthropic => HttpEngine::custom_headers(
            client.clone(),
            &[("x-api-key", api_key), ("anthropic-version", ANTHROPIC_VERSION)],
            &chat,
            &models,
        )?,
    };

    Ok(Adapter {
        kind,
        dialect,
        profile: Arc::new(profile),
        http,
        client,
        temperature: config.temperature.unwrap_or(DEFAULT_TEMPERATURE),
    })
}

impl Adapter {
    /// The provider kind this adapter serves.
    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// The wire dialect this adapter speaks.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// The capability profile this adapter consults.
    pub fn profile(&self) -> &ProviderProfile {
        &self.profile
    }

    fn temperature_for(&self, model: &str) -> Option<f32> {
        (!self.profile.should_disable_temperature(model)).then_some(self.temperature)
    }

    /// Reject statically known capability gaps before any network call.
    fn check_image_support(&self, history: &[Message], model: &str) -> Result<()> {
        if history.iter().any(|m| m.content.has_image())
            && !self.profile.supports_image_input(model)
        {
            return Err(Error::Unsupported {
                model: model.into(),
                capability: "image input",
            });
        }
        Ok(())
    }

    /// Send one request and return the response text per dialect.
    /// Replies cut off at the output-token limit are logged.
    async fn request_text(&self, request: &crate::request::ChatRequest) -> Result<String> {
        let text = self.http.post(request).await?;
        let (text, reason) = match self.dialect {
            Dialect::OpenAi => {
                let response: Response = serde_json::from_str(&text)?;
                (
                    response.content().unwrap_or_default().to_owned(),
                    response.reason(),
                )
            }
            Dialect::Anthropic => {
                let completion: anthropic::Completion = serde_json::from_str(&text)?;
                (completion.text(), completion.reason())
            }
        };
        if reason == Some(FinishReason::Length) {
            tracing::warn!("completion truncated at the output token limit");
        }
        Ok(text)
    }

    /// The streaming delivery loop shared by both streaming entry
    /// points: build the role list, then either one-shot with a single
    /// synthetic token (streaming disabled for the model) or forward
    /// fragments in arrival order, skipping delivery once cancelled
    /// while still draining the transport.
    async fn deliver<F>(
        &self,
        system_prompt: &str,
        history: &[Message],
        model: &str,
        max_tokens: usize,
        mut on_token: F,
        cancel: &CancellationToken,
    ) -> Result<()>
    where
        F: FnMut(&str) + Send,
    {
        self.check_image_support(history, model)?;
        let request = build_request(
            self.dialect,
            &self.profile,
            system_prompt,
            history,
            model,
            max_tokens,
            self.temperature_for(model),
        );

        if self.profile.should_disable_streaming(model) {
            let text = self.request_text(&request).await?;
            if !cancel.is_cancelled() {
                on_token(&text);
            }
            return Ok(());
        }

        let request = request.stream();
        let stream = self.http.sse_data(&request);
        let mut stream = pin!(stream);
        while let Some(payload) = stream.next().await {
            let payload = match payload {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::error!("stream failed for '{model}': {e}");
                    return Err(e);
                }
            };
            let Some(chunk) = self.dialect.parse_chunk(&payload) else {
                continue;
            };
            if cancel.is_cancelled() {
                continue;
            }
            if let Some(token) = chunk.content() {
                on_token(token);
            }
        }
        Ok(())
    }
}

impl ProviderAdapter for Adapter {
    async fn complete_once(
        &self,
        system_prompt: &str,
        user_message: &str,
        model: &str,
        max_tokens: usize,
    ) -> Result<String> {
        let history = [Message::user(user_message)];
        let request = build_request(
            self.dialect,
            &self.profile,
            system_prompt,
            &history,
            model,
            max_tokens,
            self.temperature_for(model),
        );
        self.request_text(&request).await
    }

    async fn stream_with_callback<F>(
        &self,
        system_prompt: &str,
        user_message: &str,
        model: &str,
        max_tokens: usize,
        on_token: F,
        cancel: &CancellationToken,
    ) -> Result<()>
    where
        F: FnMut(&str) + Send,
    {
        let history = [Message::user(user_message)];
        self.deliver(system_prompt, &history, model, max_tokens, on_token, cancel)
            .await
    }

    async fn stream_conversation<F>(
        &self,
        system_prompt: &str,
        history: &[Message],
        model: &str,
        max_tokens: usize,
        on_token: F,
        cancel: &CancellationToken,
    ) -> Result<()>
    where
        F: FnMut(&str) + Send,
    {
        self.deliver(system_prompt, history, model, max_tokens, on_token, cancel)
            .await
    }

    async fn list_models(&self) -> Vec<ModelCatalogEntry> {
        let text = match self.http.get_models().await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("model catalogue fetch failed for {}: {e}", self.kind);
                return Vec::new();
            }
        };
        let list: ModelList = match serde_json::from_str(&text) {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!("model catalogue unparseable for {}: {e}", self.kind);
                return Vec::new();
            }
        };
        catalog::filter_and_rank(list.data, self.kind, &self.profile)
    }

    async fn validate_api_key(&self, key: &str, base_url: Option<&str>) -> bool {
        let (chat, models) = match base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                (format!("{base}/chat/completions"), format!("{base}/models"))
            }
            None => {
                let (chat, models) = endpoint::for_kind(self.kind);
                (chat.to_owned(), models.to_owned())
            }
        };
        let engine = match self.dialect {
            Dialect::OpenAi => HttpEngine::bearer(self.client.clone(), key, &chat, &models),
            Dialect::Anthropic => HttpEngine::custom_headers(
                self.client.clone(),
                &[("x-api-key", key), ("anthropic-version", ANTHROPIC_VERSION)],
                &chat,
                &models,
            ),
        };
        let Ok(engine) = engine else {
            return false;
        };
        match engine.get_models().await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("API key validation failed for {}: {e}", self.kind);
                false
            }
        }
    }

    fn count_tokens(&self, model: &str, text: &str) -> usize {
        token::count(model, text)
    }
}
