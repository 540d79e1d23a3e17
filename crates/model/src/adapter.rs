//! The provider contract.
//!
//! Every backend answers the same capability set: one-shot completion,
//! streaming with a token callback, catalogue retrieval, API-key
//! validation, and token counting. Token callbacks run synchronously
//! relative to each transport notification and must not block; the
//! cancellation token is observed before every forward, never set by
//! the adapter.

use crate::{ModelCatalogEntry, Result, token};
use llm::Message;
use tokio_util::sync::CancellationToken;

/// The contract every provider adapter satisfies.
pub trait ProviderAdapter: Clone + Send + Sync {
    /// Send one system prompt + user turn and return the full response
    /// text. Transport and auth failures propagate unchanged.
    fn complete_once(
        &self,
        system_prompt: &str,
        user_message: &str,
        model: &str,
        max_tokens: usize,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Stream a single user turn, invoking `on_token` once per received
    /// fragment in arrival order. Models whose family disables
    /// streaming deliver the entire response as one synthetic token;
    /// callers must not assume multiple invocations. Once `cancel` is
    /// cancelled, no further fragments are forwarded (the transport may
    /// still drain).
    fn stream_with_callback<F>(
        &self,
        system_prompt: &str,
        user_message: &str,
        model: &str,
        max_tokens: usize,
        on_token: F,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<()>> + Send
    where
        F: FnMut(&str) + Send;

    /// Stream a full ordered message history. Same streaming and
    /// cancellation semantics as [`Self::stream_with_callback`]; the
    /// system prompt is prepended per the provider's system-role rule
    /// and temperature is forwarded unless disabled for the model.
    fn stream_conversation<F>(
        &self,
        system_prompt: &str,
        history: &[Message],
        model: &str,
        max_tokens: usize,
        on_token: F,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<()>> + Send
    where
        F: FnMut(&str) + Send;

    /// Fetch the provider's model catalogue: excluded ids filtered out,
    /// priority ids first, the rest alphabetical. Best-effort — any
    /// failure yields an empty list, never an error.
    fn list_models(&self) -> impl Future<Output = Vec<ModelCatalogEntry>> + Send;

    /// Probe whether an API key is usable. Returns `false` on any
    /// failure, including network errors; never raises.
    fn validate_api_key(
        &self,
        key: &str,
        base_url: Option<&str>,
    ) -> impl Future<Output = bool> + Send;

    /// Count tokens in `text` for `model`. The default estimator is the
    /// shared fallback every adapter degrades to when no native
    /// tokenizer is available.
    fn count_tokens(&self, model: &str, text: &str) -> usize {
        let _ = model;
        token::estimate(text)
    }
}
