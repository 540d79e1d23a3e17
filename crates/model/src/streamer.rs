//! Single-request streaming orchestration.
//!
//! A `ConversationStreamer` owns exactly one in-flight request's
//! accumulation: tokens are forwarded to the caller's sink in arrival
//! order and folded through a [`llm::MessageBuilder`], and the finished
//! message is handed over only on success. A failed request discards
//! the partial accumulation — callers never see a half response as a
//! result value.

use crate::{ProviderAdapter, ProviderManager, Result};
use llm::{Message, Role};
use tokio_util::sync::CancellationToken;

/// Orchestrates one streaming conversation request at a time.
pub struct ConversationStreamer {
    manager: ProviderManager,
}

impl ConversationStreamer {
    /// Create a streamer selecting adapters from `manager`.
    pub fn new(manager: ProviderManager) -> Self {
        Self { manager }
    }

    /// Stream one conversation through the adapter registered for
    /// `model`, forwarding each token to `sink` and returning the full
    /// accumulated text.
    pub async fn stream<F>(
        &self,
        system_prompt: &str,
        history: &[Message],
        model: &str,
        max_tokens: usize,
        sink: F,
        cancel: &CancellationToken,
    ) -> Result<String>
    where
        F: FnMut(&str) + Send,
    {
        let adapter = self.manager.for_model(model)?;
        Self::stream_with(&adapter, system_prompt, history, model, max_tokens, sink, cancel).await
    }

    /// Stream one conversation through an explicit adapter.
    ///
    /// The accumulated string is exactly the concatenation of the
    /// tokens forwarded to `sink` — no trimming, no normalization.
    pub async fn stream_with<A, F>(
        adapter: &A,
        system_prompt: &str,
        history: &[Message],
        model: &str,
        max_tokens: usize,
        sink: F,
        cancel: &CancellationToken,
    ) -> Result<String>
    where
        A: ProviderAdapter,
        F: FnMut(&str) + Send,
    {
        let message =
            Self::stream_message(adapter, system_prompt, history, model, max_tokens, sink, cancel)
                .await?;
        Ok(message.content.text())
    }

    /// Stream one conversation and fold the reply into a `Message`
    /// tagged with the producing model, ready to append to the history.
    pub async fn stream_message<A, F>(
        adapter: &A,
        system_prompt: &str,
        history: &[Message],
        model: &str,
        max_tokens: usize,
        mut sink: F,
        cancel: &CancellationToken,
    ) -> Result<Message>
    where
        A: ProviderAdapter,
        F: FnMut(&str) + Send,
    {
        let mut builder = Message::builder(Role::Ai(model.into()));
        adapter
            .stream_conversation(
                system_prompt,
                history,
                model,
                max_tokens,
                |token: &str| {
                    builder.push(token);
                    sink(token);
                },
                cancel,
            )
            .await?;
        Ok(builder.build())
    }
}
