//! Model catalogue retrieval types and ranking.
//!
//! Catalogue entries are built per fetch and handed to the caller as
//! plain data; nothing is cached here. Context length and max output
//! tokens resolve override table → remote-reported value → default.

use crate::{ProviderKind, ProviderProfile};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Context length assumed when neither the override table nor the
/// remote API reports one.
pub const DEFAULT_CONTEXT_LENGTH: usize = 4096;

/// Max output tokens assumed when neither the override table nor the
/// remote API reports one.
pub const DEFAULT_MAX_OUTPUT_TOKENS: usize = 4096;

/// A normalized description of a queryable model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelCatalogEntry {
    /// The provider-scoped model id
    pub id: CompactString,

    /// Human-readable name (falls back to the id)
    pub display_name: CompactString,

    /// The provider exposing this model
    pub provider: ProviderKind,

    /// Context window size in tokens
    pub context_length: usize,

    /// Maximum output tokens per completion
    pub max_output_tokens: usize,

    /// Pricing, when known
    pub pricing: Option<Pricing>,
}

/// Model pricing in USD per million tokens.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Pricing {
    /// Input (prompt) price per million tokens
    pub input_per_mtok: f64,

    /// Output (completion) price per million tokens
    pub output_per_mtok: f64,
}

impl Pricing {
    /// Create a pricing entry.
    pub fn new(input_per_mtok: f64, output_per_mtok: f64) -> Self {
        Self {
            input_per_mtok,
            output_per_mtok,
        }
    }
}

/// A model descriptor as reported by a provider's catalogue API.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteModel {
    /// The model id
    pub id: CompactString,

    /// Human-readable name, when the API reports one
    #[serde(default)]
    pub display_name: Option<CompactString>,

    /// Context window, when the API reports one
    #[serde(default, alias = "context_window")]
    pub context_length: Option<usize>,

    /// Max output tokens, when the API reports one
    #[serde(default, alias = "max_tokens")]
    pub max_output_tokens: Option<usize>,
}

/// The catalogue response envelope (`{"data": [...]}`).
#[derive(Debug, Deserialize)]
pub struct ModelList {
    /// The reported models
    #[serde(default)]
    pub data: Vec<RemoteModel>,
}

/// Filter a raw catalogue through a profile and rank the survivors.
///
/// Excluded ids are dropped; ids on the priority list sort first, in
/// list order, and everything else follows alphabetically by id.
pub fn filter_and_rank(
    raw: Vec<RemoteModel>,
    provider: ProviderKind,
    profile: &ProviderProfile,
) -> Vec<ModelCatalogEntry> {
    let mut entries: Vec<ModelCatalogEntry> = raw
        .into_iter()
        .filter(|model| !profile.is_excluded(&model.id))
        .map(|model| {
            let context_length = profile
                .context_length(&model.id)
                .or(model.context_length)
                .unwrap_or(DEFAULT_CONTEXT_LENGTH);
            let max_output_tokens = profile
                .max_output_tokens(&model.id)
                .or(model.max_output_tokens)
                .unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS);
            ModelCatalogEntry {
                display_name: model.display_name.unwrap_or_else(|| model.id.clone()),
                pricing: profile.pricing(&model.id),
                id: model.id,
                provider,
                context_length,
                max_output_tokens,
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        (profile.priority_rank(&a.id), &a.id).cmp(&(profile.priority_rank(&b.id), &b.id))
    });
    entries
}
