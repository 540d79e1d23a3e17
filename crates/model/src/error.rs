//! Error taxonomy for provider requests.
//!
//! `Transport` propagates for one-shot calls and stream setup; catalogue
//! retrieval swallows it into an empty list and key validation into
//! `false`. `Unsupported` is raised before any network call when a
//! capability gap is statically known from the provider profile.

use compact_str::CompactString;

/// Provider request error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Network or HTTP failure reaching the remote API.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The selected model is statically known not to support the
    /// requested capability.
    #[error("model '{model}' does not support {capability}")]
    Unsupported {
        /// The model the request targeted
        model: CompactString,
        /// The unsupported capability
        capability: &'static str,
    },

    /// The provider response could not be parsed.
    #[error("failed to parse provider response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Invalid provider configuration.
    #[error("invalid provider configuration: {0}")]
    Config(String),
}

/// Result alias for provider operations.
pub type Result<T> = std::result::Result<T, Error>;
