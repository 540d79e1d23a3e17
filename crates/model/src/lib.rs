//! Pelican LLM provider adapters.
//!
//! One shared engine speaks every supported backend: a provider is a
//! wire [`Dialect`] plus a [`ProviderProfile`] of capability and
//! catalogue data, so per-provider quirks live in data rather than in
//! code. The [`ProviderAdapter`] trait is the contract; the
//! [`ConversationStreamer`] drives a single streaming request and
//! hands the caller an accumulated result.

pub use adapter::ProviderAdapter;
pub use capability::ProviderProfile;
pub use catalog::{
    DEFAULT_CONTEXT_LENGTH, DEFAULT_MAX_OUTPUT_TOKENS, ModelCatalogEntry, ModelList, Pricing,
    RemoteModel, filter_and_rank,
};
pub use config::{AppConfig, ProviderConfig, ProviderKind};
pub use error::{Error, Result};
pub use http::HttpEngine;
pub use manager::{ProviderEntry, ProviderManager};
pub use provider::{
    Adapter, DEFAULT_TEMPERATURE, Dialect, build_adapter, build_adapter_with_profile, endpoint,
};
pub use reqwest::{self, Client};
pub use streamer::ConversationStreamer;
pub use tokio_util::sync::CancellationToken;

mod adapter;
mod anthropic;
mod capability;
mod catalog;
mod config;
mod error;
mod http;
mod manager;
mod provider;
mod request;
mod streamer;
pub mod token;
