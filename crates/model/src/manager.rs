//! `ProviderManager` — concurrent-safe named adapter map with
//! active-provider swapping.

use crate::{Adapter, Error, ProviderConfig, Result, build_adapter};
use compact_str::CompactString;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// Manages a set of named adapters with an active selection.
///
/// All methods that read or mutate the inner state acquire the
/// `RwLock`. Selection methods return a clone of the `Adapter` —
/// callers do not hold the lock while performing LLM calls.
pub struct ProviderManager {
    inner: Arc<RwLock<Inner>>,
}

struct Inner {
    /// Adapter instances keyed by model name.
    providers: BTreeMap<CompactString, (ProviderConfig, Adapter)>,
    /// Model name of the currently active adapter.
    active: CompactString,
    /// Shared HTTP client for constructing new adapters.
    client: reqwest::Client,
}

/// Info about a single provider entry returned by `list()`.
#[derive(Debug, Clone)]
pub struct ProviderEntry {
    /// Provider model name (key).
    pub name: CompactString,
    /// Whether this is the active provider.
    pub active: bool,
}

impl ProviderManager {
    /// Create a new manager from a list of provider configs.
    ///
    /// The first element becomes the active provider. Returns an error
    /// if the slice is empty, any config fails validation, or any
    /// adapter fails to build.
    pub fn from_configs(configs: &[ProviderConfig]) -> Result<Self> {
        if configs.is_empty() {
            return Err(Error::Config(
                "at least one provider config is required".into(),
            ));
        }

        let client = reqwest::Client::new();
        let mut providers = BTreeMap::new();

        for config in configs {
            config.validate()?;
            let adapter = build_adapter(config, client.clone())?;
            providers.insert(config.model.clone(), (config.clone(), adapter));
        }

        let active = configs[0].model.clone();

        Ok(Self {
            inner: Arc::new(RwLock::new(Inner {
                providers,
                active,
                client,
            })),
        })
    }

    /// Create a manager from a full application config, honoring its
    /// per-provider capability-table overrides.
    pub fn from_app_config(config: &crate::AppConfig) -> Result<Self> {
        if config.providers.is_empty() {
            return Err(Error::Config(
                "at least one provider config is required".into(),
            ));
        }

        let client = reqwest::Client::new();
        let mut providers = BTreeMap::new();

        for provider in &config.providers {
            provider.validate()?;
            let profile = config.profile(provider.kind()?);
            let adapter = crate::build_adapter_with_profile(provider, profile, client.clone())?;
            providers.insert(provider.model.clone(), (provider.clone(), adapter));
        }

        let active = config.providers[0].model.clone();

        Ok(Self {
            inner: Arc::new(RwLock::new(Inner {
                providers,
                active,
                client,
            })),
        })
    }

    /// Create a manager with a single adapter.
    pub fn single(config: ProviderConfig, adapter: Adapter) -> Self {
        let model = config.model.clone();
        let mut providers = BTreeMap::new();
        providers.insert(model.clone(), (config, adapter));
        Self {
            inner: Arc::new(RwLock::new(Inner {
                providers,
                active: model,
                client: reqwest::Client::new(),
            })),
        }
    }

    /// Get a clone of the active adapter.
    pub fn active(&self) -> Adapter {
        let inner = self.inner.read().expect("provider lock poisoned");
        inner.providers[&inner.active].1.clone()
    }

    /// Get the model name of the active adapter (also its key).
    pub fn active_model(&self) -> CompactString {
        let inner = self.inner.read().expect("provider lock poisoned");
        inner.active.clone()
    }

    /// Get the adapter registered for a model name.
    pub fn for_model(&self, model: &str) -> Result<Adapter> {
        let inner = self.inner.read().expect("provider lock poisoned");
        inner
            .providers
            .get(model)
            .map(|(_, adapter)| adapter.clone())
            .ok_or_else(|| Error::Config(format!("provider '{model}' not found")))
    }

    /// Switch to a different adapter by model name. Returns an error if
    /// the name is not found.
    pub fn switch(&self, model: &str) -> Result<()> {
        let mut inner = self.inner.write().expect("provider lock poisoned");
        if !inner.providers.contains_key(model) {
            return Err(Error::Config(format!("provider '{model}' not found")));
        }
        inner.active = CompactString::from(model);
        Ok(())
    }

    /// Add a new adapter. Validates config first. Replaces any existing
    /// entry with the same model name.
    pub fn add(&self, config: &ProviderConfig) -> Result<()> {
        config.validate()?;
        let client = {
            let inner = self.inner.read().expect("provider lock poisoned");
            inner.client.clone()
        };
        let adapter = build_adapter(config, client)?;
        let mut inner = self.inner.write().expect("provider lock poisoned");
        inner
            .providers
            .insert(config.model.clone(), (config.clone(), adapter));
        Ok(())
    }

    /// Remove an adapter by model name. Fails if it is currently
    /// active.
    pub fn remove(&self, model: &str) -> Result<()> {
        let mut inner = self.inner.write().expect("provider lock poisoned");
        if inner.active == model {
            return Err(Error::Config(format!(
                "cannot remove the active provider '{model}'"
            )));
        }
        if inner.providers.remove(model).is_none() {
            return Err(Error::Config(format!("provider '{model}' not found")));
        }
        Ok(())
    }

    /// List all providers with their active status.
    pub fn list(&self) -> Vec<ProviderEntry> {
        let inner = self.inner.read().expect("provider lock poisoned");
        inner
            .providers
            .keys()
            .map(|name| ProviderEntry {
                name: name.clone(),
                active: *name == inner.active,
            })
            .collect()
    }
}

impl std::fmt::Debug for ProviderManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read().expect("provider lock poisoned");
        f.debug_struct("ProviderManager")
            .field("active", &inner.active)
            .field("count", &inner.providers.len())
            .finish()
    }
}

impl Clone for ProviderManager {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
