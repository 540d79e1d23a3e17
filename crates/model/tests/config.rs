//! Tests for provider configuration, kind detection, and TOML loading.

use compact_str::CompactString;
use pelican_model::{AppConfig, Error, ProviderConfig, ProviderKind};

fn config(model: &str) -> ProviderConfig {
    ProviderConfig {
        model: CompactString::from(model),
        api_key: Some("sk-test".into()),
        base_url: None,
        temperature: None,
    }
}

#[test]
fn kind_is_detected_from_model_prefix() {
    let cases = [
        ("deepseek-chat", ProviderKind::DeepSeek),
        ("deepseek-reasoner", ProviderKind::DeepSeek),
        ("gpt-4o", ProviderKind::OpenAI),
        ("chatgpt-4o-latest", ProviderKind::OpenAI),
        ("o1-mini", ProviderKind::OpenAI),
        ("o3", ProviderKind::OpenAI),
        ("o4-mini", ProviderKind::OpenAI),
        ("claude-sonnet-4-0", ProviderKind::Claude),
        ("grok-3", ProviderKind::Grok),
        ("qwen-max", ProviderKind::Qwen),
        ("qwq-32b", ProviderKind::Qwen),
        ("kimi-k2", ProviderKind::Kimi),
        ("moonshot-v1-8k", ProviderKind::Kimi),
    ];
    for (model, expected) in cases {
        assert_eq!(config(model).kind().unwrap(), expected, "model {model}");
    }
}

#[test]
fn detection_is_case_insensitive() {
    assert_eq!(config("GPT-4o").kind().unwrap(), ProviderKind::OpenAI);
    assert_eq!(config("Claude-Opus-4-0").kind().unwrap(), ProviderKind::Claude);
}

#[test]
fn unknown_model_prefix_is_rejected() {
    let err = config("llama-3").kind().unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn validate_requires_model_and_credentials() {
    let mut cfg = config("gpt-4o");
    cfg.model = CompactString::default();
    assert!(cfg.validate().is_err());

    let mut cfg = config("gpt-4o");
    cfg.api_key = None;
    assert!(cfg.validate().is_err());

    // A base URL stands in for an API key (local proxy).
    cfg.base_url = Some("http://localhost:11434/v1".into());
    assert!(cfg.validate().is_ok());

    assert!(config("gpt-4o").validate().is_ok());
}

#[test]
fn app_config_parses_providers_and_expands_env() {
    unsafe { std::env::set_var("PELICAN_TEST_API_KEY", "sk-from-env") };
    let config = AppConfig::from_toml(
        r#"
        [[providers]]
        model = "deepseek-chat"
        api_key = "${PELICAN_TEST_API_KEY}"

        [[providers]]
        model = "claude-sonnet-4-0"
        api_key = "sk-literal"
        temperature = 0.2
        "#,
    )
    .unwrap();

    assert_eq!(config.providers.len(), 2);
    assert_eq!(config.providers[0].api_key.as_deref(), Some("sk-from-env"));
    assert_eq!(config.providers[1].temperature, Some(0.2));
}

#[test]
fn app_config_profile_override_replaces_builtin() {
    let config = AppConfig::from_toml(
        r#"
        [[providers]]
        model = "gpt-4o"
        api_key = "sk-test"

        [profiles.openai]
        disable_streaming = ["gpt-4o"]
        "#,
    )
    .unwrap();

    let profile = config.profile(ProviderKind::OpenAI);
    assert!(profile.should_disable_streaming("gpt-4o"));
    // The override is a full replacement, not a merge.
    assert!(!profile.is_excluded("whisper-1"));

    // Kinds without an override still get the built-in tables.
    let claude = config.profile(ProviderKind::Claude);
    assert!(claude.is_excluded("claude-instant-1.2"));
}

#[test]
fn empty_toml_yields_empty_config() {
    let config = AppConfig::from_toml("").unwrap();
    assert!(config.providers.is_empty());
    assert!(config.profiles.is_empty());
}
