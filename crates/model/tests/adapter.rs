//! Adapter construction, routing, and best-effort probe tests.
//!
//! Network probes point at a TCP discard port so they fail fast without
//! a live backend.

use compact_str::CompactString;
use llm::{Message, Part};
use pelican_model::{
    CancellationToken, Client, Dialect, Error, ProviderAdapter, ProviderConfig, ProviderKind,
    ProviderManager, build_adapter,
};

const DEAD_ENDPOINT: &str = "http://127.0.0.1:9";

fn config(model: &str) -> ProviderConfig {
    ProviderConfig {
        model: CompactString::from(model),
        api_key: Some("sk-test".into()),
        base_url: None,
        temperature: None,
    }
}

#[test]
fn claude_models_route_to_the_anthropic_dialect() {
    let adapter = build_adapter(&config("claude-sonnet-4-0"), Client::new()).unwrap();
    assert_eq!(adapter.kind(), ProviderKind::Claude);
    assert_eq!(adapter.dialect(), Dialect::Anthropic);
}

#[test]
fn openai_compatible_kinds_route_to_the_openai_dialect() {
    for model in ["gpt-4o", "deepseek-chat", "grok-3", "qwen-max", "kimi-k2"] {
        let adapter = build_adapter(&config(model), Client::new()).unwrap();
        assert_eq!(adapter.dialect(), Dialect::OpenAi, "model {model}");
    }
}

#[test]
fn base_url_override_forces_the_openai_dialect() {
    let mut cfg = config("claude-sonnet-4-0");
    cfg.base_url = Some(DEAD_ENDPOINT.into());
    let adapter = build_adapter(&cfg, Client::new()).unwrap();
    assert_eq!(adapter.dialect(), Dialect::OpenAi);
}

#[tokio::test]
async fn list_models_yields_empty_on_transport_failure() {
    let mut cfg = config("gpt-4o");
    cfg.base_url = Some(DEAD_ENDPOINT.into());
    let adapter = build_adapter(&cfg, Client::new()).unwrap();
    assert!(adapter.list_models().await.is_empty());
}

#[tokio::test]
async fn validate_api_key_is_false_on_transport_failure() {
    let adapter = build_adapter(&config("gpt-4o"), Client::new()).unwrap();
    assert!(!adapter.validate_api_key("sk-bogus", Some(DEAD_ENDPOINT)).await);
}

#[tokio::test]
async fn image_input_is_rejected_before_any_network_call() {
    // The dead endpoint would surface as a transport error if the
    // request ever left the process; the capability gap must win.
    let mut cfg = config("gpt-3.5-turbo");
    cfg.base_url = Some(DEAD_ENDPOINT.into());
    let adapter = build_adapter(&cfg, Client::new()).unwrap();

    let history = vec![Message::user_parts([
        Part::Text {
            text: "what is in this picture?".into(),
        },
        Part::ImageUrl {
            url: "https://example.com/cat.png".into(),
        },
    ])];
    let err = adapter
        .stream_conversation(
            "",
            &history,
            "gpt-3.5-turbo",
            64,
            |_token: &str| {},
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Unsupported {
            capability: "image input",
            ..
        }
    ));
}

#[test]
fn count_tokens_never_returns_zero_for_nonempty_text() {
    let adapter = build_adapter(&config("gpt-4o"), Client::new()).unwrap();
    assert!(adapter.count_tokens("gpt-4o", "hello world") > 0);
    assert!(adapter.count_tokens("some-unknown-model", "hi") > 0);
}

#[test]
fn manager_switches_adds_and_removes() {
    let manager =
        ProviderManager::from_configs(&[config("deepseek-chat"), config("gpt-4o")]).unwrap();
    assert_eq!(manager.active_model(), "deepseek-chat");

    manager.switch("gpt-4o").unwrap();
    assert_eq!(manager.active_model(), "gpt-4o");
    assert!(manager.switch("missing").is_err());

    manager.add(&config("claude-sonnet-4-0")).unwrap();
    assert!(manager.for_model("claude-sonnet-4-0").is_ok());

    // The active provider cannot be removed.
    assert!(manager.remove("gpt-4o").is_err());
    manager.remove("deepseek-chat").unwrap();

    let names: Vec<_> = manager.list().into_iter().map(|e| e.name).collect();
    assert_eq!(names, ["claude-sonnet-4-0", "gpt-4o"]);
}

#[test]
fn manager_rejects_empty_and_invalid_configs() {
    assert!(ProviderManager::from_configs(&[]).is_err());

    let mut bad = config("gpt-4o");
    bad.api_key = None;
    assert!(ProviderManager::from_configs(&[bad]).is_err());
}
