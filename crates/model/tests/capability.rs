//! Tests for capability tables and their TOML form.

use pelican_model::{ProviderKind, ProviderProfile};

#[test]
fn profile_parses_from_toml() {
    let profile = ProviderProfile::from_toml(
        r#"
        convert_system_to_user = ["o1-mini"]
        disable_streaming = ["o1-pro"]
        disable_temperature = ["o1", "o3"]
        no_image_input = ["gpt-3.5"]
        exclude = ["whisper", "tts"]
        priority = ["gpt-4o", "gpt-4"]

        [context_length]
        gpt-4o = 128000

        [max_output_tokens]
        gpt-4o = 16384

        [pricing]
        gpt-4o = { input_per_mtok = 2.5, output_per_mtok = 10.0 }
        "#,
    )
    .unwrap();

    assert!(profile.should_convert_system_to_user("o1-mini-2024"));
    assert!(profile.should_disable_streaming("o1-pro"));
    assert!(profile.should_disable_temperature("o3-mini"));
    assert!(!profile.supports_image_input("gpt-3.5-turbo"));
    assert!(profile.is_excluded("whisper-1"));
    assert_eq!(profile.priority_rank("gpt-4"), 1);
    assert_eq!(profile.context_length("gpt-4o"), Some(128_000));
    assert_eq!(profile.max_output_tokens("gpt-4o"), Some(16_384));
    assert_eq!(
        profile.pricing("gpt-4o").map(|p| p.input_per_mtok),
        Some(2.5)
    );
}

#[test]
fn missing_tables_default_to_empty() {
    let profile = ProviderProfile::from_toml("").unwrap();
    assert!(!profile.should_disable_streaming("anything"));
    assert!(profile.supports_image_input("anything"));
    assert_eq!(profile.priority_rank("anything"), usize::MAX);
    assert_eq!(profile.context_length("anything"), None);
}

#[test]
fn invalid_toml_is_a_config_error() {
    let err = ProviderProfile::from_toml("exclude = 3").unwrap_err();
    assert!(matches!(err, pelican_model::Error::Config(_)));
}

#[test]
fn matching_is_substring_and_case_insensitive() {
    let profile = ProviderProfile {
        disable_temperature: ["o1"].map(Into::into).into(),
        ..Default::default()
    };
    assert!(profile.should_disable_temperature("O1-Preview"));
    assert!(profile.should_disable_temperature("azure/o1-mini"));
    assert!(!profile.should_disable_temperature("gpt-4"));
}

#[test]
fn builtin_openai_profile_has_expected_quirks() {
    let profile = ProviderProfile::for_kind(ProviderKind::OpenAI);
    assert!(profile.should_convert_system_to_user("o1-mini"));
    assert!(profile.should_disable_streaming("o1-pro"));
    assert!(profile.should_disable_temperature("o1"));
    assert!(!profile.supports_image_input("gpt-3.5-turbo"));
    assert!(profile.supports_image_input("gpt-4o"));
    assert!(profile.is_excluded("text-embedding-3-small"));
    assert_eq!(profile.priority_rank("gpt-4o"), 0);
}

#[test]
fn builtin_claude_profile_streams_with_system_role() {
    let profile = ProviderProfile::for_kind(ProviderKind::Claude);
    assert!(!profile.should_convert_system_to_user("claude-sonnet-4-0"));
    assert!(!profile.should_disable_streaming("claude-sonnet-4-0"));
    assert!(profile.supports_image_input("claude-sonnet-4-0"));
    assert!(profile.is_excluded("claude-instant-1.2"));
}

#[test]
fn openai_compatible_kinds_start_unconstrained() {
    for kind in [ProviderKind::Grok, ProviderKind::Qwen, ProviderKind::Kimi] {
        let profile = ProviderProfile::for_kind(kind);
        assert!(!profile.should_disable_streaming("any-model"));
        assert!(profile.supports_image_input("any-model"));
    }
}
