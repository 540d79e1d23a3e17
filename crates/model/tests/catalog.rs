//! Tests for catalogue filtering, ranking, and limit resolution.

use pelican_model::{
    DEFAULT_CONTEXT_LENGTH, DEFAULT_MAX_OUTPUT_TOKENS, Pricing, ProviderKind, ProviderProfile,
    RemoteModel, filter_and_rank,
};

fn remote(id: &str) -> RemoteModel {
    serde_json::from_value(serde_json::json!({ "id": id })).unwrap()
}

#[test]
fn excludes_then_orders_by_priority_then_alphabetical() {
    let profile = ProviderProfile {
        exclude: ["whisper"].map(Into::into).into(),
        priority: ["gpt-4o", "gpt-4"].map(Into::into).into(),
        ..Default::default()
    };
    let raw = ["gpt-4o", "whisper-1", "gpt-4", "aaa-custom"]
        .map(remote)
        .to_vec();

    let entries = filter_and_rank(raw, ProviderKind::OpenAI, &profile);
    let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["gpt-4o", "gpt-4", "aaa-custom"]);
}

#[test]
fn exclusion_is_case_insensitive() {
    let profile = ProviderProfile {
        exclude: ["whisper"].map(Into::into).into(),
        ..Default::default()
    };
    let raw = vec![remote("Whisper-Large-V3"), remote("gpt-4o")];

    let entries = filter_and_rank(raw, ProviderKind::OpenAI, &profile);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, "gpt-4o");
}

#[test]
fn non_priority_ids_sort_alphabetically() {
    let profile = ProviderProfile::default();
    let raw = ["zeta", "alpha", "mid"].map(remote).to_vec();

    let entries = filter_and_rank(raw, ProviderKind::OpenAI, &profile);
    let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["alpha", "mid", "zeta"]);
}

#[test]
fn override_beats_remote_value() {
    let profile = ProviderProfile {
        context_length: [("gpt-4o", 128_000)].map(|(k, v)| (k.into(), v)).into(),
        ..Default::default()
    };
    let raw: Vec<RemoteModel> = vec![
        serde_json::from_value(serde_json::json!({ "id": "gpt-4o", "context_length": 9 }))
            .unwrap(),
    ];

    let entries = filter_and_rank(raw, ProviderKind::OpenAI, &profile);
    assert_eq!(entries[0].context_length, 128_000);
}

#[test]
fn remote_value_used_without_override() {
    let raw: Vec<RemoteModel> = vec![
        serde_json::from_value(serde_json::json!({
            "id": "some-model",
            "context_length": 32_000,
            "max_tokens": 2_048,
        }))
        .unwrap(),
    ];

    let entries = filter_and_rank(raw, ProviderKind::OpenAI, &ProviderProfile::default());
    assert_eq!(entries[0].context_length, 32_000);
    assert_eq!(entries[0].max_output_tokens, 2_048);
}

#[test]
fn defaults_apply_when_nothing_is_known() {
    let entries = filter_and_rank(
        vec![remote("mystery-model")],
        ProviderKind::OpenAI,
        &ProviderProfile::default(),
    );
    assert_eq!(entries[0].context_length, DEFAULT_CONTEXT_LENGTH);
    assert_eq!(entries[0].max_output_tokens, DEFAULT_MAX_OUTPUT_TOKENS);
    assert_eq!(entries[0].pricing, None);
}

#[test]
fn display_name_falls_back_to_id() {
    let raw: Vec<RemoteModel> = vec![
        remote("plain-id"),
        serde_json::from_value(
            serde_json::json!({ "id": "claude-sonnet-4-0", "display_name": "Claude Sonnet 4" }),
        )
        .unwrap(),
    ];

    let entries = filter_and_rank(raw, ProviderKind::Claude, &ProviderProfile::default());
    let by_id = |id: &str| entries.iter().find(|e| e.id == id).unwrap().clone();
    assert_eq!(by_id("plain-id").display_name, "plain-id");
    assert_eq!(by_id("claude-sonnet-4-0").display_name, "Claude Sonnet 4");
}

#[test]
fn pricing_comes_from_the_profile() {
    let profile = ProviderProfile {
        pricing: [("gpt-4o", Pricing::new(2.5, 10.0))]
            .map(|(k, v)| (k.into(), v))
            .into(),
        ..Default::default()
    };

    let entries = filter_and_rank(vec![remote("gpt-4o")], ProviderKind::OpenAI, &profile);
    assert_eq!(entries[0].pricing, Some(Pricing::new(2.5, 10.0)));
}
