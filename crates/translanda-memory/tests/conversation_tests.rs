// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the conversation store and responder over real JSON files.

use std::sync::Arc;

use translanda_core::types::{MemoryMap, UserId};
use translanda_core::TranslandaError;
use translanda_memory::{Reply, UserState};
use translanda_test_utils::harness::entry;
use translanda_test_utils::{MockProvider, TestHarness};

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn new_user_is_seeded_then_extended() {
    let harness = TestHarness::builder()
        .with_base_conversation(lines(&["User: hi", "Model: hello"]))
        .with_mock_responses(vec!["goodbye".into()])
        .build()
        .await
        .unwrap();

    let reply = harness.send("100", "bye").await.unwrap();
    assert_eq!(reply, Reply::Generated("goodbye".into()));

    assert_eq!(
        harness.transcript("100").await.unwrap().unwrap(),
        lines(&["User: hi", "Model: hello", "User: bye", "Model: goodbye"])
    );
    assert_eq!(
        harness.provider.prompts().await,
        vec!["Conversation history:\nUser: hi\nModel: hello\nUser: bye\nModel:"]
    );
}

#[tokio::test]
async fn seed_is_persisted_before_the_provider_is_called() {
    let harness = TestHarness::builder()
        .with_base_conversation(lines(&["User: hi", "Model: hello"]))
        .build()
        .await
        .unwrap();
    harness.provider.fail_with("backend down").await;

    let err = harness.send("7", "hola?").await.unwrap_err();
    assert!(matches!(err, TranslandaError::Provider { .. }));

    // The seed survived even though the turn failed.
    assert_eq!(
        harness.transcript("7").await.unwrap().unwrap(),
        lines(&["User: hi", "Model: hello"])
    );
}

#[tokio::test]
async fn state_moves_from_unseen_to_active_once() {
    let harness = TestHarness::builder().build().await.unwrap();
    let user = UserId::from("55");

    assert_eq!(harness.conversations.state(&user).await.unwrap(), UserState::Unseen);
    harness.send("55", "uno").await.unwrap();
    assert_eq!(harness.conversations.state(&user).await.unwrap(), UserState::Active);
    harness.send("55", "dos").await.unwrap();
    assert_eq!(harness.conversations.state(&user).await.unwrap(), UserState::Active);
}

#[tokio::test]
async fn absent_base_conversation_seeds_empty_transcript() {
    let harness = TestHarness::builder()
        .with_mock_responses(vec!["ok".into()])
        .build()
        .await
        .unwrap();

    harness.send("1", "hola").await.unwrap();
    assert_eq!(
        harness.transcript("1").await.unwrap().unwrap(),
        lines(&["User: hola", "Model: ok"])
    );
}

#[tokio::test]
async fn transcript_grows_by_one_pair_per_call_under_the_cap() {
    let harness = TestHarness::builder().build().await.unwrap();

    for expected in [2, 4, 6] {
        harness.send("3", "same question").await.unwrap();
        let stored = harness.transcript("3").await.unwrap().unwrap();
        assert_eq!(stored.len(), expected);
    }
}

#[tokio::test]
async fn repeated_messages_are_not_deduplicated() {
    let harness = TestHarness::builder()
        .with_mock_responses(vec!["same".into(), "same".into()])
        .build()
        .await
        .unwrap();

    harness.send("4", "hola").await.unwrap();
    harness.send("4", "hola").await.unwrap();

    assert_eq!(
        harness.transcript("4").await.unwrap().unwrap(),
        lines(&["User: hola", "Model: same", "User: hola", "Model: same"])
    );
}

#[tokio::test]
async fn prompt_uses_only_trailing_window() {
    let mut memory = MemoryMap::new();
    memory.insert(
        "8".into(),
        lines(&["User: a", "Model: b", "User: c", "Model: d", "User: e"]),
    );
    let harness = TestHarness::builder()
        .with_memory(memory)
        .with_max_lines(2)
        .with_mock_responses(vec!["f".into()])
        .build()
        .await
        .unwrap();

    harness.send("8", "g").await.unwrap();

    assert_eq!(
        harness.provider.prompts().await,
        vec!["Conversation history:\nModel: d\nUser: e\nUser: g\nModel:"]
    );
    // Written back as the window plus the new pair.
    assert_eq!(
        harness.transcript("8").await.unwrap().unwrap(),
        lines(&["Model: d", "User: e", "User: g", "Model: f"])
    );
}

#[tokio::test]
async fn empty_generation_uses_fallback_reply() {
    let harness = TestHarness::builder()
        .with_mock_responses(vec!["".into(), "   ".into()])
        .build()
        .await
        .unwrap();

    for _ in 0..2 {
        let reply = harness.send("5", "???").await.unwrap();
        assert_eq!(reply, Reply::Generated("Could not understand the question.".into()));
    }
    let stored = harness.transcript("5").await.unwrap().unwrap();
    assert_eq!(stored[1], "Model: Could not understand the question.");
}

#[tokio::test]
async fn curated_reply_skips_provider_and_transcript() {
    let harness = TestHarness::builder()
        .with_curated(vec![entry(&["hola"], "¡Hola!")])
        .build()
        .await
        .unwrap();

    let reply = harness.send("6", "hola").await.unwrap();

    assert_eq!(reply, Reply::Curated("¡Hola!".into()));
    assert_eq!(harness.provider.call_count().await, 0);
    assert!(harness.transcript("6").await.unwrap().is_none());
}

#[tokio::test]
async fn blank_curated_response_falls_through_to_provider() {
    let harness = TestHarness::builder()
        .with_curated(vec![entry(&["hola"], "")])
        .with_mock_responses(vec!["¡Hola! ¿Qué viaje te interesa?".into()])
        .build()
        .await
        .unwrap();

    let reply = harness.send("6", "hola").await.unwrap();

    assert_eq!(reply, Reply::Generated("¡Hola! ¿Qué viaje te interesa?".into()));
    assert_eq!(harness.provider.call_count().await, 1);
    let stored = harness.transcript("6").await.unwrap().unwrap();
    assert_eq!(stored.last().map(String::as_str), Some("Model: ¡Hola! ¿Qué viaje te interesa?"));
}

#[tokio::test]
async fn miss_falls_through_to_provider() {
    let harness = TestHarness::builder()
        .with_curated(vec![entry(&["horario de salida"], "A las 5am.")])
        .with_mock_responses(vec!["Te ayudo con eso.".into()])
        .build()
        .await
        .unwrap();

    let reply = harness.send("6", "quiero reservar dos puestos").await.unwrap();
    assert_eq!(reply, Reply::Generated("Te ayudo con eso.".into()));
    assert_eq!(harness.provider.call_count().await, 1);
}

#[tokio::test]
async fn malformed_memory_propagates() {
    let harness = TestHarness::builder().build().await.unwrap();
    std::fs::write(&harness.memory_path, "{\"1\": [").unwrap();

    let err = harness.send("1", "hola").await.unwrap_err();
    assert!(matches!(err, TranslandaError::MalformedStore { .. }), "got {err:?}");
    assert_eq!(harness.provider.call_count().await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_users_do_not_lose_updates() {
    let harness = Arc::new(TestHarness::builder().build().await.unwrap());

    let mut tasks = Vec::new();
    for user in 0..16 {
        let harness = harness.clone();
        tasks.push(tokio::spawn(async move {
            harness.send(&user.to_string(), "hola").await.unwrap();
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let memory = harness.memory().await.unwrap();
    assert_eq!(memory.len(), 16);
    assert!(memory.values().all(|t| t.len() == 2));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn overlapping_messages_from_one_user_both_land() {
    let harness = Arc::new(TestHarness::builder().build().await.unwrap());

    let a = {
        let harness = harness.clone();
        tokio::spawn(async move { harness.send("42", "uno").await.unwrap() })
    };
    let b = {
        let harness = harness.clone();
        tokio::spawn(async move { harness.send("42", "dos").await.unwrap() })
    };
    a.await.unwrap();
    b.await.unwrap();

    let stored = harness.transcript("42").await.unwrap().unwrap();
    assert_eq!(stored.len(), 4);
    assert!(stored.contains(&"User: uno".to_string()));
    assert!(stored.contains(&"User: dos".to_string()));
}

#[tokio::test]
async fn respond_accepts_any_provider() {
    let harness = TestHarness::builder().build().await.unwrap();
    let other = MockProvider::with_responses(vec!["from other".into()]);

    let reply = harness
        .conversations
        .respond(&UserId::from("2"), "hola", &other)
        .await
        .unwrap();

    assert_eq!(reply, "from other");
    assert_eq!(other.requests().await[0].model, "mock-model");
    assert_eq!(harness.provider.call_count().await, 0);
}
