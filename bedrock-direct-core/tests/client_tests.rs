// Integration tests for InvocationClient
//
// These run the full invoke path (request building, retry loop, response
// decomposition) over the scripted MockTransport. Backoff sleeps run on
// tokio's paused clock.

use bedrock_direct_core::test_utils::MockTransport;
use bedrock_direct_core::{ClientConfig, InvocationClient, InvokeError, RetryInfo};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

fn build(config: ClientConfig, transport: MockTransport) -> (InvocationClient, Arc<MockTransport>) {
    let transport = Arc::new(transport);
    let client = InvocationClient::with_transport(config, transport.clone()).unwrap();
    (client, transport)
}

fn recording(client: InvocationClient) -> (InvocationClient, Arc<Mutex<Vec<RetryInfo>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let client = client.with_retry_callback(move |info| sink.lock().push(info));
    (client, seen)
}

// ===== Request construction =====

#[tokio::test]
async fn test_string_input_becomes_one_user_text_block() {
    let (client, transport) = build(ClientConfig::default(), MockTransport::new().with_text("ok"));

    client.invoke("What is Rust?", false).await.unwrap();

    let body = transport.last_body().unwrap();
    assert_eq!(
        body["messages"],
        json!([{"role": "user", "content": [{"type": "text", "text": "What is Rust?"}]}])
    );
    assert_eq!(body["anthropic_version"], "bedrock-2023-05-31");
    assert_eq!(body["max_tokens"], 2000);
    assert_eq!(body["temperature"].as_f64(), Some(0.7));
    assert!(body.get("thinking").is_none());
    assert!(body.get("system").is_none());
}

#[tokio::test]
async fn test_block_input_passes_through_unmodified() {
    let blocks = json!([
        {"type": "image", "source": {"type": "base64", "media_type": "image/jpeg", "data": "/9j/4AAQ"}},
        {"type": "text", "text": "Describe this image", "cache_control": {"type": "ephemeral"}}
    ]);
    let (client, transport) = build(ClientConfig::default(), MockTransport::new().with_text("a cat"));

    client.invoke_value(blocks.clone(), false).await.unwrap();

    let body = transport.last_body().unwrap();
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[0]["content"], blocks);
}

#[tokio::test]
async fn test_extended_thinking_forces_temperature_one() {
    for temperature in [0.0, 0.3, 0.7] {
        let (client, transport) = build(
            ClientConfig::new().with_temperature(temperature),
            MockTransport::new().with_thinking("hmm", "done"),
        );

        client.invoke("Think hard", true).await.unwrap();

        let body = transport.last_body().unwrap();
        assert_eq!(body["temperature"].as_f64(), Some(1.0));
        assert_eq!(
            body["thinking"],
            json!({"type": "enabled", "budget_tokens": 8000})
        );
    }
}

#[tokio::test]
async fn test_extended_thinking_max_tokens_adjustment() {
    let cases = [
        (2000, 8000, 10_000),
        (8000, 8000, 10_000),
        (8001, 8000, 8001),
        (32_000, 16_000, 32_000),
        (1, 0, 1),
    ];

    for (max_tokens, budget, expected) in cases {
        let (client, transport) = build(
            ClientConfig::new()
                .with_max_tokens(max_tokens)
                .with_thinking_budget(budget),
            MockTransport::new().with_text("ok"),
        );

        client.invoke("x", true).await.unwrap();

        assert_eq!(
            transport.last_body().unwrap()["max_tokens"],
            json!(expected),
            "max_tokens={} budget={}",
            max_tokens,
            budget
        );
    }
}

#[tokio::test]
async fn test_plain_mode_leaves_max_tokens_alone() {
    let (client, transport) = build(
        ClientConfig::new().with_max_tokens(100).with_thinking_budget(8000),
        MockTransport::new().with_text("ok"),
    );

    client.invoke("x", false).await.unwrap();

    let body = transport.last_body().unwrap();
    assert_eq!(body["max_tokens"], 100);
    assert!(body.get("thinking").is_none());
}

#[tokio::test]
async fn test_configured_system_prompt_is_sent() {
    let (client, transport) = build(
        ClientConfig::new().with_system_prompt("Answer in JSON."),
        MockTransport::new().with_text("{}"),
    );

    client.invoke("x", false).await.unwrap();

    assert_eq!(transport.last_body().unwrap()["system"], "Answer in JSON.");
}

#[tokio::test]
async fn test_unsupported_input_fails_without_retry() {
    let (client, transport) = build(ClientConfig::default(), MockTransport::new());
    let (client, seen) = recording(client);

    for bad in [json!(7), json!(null), json!({"role": "user"})] {
        let err = client.invoke_value(bad, false).await.unwrap_err();
        assert!(err.is_invalid_argument(), "got {:?}", err);
    }

    assert_eq!(transport.call_count(), 0);
    assert!(seen.lock().is_empty());
}

// ===== Retry behavior =====

#[tokio::test(start_paused = true)]
async fn test_recovers_after_k_failures_with_exponential_sleeps() {
    let (client, transport) = build(
        ClientConfig::new().with_max_retries(4).with_backoff_factor(2.0),
        MockTransport::new()
            .with_errors(3, "ThrottlingException: slow down")
            .with_text("finally"),
    );
    let (client, seen) = recording(client);

    let result = client.invoke("x", false).await.unwrap();

    assert_eq!(result.response_text.as_deref(), Some("finally"));
    assert_eq!(transport.call_count(), 4);

    let delays: Vec<Duration> = seen.lock().iter().map(|info| info.delay).collect();
    assert_eq!(
        delays,
        vec![
            Duration::from_secs(2),
            Duration::from_secs(4),
            Duration::from_secs(8)
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_default_backoff_factor_delays() {
    let (client, _transport) = build(
        ClientConfig::default(),
        MockTransport::new().with_errors(2, "timeout").with_text("ok"),
    );
    let (client, seen) = recording(client);

    client.invoke("x", false).await.unwrap();

    let delays: Vec<Duration> = seen.lock().iter().map(|info| info.delay).collect();
    assert_eq!(
        delays,
        vec![Duration::from_millis(1500), Duration::from_millis(2250)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_always_failing_transport_exhausts_retries() {
    let (client, transport) = build(
        ClientConfig::new().with_max_retries(3).with_backoff_factor(2.0),
        MockTransport::new()
            .with_error("connection reset")
            .with_error("connection reset")
            .with_error("ServiceUnavailableException: try later"),
    );
    let (client, seen) = recording(client);

    let err = client.invoke("x", false).await.unwrap_err();

    assert_eq!(transport.call_count(), 3);
    assert_eq!(seen.lock().len(), 2);
    match err {
        InvokeError::RetriesExhausted {
            attempts,
            last_error,
        } => {
            assert_eq!(attempts, 3);
            assert!(last_error.contains("ServiceUnavailableException"));
        }
        other => panic!("expected RetriesExhausted, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_each_retry_resends_identical_body() {
    let (client, transport) = build(
        ClientConfig::new().with_backoff_factor(2.0),
        MockTransport::new().with_error("reset").with_text("ok"),
    );

    client.invoke("same every time", true).await.unwrap();

    let bodies: Vec<Value> = transport.requests().into_iter().map(|r| r.body).collect();
    assert_eq!(bodies.len(), 2);
    assert_eq!(bodies[0], bodies[1]);
}

// ===== Response decomposition =====

#[tokio::test]
async fn test_extended_response_populates_reasoning() {
    let (client, _) = build(
        ClientConfig::default(),
        MockTransport::new().with_thinking("Let me consider the options.", "Option B."),
    );

    let result = client.invoke("Which option?", true).await.unwrap();

    assert_eq!(
        result.reasoning_text.as_deref(),
        Some("Let me consider the options.")
    );
    assert_eq!(result.response_text.as_deref(), Some("Option B."));
}

#[tokio::test]
async fn test_embedded_json_fields_merge_except_thinking() {
    let (client, _) = build(
        ClientConfig::default(),
        MockTransport::new().with_thinking(
            "actual reasoning",
            r#"prefix {"foo": 1, "thinking": "ignored"} suffix"#,
        ),
    );

    let result = client.invoke("x", true).await.unwrap();

    assert_eq!(result.extra_fields.get("foo"), Some(&json!(1)));
    assert!(!result.extra_fields.contains_key("thinking"));
    assert_eq!(result.reasoning_text.as_deref(), Some("actual reasoning"));
}

#[tokio::test]
async fn test_malformed_embedded_json_is_not_an_error() {
    let (client, transport) = build(
        ClientConfig::default(),
        MockTransport::new().with_text("{not json"),
    );

    let result = client.invoke("x", false).await.unwrap();

    assert_eq!(result.response_text.as_deref(), Some("{not json"));
    assert!(result.extra_fields.is_empty());
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn test_multiple_text_blocks_last_wins() {
    let (client, _) = build(
        ClientConfig::default(),
        MockTransport::new().with_body(json!({
            "content": [
                {"type": "text", "text": "draft"},
                {"type": "text", "text": "final"}
            ]
        })),
    );

    let result = client.invoke("x", false).await.unwrap();

    assert_eq!(result.response_text.as_deref(), Some("final"));
}

#[tokio::test]
async fn test_model_info_is_stable_across_calls() {
    let (client, _) = build(
        ClientConfig::new().with_region("us-west-2"),
        MockTransport::new().with_text("a").with_text("b"),
    );

    let before = client.model_info();
    client.invoke("x", false).await.unwrap();
    client.invoke("y", true).await.unwrap();
    let after = client.model_info();

    assert_eq!(before, after);
    assert_eq!(after.region, "us-west-2");
    assert_eq!(after.temperature, 0.7);
    assert_eq!(after.max_tokens, 2000);
}

#[tokio::test]
async fn test_concurrent_invocations_share_client() {
    let (client, transport) = build(
        ClientConfig::default(),
        (0..8).fold(MockTransport::new(), |m, i| m.with_text(format!("answer {}", i))),
    );
    let client = Arc::new(client);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move { client.invoke(format!("question {}", i), false).await })
        })
        .collect();

    for handle in handles {
        let result = handle.await.unwrap().unwrap();
        assert!(result.response_text.unwrap().starts_with("answer "));
    }
    assert_eq!(transport.call_count(), 8);
}
