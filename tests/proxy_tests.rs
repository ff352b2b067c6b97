//! Proxy endpoint integration tests
//!
//! Drives the full router against stubbed upstream providers:
//! - method gating and CORS preflight
//! - credential and validation failures
//! - upstream request shaping (history filtering, fixed policy)
//! - response passthrough (Gemini) and flattening (Groq)
//! - upstream status passthrough and the error envelope

use axum::http::{Method, StatusCode};
use axum_test::TestServer;
use lore_chat_proxy::{AppState, Config, create_router};
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::matchers::{any, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_GEMINI_KEY: &str = "gemini-test-key";
const TEST_GROQ_KEY: &str = "groq-test-key";

/// Both providers pointed at the same stub server, credentials set.
fn test_config(upstream_url: &str) -> Config {
    Config {
        gemini_api_key: Some(TEST_GEMINI_KEY.to_string()),
        gemini_base_url: upstream_url.to_string(),
        gemini_model: "gemini-test".to_string(),
        groq_api_key: Some(TEST_GROQ_KEY.to_string()),
        groq_base_url: upstream_url.to_string(),
        groq_model: "llama-3.1-8b-instant".to_string(),
        groq_temperature: 0.7,
        groq_max_tokens: 256,
        host: "127.0.0.1".to_string(),
        port: 0,
        log_level: "error".to_string(),
        request_timeout: 5,
    }
}

fn test_server(config: Config) -> TestServer {
    let state = AppState::from_config(Arc::new(config));
    TestServer::new(create_router(state)).expect("failed to build test server")
}

// =============================================================================
// Method gating and preflight
// =============================================================================

#[tokio::test]
async fn non_post_methods_are_rejected_without_calling_upstream() {
    let upstream = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let server = test_server(test_config(&upstream.uri()));

    for target in ["/api/gemini", "/api/groq"] {
        for verb in [Method::GET, Method::PUT, Method::DELETE, Method::PATCH] {
            let response = server.method(verb.clone(), target).await;
            assert_eq!(
                response.status_code(),
                StatusCode::METHOD_NOT_ALLOWED,
                "{verb} {target}"
            );
            assert_eq!(response.header("allow"), "POST");

            let body: Value = response.json();
            assert_eq!(body, json!({"error": "Method not allowed"}));
        }
    }
}

#[tokio::test]
async fn preflight_answers_204_before_any_validation() {
    // No upstream, no credentials: preflight must still succeed.
    let mut config = test_config("http://127.0.0.1:9");
    config.gemini_api_key = None;
    config.groq_api_key = None;
    let server = test_server(config);

    for target in ["/api/gemini", "/api/groq"] {
        let response = server.method(Method::OPTIONS, target).await;
        assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
        assert!(response.text().is_empty());
        assert_eq!(response.header("access-control-allow-origin"), "*");
        assert_eq!(response.header("access-control-allow-methods"), "POST, OPTIONS");
        assert_eq!(response.header("access-control-allow-headers"), "Content-Type");
    }
}

// =============================================================================
// Credential gating
// =============================================================================

#[tokio::test]
async fn missing_credential_answers_500_regardless_of_body() {
    let upstream = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let mut config = test_config(&upstream.uri());
    config.gemini_api_key = None;
    config.groq_api_key = None;
    let server = test_server(config);

    // Valid bodies
    let response = server
        .post("/api/gemini")
        .json(&json!({"prompt": "hello"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body, json!({"error": "Server configuration error"}));

    let response = server
        .post("/api/groq")
        .json(&json!({"messages": [{"role": "user", "content": "hi"}]}))
        .await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    // Invalid bodies still hit the credential check first
    let response = server.post("/api/gemini").json(&json!({})).await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = server
        .post("/api/groq")
        .json(&json!({"messages": "nope"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

// =============================================================================
// Gemini endpoint
// =============================================================================

#[tokio::test]
async fn gemini_rejects_missing_or_empty_prompt() {
    let upstream = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let server = test_server(test_config(&upstream.uri()));

    for body in [json!({}), json!({"prompt": ""}), json!({"systemInstruction": "x"})] {
        let response = server.post("/api/gemini").json(&body).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{body}");
        let envelope: Value = response.json();
        assert_eq!(envelope, json!({"error": "Missing prompt"}));
    }

    // An unparsable body counts as an empty one
    let response = server.post("/api/gemini").text("not json").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn gemini_success_passes_upstream_body_through_verbatim() {
    let upstream = MockServer::start().await;
    let upstream_body = json!({
        "candidates": [
            {"content": {"parts": [{"text": "Well met, hero."}]}, "finishReason": "STOP"}
        ],
        "usageMetadata": {"totalTokenCount": 12}
    });

    Mock::given(method("POST"))
        .and(path("/models/gemini-test:generateContent"))
        .and(query_param("key", TEST_GEMINI_KEY))
        .and(body_json(json!({
            "contents": [{"parts": [{"text": "hello"}]}],
            "systemInstruction": {"parts": [{"text": "Speak like a sage."}]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(upstream_body.clone()))
        .expect(1)
        .mount(&upstream)
        .await;

    let server = test_server(test_config(&upstream.uri()));
    let response = server
        .post("/api/gemini")
        .json(&json!({"prompt": "hello", "systemInstruction": "Speak like a sage."}))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body, upstream_body);
}

// =============================================================================
// Groq endpoint
// =============================================================================

#[tokio::test]
async fn groq_rejects_non_array_messages() {
    let upstream = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let server = test_server(test_config(&upstream.uri()));

    for body in [
        json!({}),
        json!({"messages": "hi"}),
        json!({"messages": {"role": "user", "content": "hi"}}),
        json!({"messages": 7}),
    ] {
        let response = server.post("/api/groq").json(&body).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{body}");
        let envelope: Value = response.json();
        assert_eq!(envelope, json!({"error": "Messages array is required"}));
    }
}

#[tokio::test]
async fn groq_drops_malformed_history_elements_silently() {
    let upstream = MockServer::start().await;

    // Exactly the two well-formed messages may reach the upstream,
    // wrapped in the fixed generation policy.
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer groq-test-key"))
        .and(body_json(json!({
            "model": "llama-3.1-8b-instant",
            "messages": [
                {"role": "user", "content": "hi"},
                {"role": "user", "content": "ok"}
            ],
            "temperature": 0.7,
            "max_tokens": 256,
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "fine"}}]
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let server = test_server(test_config(&upstream.uri()));
    let response = server
        .post("/api/groq")
        .json(&json!({
            "messages": [
                {"role": "user", "content": "hi"},
                {"bad": true},
                {"role": "user", "content": "ok"}
            ]
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn groq_prepends_system_instruction() {
    let upstream = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_json(json!({
            "model": "llama-3.1-8b-instant",
            "messages": [
                {"role": "system", "content": "You are a sage."},
                {"role": "user", "content": "hi"}
            ],
            "temperature": 0.7,
            "max_tokens": 256,
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "greetings"}}]
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let server = test_server(test_config(&upstream.uri()));
    let response = server
        .post("/api/groq")
        .json(&json!({
            "messages": [{"role": "user", "content": "hi"}],
            "systemInstruction": "You are a sage."
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn groq_success_flattens_first_choice_and_republishes_raw_fields() {
    let upstream = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "hi there"}}],
            "usage": {"total_tokens": 5}
        })))
        .mount(&upstream)
        .await;

    let server = test_server(test_config(&upstream.uri()));
    let response = server
        .post("/api/groq")
        .json(&json!({"messages": [{"role": "user", "content": "hi"}]}))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({
            "message": "hi there",
            "choices": [{"message": {"content": "hi there"}}],
            "usage": {"total_tokens": 5}
        })
    );
}

#[tokio::test]
async fn groq_tolerates_a_sparse_upstream_body() {
    let upstream = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&upstream)
        .await;

    let server = test_server(test_config(&upstream.uri()));
    let response = server
        .post("/api/groq")
        .json(&json!({"messages": [{"role": "user", "content": "hi"}]}))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body, json!({}));
}

// =============================================================================
// Upstream failure handling
// =============================================================================

#[tokio::test]
async fn upstream_rejection_status_passes_through_with_detail() {
    let upstream = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&upstream)
        .await;

    let server = test_server(test_config(&upstream.uri()));

    let gemini = server
        .post("/api/gemini")
        .json(&json!({"prompt": "hello"}))
        .await;
    let groq = server
        .post("/api/groq")
        .json(&json!({"messages": [{"role": "user", "content": "hi"}]}))
        .await;

    for response in [gemini, groq] {
        assert_eq!(response.status_code(), StatusCode::TOO_MANY_REQUESTS);
        let body: Value = response.json();
        assert_eq!(body, json!({"error": "Upstream error", "detail": "rate limited"}));
        // Errors must stay readable cross-origin
        assert_eq!(response.header("access-control-allow-origin"), "*");
    }
}

#[tokio::test]
async fn transport_failure_answers_generic_500_without_detail() {
    // Nothing listens on the discard port; the connection is refused.
    let server = test_server(test_config("http://127.0.0.1:9"));

    let gemini = server
        .post("/api/gemini")
        .json(&json!({"prompt": "hello"}))
        .await;
    let groq = server
        .post("/api/groq")
        .json(&json!({"messages": [{"role": "user", "content": "hi"}]}))
        .await;

    for response in [gemini, groq] {
        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body, json!({"error": "Server error"}));
    }
}

// =============================================================================
// Statelessness
// =============================================================================

#[tokio::test]
async fn identical_requests_yield_identical_responses() {
    let upstream = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "always this"}}],
            "usage": {"total_tokens": 3}
        })))
        .expect(2)
        .mount(&upstream)
        .await;

    let server = test_server(test_config(&upstream.uri()));
    let request_body = json!({"messages": [{"role": "user", "content": "hi"}]});

    let first: Value = server.post("/api/groq").json(&request_body).await.json();
    let second: Value = server.post("/api/groq").json(&request_body).await.json();

    assert_eq!(first, second);
}
