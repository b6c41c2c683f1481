//! E2E tests for meal plan providers.

use mockito::Matcher;
use pcosreset_core::integrations::meal_plan::{GeminiProvider, OpenAiProvider};
use pcosreset_core::integrations::{generate_for_state, MealPlanError, MealPlanProvider};
use pcosreset_core::quiz::UserProfile;
use pcosreset_core::storage::{AiConfig, Database};

use super::test_helpers::{answered_state, plan_json};

fn config(server: &mockito::ServerGuard) -> AiConfig {
    AiConfig {
        openai_base_url: server.url(),
        gemini_base_url: server.url(),
        timeout_secs: 5,
        ..AiConfig::default()
    }
}

fn profile() -> UserProfile {
    UserProfile::from_state(&answered_state()).unwrap()
}

fn openai_reply(content: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-1",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
    })
    .to_string()
}

fn gemini_reply(content: &str) -> String {
    serde_json::json!({
        "candidates": [{ "content": { "role": "model", "parts": [{ "text": content }] } }]
    })
    .to_string()
}

/// Test: OpenAI request carries the profile and json mode; reply is parsed.
#[tokio::test]
async fn test_openai_generates_plan() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer sk-openai")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(serde_json::json!({
                "model": "gpt-4o",
                "response_format": { "type": "json_object" },
            })),
            Matcher::Regex("Current Weight: 84 kg".into()),
        ]))
        .with_status(200)
        .with_body(openai_reply(&plan_json(7)))
        .create_async()
        .await;

    let provider = OpenAiProvider::new(&config(&server), "sk-openai".into()).unwrap();
    let plan = provider.generate(&profile()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(plan.days.len(), 7);
    assert_eq!(plan.days[6].day, "Day 7");
    assert_eq!(plan.days[0].total_calories(), 960.0);
}

/// Test: a six-day plan is rejected as invalid structure.
#[tokio::test]
async fn test_openai_rejects_short_plan() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body(openai_reply(&plan_json(6)))
        .create_async()
        .await;

    let provider = OpenAiProvider::new(&config(&server), "sk-openai".into()).unwrap();
    let err = provider.generate(&profile()).await.unwrap_err();
    assert!(matches!(err, MealPlanError::InvalidStructure(_)));
}

/// Test: provider errors carry status and message.
#[tokio::test]
async fn test_openai_provider_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(429)
        .with_body(r#"{"error": {"message": "Rate limit reached"}}"#)
        .create_async()
        .await;

    let provider = OpenAiProvider::new(&config(&server), "sk-openai".into()).unwrap();
    match provider.generate(&profile()).await.unwrap_err() {
        MealPlanError::Provider { status, message } => {
            assert_eq!(status, 429);
            assert_eq!(message, "Rate limit reached");
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}

/// Test: Gemini sends the key as a query parameter; fenced output is accepted.
#[tokio::test]
async fn test_gemini_generates_plan() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
        .match_query(Matcher::UrlEncoded("key".into(), "g-key".into()))
        .match_body(Matcher::PartialJson(serde_json::json!({
            "generationConfig": { "responseMimeType": "application/json" }
        })))
        .with_status(200)
        .with_body(gemini_reply(&format!("```json\n{}\n```", plan_json(7))))
        .create_async()
        .await;

    let provider = GeminiProvider::new(&config(&server), "g-key".into()).unwrap();
    let plan = provider.generate(&profile()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(plan.days.len(), 7);
}

/// Test: Gemini without candidates is an empty response.
#[tokio::test]
async fn test_gemini_empty_candidates() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"candidates": []}"#)
        .create_async()
        .await;

    let provider = GeminiProvider::new(&config(&server), "g-key".into()).unwrap();
    let err = provider.generate(&profile()).await.unwrap_err();
    assert!(matches!(err, MealPlanError::EmptyResponse));
}

/// Test: a generated plan is stored and read back per session.
#[tokio::test]
async fn test_generated_plan_is_stored() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body(openai_reply(&plan_json(7)))
        .create_async()
        .await;

    let state = answered_state();
    let provider = OpenAiProvider::new(&config(&server), "sk-openai".into()).unwrap();
    let plan = generate_for_state(&provider, &state).await.unwrap();

    let db = Database::open_memory().unwrap();
    db.save_meal_plan(&state.session_id, "openai", "gpt-4o", &plan)
        .unwrap();
    let stored = db.latest_meal_plan(&state.session_id).unwrap().unwrap();
    assert_eq!(stored.plan, plan);
    assert_eq!(stored.model, "gpt-4o");
}
