// E2E tests for the learning endpoints and the usage they record
mod common;

use common::*;
use inference_providers::CompletionError;
use serde_json::json;

#[tokio::test]
async fn test_translate_records_usage_with_cost() {
    let ctx = setup_test_server();

    let body = translate(&ctx.server, "learner-1").await;
    println!("Translate response: {body:#}");

    assert_eq!(body["result"]["translated_text"], "Hello, how are you?");
    assert_eq!(body["model_id"], FLASH_MODEL);
    assert_eq!(body["xp_awarded"], 0);

    let usage_record_id = body["usage_record_id"]
        .as_str()
        .expect("usage_record_id should be a string");
    let record = admin_get(
        &ctx.server,
        &format!("/v1/admin/usage/{usage_record_id}"),
    )
    .await;

    assert_eq!(record["user_id"], "learner-1");
    assert_eq!(record["session_id"], "s1");
    assert_eq!(record["provider"], "demo");
    assert_eq!(record["operation"], "translate_text");
    assert_eq!(record["input_tokens"], 1000);
    assert_eq!(record["output_tokens"], 500);
    assert_eq!(record["total_tokens"], 1500);
    assert_eq!(record["currency"], "USD");

    let total_cost = record["total_cost"].as_f64().unwrap();
    assert!(
        (total_cost - 0.000875).abs() < 1e-9,
        "1000 in / 500 out on flash should cost 0.000875, got {total_cost}"
    );

    let metadata = &record["metadata"];
    assert_eq!(metadata["source_language"], "es");
    assert_eq!(metadata["target_language"], "en");
    assert_eq!(metadata["language_id"], "en");
    assert_eq!(metadata["functionality"], "translator-panel");
    assert_eq!(metadata["learning_level"], "A2");
    assert_eq!(metadata["translated_text"], "Hello, how are you?");
}

#[tokio::test]
async fn test_check_answer_awards_xp() {
    let ctx = setup_test_server();

    let body = check_answer(&ctx.server, "learner-2").await;
    assert_eq!(body["result"]["is_correct"], true);
    assert_eq!(body["xp_awarded"], 10);

    let progress = get_progress(&ctx.server, "learner-2").await;
    println!("Progress: {progress:#}");
    assert_eq!(progress["xp"], 10);
    assert_eq!(progress["current_streak"], 1);
    assert!(progress["last_active_date"].is_string());
}

#[tokio::test]
async fn test_unknown_user_has_empty_progress() {
    let ctx = setup_test_server();

    let progress = get_progress(&ctx.server, "nobody").await;
    assert_eq!(progress["user_id"], "nobody");
    assert_eq!(progress["xp"], 0);
    assert_eq!(progress["achievements"], json!([]));
}

#[tokio::test]
async fn test_detailed_check_returns_score() {
    let ctx = setup_test_server();

    let response = ctx
        .server
        .post("/v1/learning/check-answer/detailed")
        .json(&json!({
            "user_id": "learner-3",
            "prompt": "Translate: How are you?",
            "answer": "¿Cómo estas?",
            "language": "es"
        }))
        .await;

    assert_eq!(response.status_code(), 200, "body={}", response.text());
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["result"]["score"], 90);
    assert_eq!(body["result"]["corrections"][0], "estas -> estás");
}

#[tokio::test]
async fn test_generate_content_with_word_analysis() {
    let ctx = setup_test_server();

    let response = ctx
        .server
        .post("/v1/learning/content")
        .json(&json!({
            "user_id": "learner-4",
            "language": "es",
            "mode": "sentences",
            "level": "A1",
            "count": 2,
            "with_word_analysis": true
        }))
        .await;

    assert_eq!(response.status_code(), 200, "body={}", response.text());
    let body = response.json::<serde_json::Value>();
    let items = body["result"].as_array().expect("result should be a list");
    assert_eq!(items.len(), 2);
    for item in items {
        assert!(
            item["words"].is_array(),
            "every item should carry a word breakdown: {item}"
        );
    }

    // One record for the generation plus one per enriched item
    let usage = admin_get(&ctx.server, "/v1/admin/usage?user_id=learner-4").await;
    assert_eq!(usage["total"], 3);
    let analyses = usage["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|r| r["operation"] == "analyze_words_for_learning")
        .count();
    assert_eq!(analyses, 2);
}

#[tokio::test]
async fn test_requested_model_is_used() {
    let ctx = setup_test_server();

    let response = ctx
        .server
        .post("/v1/learning/analyze-words")
        .json(&json!({
            "user_id": "learner-5",
            "model_id": PRO_MODEL,
            "text": "El libro",
            "language": "es"
        }))
        .await;

    assert_eq!(response.status_code(), 200, "body={}", response.text());
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["model_id"], PRO_MODEL);
    assert_eq!(body["result"][0]["word"], "libro");
}

#[tokio::test]
async fn test_unknown_model_is_rejected() {
    let ctx = setup_test_server();

    let response = ctx
        .server
        .post("/v1/learning/translate")
        .json(&json!({
            "user_id": "learner-6",
            "model_id": "not-a-model",
            "text": "Hola",
            "source_language": "es",
            "target_language": "en"
        }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["type"], "invalid_model");

    let usage = admin_get(&ctx.server, "/v1/admin/usage").await;
    assert_eq!(usage["total"], 0, "Nothing should be recorded");
}

#[tokio::test]
async fn test_provider_failure_is_recorded_as_error() {
    let ctx = setup_test_server();
    ctx.provider
        .set_failure(Some(CompletionError::NoContent))
        .await;

    let response = ctx
        .server
        .post("/v1/learning/translate")
        .json(&json!({
            "user_id": "learner-7",
            "text": "Hola",
            "source_language": "es",
            "target_language": "en"
        }))
        .await;

    assert_eq!(response.status_code(), 500);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["type"], "upstream_error");

    let usage = admin_get(&ctx.server, "/v1/admin/usage?user_id=learner-7").await;
    assert_eq!(usage["total"], 1);
    let record = &usage["data"][0];
    assert_eq!(record["total_tokens"], 0);
    assert_eq!(record["total_cost"], 0.0);
    assert_eq!(record["metadata"]["extra"]["status"], "error");

    // Failed calls award nothing
    let progress = get_progress(&ctx.server, "learner-7").await;
    assert_eq!(progress["xp"], 0);
}

#[tokio::test]
async fn test_learning_validation() {
    let ctx = setup_test_server();

    let cases = [
        (
            "/v1/learning/translate",
            json!({"user_id": "", "text": "Hola", "source_language": "es", "target_language": "en"}),
        ),
        (
            "/v1/learning/translate",
            json!({"user_id": "u", "text": "   ", "source_language": "es", "target_language": "en"}),
        ),
        (
            "/v1/learning/content",
            json!({"user_id": "u", "language": "es", "mode": "words", "level": "A1", "count": 0}),
        ),
        (
            "/v1/learning/content",
            json!({"user_id": "u", "language": "es", "mode": "words", "level": "A1", "count": 21}),
        ),
        (
            "/v1/learning/analyze-words",
            json!({"user_id": "u", "text": "a".repeat(5001), "language": "es"}),
        ),
    ];

    for (path, body) in cases {
        let response = ctx.server.post(path).json(&body).await;
        assert_eq!(
            response.status_code(),
            400,
            "POST {path} should reject {body}, got {}",
            response.status_code()
        );
        let error = response.json::<serde_json::Value>();
        assert_eq!(error["error"]["type"], "invalid_request");
    }
}
