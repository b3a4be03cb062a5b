// E2E tests for the model list and active model switching
mod common;

use common::*;
use serde_json::json;
use services::models::AiSettingsRepository;

#[tokio::test]
async fn test_list_models_marks_active() {
    let ctx = setup_test_server();

    let response = ctx.server.get("/v1/models").await;
    assert_eq!(response.status_code(), 200);

    let body = response.json::<serde_json::Value>();
    println!("Models: {body:#}");
    assert_eq!(body["active_model_id"], FLASH_MODEL);

    let models = body["data"].as_array().unwrap();
    assert_eq!(models.len(), 3);
    for model in models {
        assert_eq!(
            model["is_active"],
            model["id"] == FLASH_MODEL,
            "only the default model should be active: {model}"
        );
        assert_eq!(model["provider"], "demo");
    }

    let pro = models.iter().find(|m| m["id"] == PRO_MODEL).unwrap();
    assert_eq!(pro["display_name"], "Gemini 2.5 Pro");
}

#[tokio::test]
async fn test_set_active_model_requires_admin() {
    let ctx = setup_test_server();

    let response = ctx
        .server
        .put("/v1/admin/models/active")
        .json(&json!({ "model_id": PRO_MODEL }))
        .await;
    assert_eq!(response.status_code(), 401);

    let response = ctx
        .server
        .put("/v1/admin/models/active")
        .add_header("Authorization", "Bearer wrong-token")
        .json(&json!({ "model_id": PRO_MODEL }))
        .await;
    assert_eq!(response.status_code(), 401);

    let body = ctx.server.get("/v1/models").await.json::<serde_json::Value>();
    assert_eq!(body["active_model_id"], FLASH_MODEL);
}

#[tokio::test]
async fn test_set_unregistered_model_keeps_active() {
    let ctx = setup_test_server();

    let response = ctx
        .server
        .put("/v1/admin/models/active")
        .add_header("Authorization", admin_auth())
        .json(&json!({ "model_id": "gpt-4o" }))
        .await;
    assert_eq!(response.status_code(), 400);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["type"], "invalid_model");

    let body = ctx.server.get("/v1/models").await.json::<serde_json::Value>();
    assert_eq!(body["active_model_id"], FLASH_MODEL);
}

#[tokio::test]
async fn test_switching_model_changes_later_calls() {
    let ctx = setup_test_server();

    let response = ctx
        .server
        .put("/v1/admin/models/active")
        .add_header("Authorization", admin_auth())
        .json(&json!({ "model_id": PRO_MODEL }))
        .await;
    assert_eq!(response.status_code(), 200, "body={}", response.text());
    let active = response.json::<serde_json::Value>();
    assert_eq!(active["id"], PRO_MODEL);
    assert_eq!(active["is_active"], true);

    let translation = translate(&ctx.server, "learner-1").await;
    assert_eq!(translation["model_id"], PRO_MODEL);

    // Pro pricing: 1000 * 1.25 / 1M + 500 * 10 / 1M
    let record = admin_get(
        &ctx.server,
        &format!(
            "/v1/admin/usage/{}",
            translation["usage_record_id"].as_str().unwrap()
        ),
    )
    .await;
    assert_eq!(record["model_id"], PRO_MODEL);
    let total_cost = record["total_cost"].as_f64().unwrap();
    assert!((total_cost - 0.00625).abs() < 1e-9, "got {total_cost}");

    // Persisted in the settings store
    let stored = ctx.database.settings.get_active_model_id().await.unwrap();
    assert_eq!(stored.as_deref(), Some(PRO_MODEL));
}

#[tokio::test]
async fn test_health_reports_active_model() {
    let ctx = setup_test_server();

    let response = ctx.server.get("/health").await;
    assert_eq!(response.status_code(), 200);
    let body = response.json::<serde_json::Value>();
    println!("Health: {body:#}");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["active_model_id"], FLASH_MODEL);
    assert_eq!(body["registered_models"], 3);

    let response = ctx
        .server
        .put("/v1/admin/models/active")
        .add_header("Authorization", admin_auth())
        .json(&json!({ "model_id": PRO_MODEL }))
        .await;
    assert_eq!(response.status_code(), 200, "body={}", response.text());

    let body = ctx.server.get("/health").await.json::<serde_json::Value>();
    assert_eq!(body["active_model_id"], PRO_MODEL);
    assert_eq!(body["registered_models"], 3);
}
