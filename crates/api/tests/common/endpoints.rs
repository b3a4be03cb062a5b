//! Common HTTP-level helpers for API E2E tests.
//!
//! Keep these focused on making requests + asserting status codes + parsing responses.

use super::admin_auth;
use serde_json::{json, Value};

async fn post_ok(server: &axum_test::TestServer, path: &str, body: Value) -> Value {
    let response = server.post(path).json(&body).await;
    assert_eq!(
        response.status_code(),
        200,
        "POST {path} should return 200, got {} body={}",
        response.status_code(),
        response.text()
    );
    response.json::<Value>()
}

pub async fn translate(server: &axum_test::TestServer, user_id: &str) -> Value {
    post_ok(
        server,
        "/v1/learning/translate",
        json!({
            "user_id": user_id,
            "session_id": "s1",
            "learning_mode": "sentences",
            "learning_level": "A2",
            "functionality": "translator-panel",
            "text": "Hola, ¿cómo estás?",
            "source_language": "es",
            "target_language": "en"
        }),
    )
    .await
}

pub async fn check_answer(server: &axum_test::TestServer, user_id: &str) -> Value {
    post_ok(
        server,
        "/v1/learning/check-answer",
        json!({
            "user_id": user_id,
            "prompt": "Translate: I like reading books.",
            "expected": "Me gusta leer libros.",
            "answer": "Me gusta leer libros.",
            "language": "es"
        }),
    )
    .await
}

pub async fn submit_feedback(server: &axum_test::TestServer, body: Value) -> Value {
    post_ok(server, "/v1/feedback", body).await
}

/// GET an admin endpoint with the admin token, expecting 200
pub async fn admin_get(server: &axum_test::TestServer, path: &str) -> Value {
    let response = server
        .get(path)
        .add_header("Authorization", admin_auth())
        .await;
    assert_eq!(
        response.status_code(),
        200,
        "GET {path} should return 200, got {} body={}",
        response.status_code(),
        response.text()
    );
    response.json::<Value>()
}

pub async fn get_progress(server: &axum_test::TestServer, user_id: &str) -> Value {
    let response = server.get(&format!("/v1/progress/{user_id}")).await;
    assert_eq!(response.status_code(), 200);
    response.json::<Value>()
}
