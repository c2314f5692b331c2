//! # integration-tests
//!
//! Cross-crate scenario tests: real adapters wired to mock collaborators,
//! driven through the services layer. Shared wiremock scaffolding lives
//! here so the individual test targets stay focused on their scenarios.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A Posts API post document as the backend serializes it.
pub fn post_json(id: i64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "content": format!("post #{id}"),
        "user_id": "u1",
        "username": "alice",
        "created_at": "2025-03-01T12:00:00Z"
    })
}

/// Mounts `GET /posts` returning the given collection.
pub async fn mount_post_listing(server: &MockServer, posts: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(posts))
        .mount(server)
        .await;
}

/// Mounts an empty reply collection for one post.
pub async fn mount_empty_replies(server: &MockServer, post_id: i64) {
    Mock::given(method("GET"))
        .and(path(format!("/posts/{post_id}/replies")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(server)
        .await;
}

/// Mounts a Vision-style annotate endpoint that recognizes `text`.
pub async fn mount_text_detection(server: &MockServer, text: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/images:annotate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "responses": [{ "textAnnotations": [{ "description": text }] }]
        })))
        .mount(server)
        .await;
}
