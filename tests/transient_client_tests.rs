//! Operations that create their own client from the environment.
//!
//! Everything lives in one test: the environment is process-wide.

mod common;

use std::env;

use common::{json_response, serve_once_at};
use gemini_multimodal::{MultiModal, MultiModalError};
use serde_json::json;

#[tokio::test]
async fn clients_are_built_from_the_environment() {
    env::remove_var("GOOGLE_API_KEY");
    env::remove_var("GOOGLE_ACCESS_TOKEN");
    env::remove_var("GOOGLE_BASE_URL");

    let mut mm = MultiModal::new("gemini-1.0-pro-vision", 0.4);
    mm.add_text("Describe what is common for these two images.");

    let err = mm.submit("frog-project", "us-central1").await.unwrap_err();
    assert!(matches!(err, MultiModalError::Connection(_)), "{:?}", err);
    let err = mm.count_tokens("frog-project", "us-central1").await.unwrap_err();
    assert!(matches!(err, MultiModalError::Connection(_)), "{:?}", err);
    let err = mm
        .count_text_tokens("frog-project", "us-central1", "hi")
        .await
        .unwrap_err();
    assert!(matches!(err, MultiModalError::Connection(_)), "{:?}", err);

    env::set_var("GOOGLE_API_KEY", "env-key");

    let (base, request) = serve_once_at(json_response(
        "200 OK",
        &json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": "  ok \n" }] } }]
        }),
    ))
    .await;
    env::set_var("GOOGLE_BASE_URL", &base);

    let answer = mm.submit("frog-project", "us-central1").await.unwrap();
    assert_eq!(answer, "ok");
    let request = request.await.unwrap();
    assert!(request.starts_with(
        "POST /v1/projects/frog-project/locations/us-central1/publishers/google/models/gemini-1.0-pro-vision:generateContent?key=env-key "
    ));

    let (base, request) =
        serve_once_at(json_response("200 OK", &json!({ "totalTokens": 9 }))).await;
    env::set_var("GOOGLE_BASE_URL", &base);

    let count = mm.count_tokens("frog-project", "us-central1").await.unwrap();
    assert_eq!(count, 9);
    assert!(request.await.unwrap().contains(":countTokens?key=env-key "));

    env::remove_var("GOOGLE_API_KEY");
    env::remove_var("GOOGLE_BASE_URL");
}
