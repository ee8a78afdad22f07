use std::collections::HashMap;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use mediclerk_core::models::record::ClerkingNote;
use mediclerk_suggest::error::SuggestError;
use mediclerk_suggest::gemini::GeminiSuggester;
use mediclerk_suggest::{SuggestionRequest, SuggestionService};
use serde_json::{Value, json};

async fn generate(
    Path(target): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if query.get("key").map(String::as_str) != Some("test-key") {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": { "code": 403, "message": "API key not valid." } })),
        );
    }
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap_or_default();
    if !target.ends_with(":generateContent") || !prompt.contains("Presenting Complaints") {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": { "message": "bad request" } })));
    }
    let text = if target.starts_with("gemini-chatty") {
        "Sure! Here are some questions.".to_string()
    } else {
        "```json\n[\"Is the pain radiating?\", \"Any vomiting?\"]\n```".to_string()
    };
    (
        StatusCode::OK,
        Json(json!({
            "candidates": [{ "content": { "parts": [{ "text": text }], "role": "model" } }],
            "usageMetadata": { "promptTokenCount": 120, "candidatesTokenCount": 14 },
        })),
    )
}

async fn serve() -> String {
    let router = Router::new().route("/v1beta/models/{target}", post(generate));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/v1beta/models")
}

fn request() -> SuggestionRequest {
    let snapshot: ClerkingNote = [("presenting_complaints".to_string(), "Abdominal pain".to_string())]
        .into_iter()
        .collect();
    SuggestionRequest {
        specialty: "surgery".into(),
        field_key: "presenting_complaints".into(),
        section: "Presenting Complaints".into(),
        snapshot,
    }
}

#[tokio::test]
async fn questions_are_parsed_from_fenced_candidate_text() {
    let base = serve().await;
    let suggester = GeminiSuggester::new(reqwest::Client::new(), "test-key", "gemini-1.5-flash")
        .unwrap()
        .with_base_url(base);

    let questions = suggester.suggest(&request()).await.unwrap();
    assert_eq!(questions, ["Is the pain radiating?", "Any vomiting?"]);
}

#[tokio::test]
async fn rejected_key_is_an_api_error() {
    let base = serve().await;
    let suggester = GeminiSuggester::new(reqwest::Client::new(), "wrong", "gemini-1.5-flash")
        .unwrap()
        .with_base_url(base);

    let err = suggester.suggest(&request()).await.unwrap_err();
    match err {
        SuggestError::Api { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "API key not valid.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn prose_answer_is_a_parse_failure() {
    let base = serve().await;
    let suggester = GeminiSuggester::new(reqwest::Client::new(), "test-key", "gemini-chatty")
        .unwrap()
        .with_base_url(base);

    let err = suggester.suggest(&request()).await.unwrap_err();
    assert!(matches!(err, SuggestError::ResponseParse(_)));
}

#[test]
fn empty_key_is_rejected_up_front() {
    let err = GeminiSuggester::new(reqwest::Client::new(), "  ", "gemini-1.5-flash").unwrap_err();
    assert!(matches!(err, SuggestError::Config(_)));
}

#[test]
fn debug_output_omits_the_key() {
    let suggester =
        GeminiSuggester::new(reqwest::Client::new(), "secret-key", "gemini-1.5-flash").unwrap();
    let rendered = format!("{suggester:?}");
    assert!(!rendered.contains("secret-key"));
    assert!(rendered.contains("gemini-1.5-flash"));
}
