//! Google Gemini `generateContent` client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::error::SuggestError;
use crate::parse::parse_questions;
use crate::prompt::build_prompt;
use crate::{SuggestionRequest, SuggestionService};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: Option<u32>,
    #[serde(default)]
    candidates_token_count: Option<u32>,
}

#[derive(Clone)]
pub struct GeminiSuggester {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for GeminiSuggester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiSuggester")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiSuggester {
    pub fn new(
        http: reqwest::Client,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, SuggestError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(SuggestError::Config(format!("{API_KEY_ENV} is empty")));
        }
        Ok(Self {
            http,
            api_key,
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Read the key from `GEMINI_API_KEY`.
    pub fn from_env(http: reqwest::Client, model: impl Into<String>) -> Result<Self, SuggestError> {
        let key = std::env::var(API_KEY_ENV)
            .map_err(|_| SuggestError::Config(format!("{API_KEY_ENV} is not set")))?;
        Self::new(http, key, model)
    }

    /// Point at a different endpoint root, e.g. a proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    async fn generate(&self, prompt: String, request_id: Uuid) -> Result<String, SuggestError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.2,
                response_mime_type: "application/json",
            },
        };

        debug!(%request_id, endpoint = %self.endpoint(), "calling generateContent");
        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        let text = response.text().await.map_err(reqwest::Error::without_url)?;
        if !status.is_success() {
            error!(%request_id, status = status.as_u16(), "model service returned an error");
            return Err(SuggestError::Api {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let parsed: GenerateResponse = serde_json::from_str(&text)?;
        if let Some(usage) = &parsed.usage_metadata {
            info!(
                %request_id,
                prompt_tokens = usage.prompt_token_count,
                output_tokens = usage.candidates_token_count,
                "model usage"
            );
        }

        let output: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if output.trim().is_empty() {
            return Err(SuggestError::ResponseParse(
                "no candidate text in response".to_string(),
            ));
        }
        Ok(output)
    }
}

/// `{"error": {"message": ...}}` as returned by the Google APIs.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.chars().take(200).collect())
}

#[async_trait]
impl SuggestionService for GeminiSuggester {
    async fn suggest(&self, request: &SuggestionRequest) -> Result<Vec<String>, SuggestError> {
        let request_id = Uuid::new_v4();
        info!(
            %request_id,
            model = %self.model,
            specialty = %request.specialty,
            field = %request.field_key,
            "requesting follow-up questions"
        );

        let raw = self.generate(build_prompt(request), request_id).await?;
        let questions = parse_questions(&raw)?;

        info!(%request_id, count = questions.len(), "follow-up questions received");
        Ok(questions)
    }
}
