use thiserror::Error;

#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("model invocation failed: {0}")]
    Invocation(#[from] reqwest::Error),

    #[error("model service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("response parsing failed: {0}")]
    ResponseParse(String),

    #[error("response did not conform to expected schema: {0}")]
    SchemaViolation(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("suggestion service not configured: {0}")]
    Config(String),
}
