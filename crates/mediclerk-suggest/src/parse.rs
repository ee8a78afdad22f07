//! Model output parsing.

use serde_json::Value;
use tracing::debug;

use crate::error::SuggestError;

/// Remove markdown code fences the model sometimes wraps output in.
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parse the model's answer as a JSON array of question strings.
///
/// Blank entries are dropped. Anything other than an array of strings is a
/// [`SuggestError::SchemaViolation`].
pub fn parse_questions(raw: &str) -> Result<Vec<String>, SuggestError> {
    let cleaned = strip_code_fences(raw);
    let value: Value = serde_json::from_str(&cleaned).map_err(|e| {
        debug!(error = %e, response_len = raw.len(), "model output is not JSON");
        SuggestError::ResponseParse(e.to_string())
    })?;

    let Value::Array(items) = value else {
        return Err(SuggestError::SchemaViolation(
            "expected a JSON array of questions".to_string(),
        ));
    };

    let mut questions = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::String(s) if s.trim().is_empty() => {}
            Value::String(s) => questions.push(s.trim().to_string()),
            other => {
                return Err(SuggestError::SchemaViolation(format!(
                    "question entries must be strings, got {other}"
                )));
            }
        }
    }
    Ok(questions)
}
