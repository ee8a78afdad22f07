//! Mapping of HTTP outcomes onto [`ApiError`].

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::error::{ApiError, FieldErrors};

/// Keys under which the backend reports a human-readable failure.
const MESSAGE_KEYS: [&str; 3] = ["message", "detail", "error"];

pub(crate) fn transport(e: reqwest::Error) -> ApiError {
    ApiError::Network(e.to_string())
}

/// Read a response, turning non-success statuses into errors.
pub(crate) async fn checked_body(response: Response, what: &str) -> Result<String, ApiError> {
    let status = response.status();
    let body = response.text().await.map_err(transport)?;
    debug!(status = status.as_u16(), what, "backend response");

    if status.is_success() {
        Ok(body)
    } else {
        Err(classify(status, &body, what))
    }
}

pub(crate) async fn json_body<T: DeserializeOwned>(
    response: Response,
    what: &str,
) -> Result<T, ApiError> {
    let body = checked_body(response, what).await?;
    serde_json::from_str(&body).map_err(|e| {
        error!(error = %e, what, "failed to decode backend response");
        ApiError::Decode(e.to_string())
    })
}

pub(crate) fn classify(status: StatusCode, body: &str, what: &str) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized,
        StatusCode::NOT_FOUND => ApiError::NotFound(what.to_string()),
        _ => {
            let message = extract_message(body).unwrap_or_default();
            error!(status = status.as_u16(), what, message = %message, "backend request failed");
            ApiError::Server {
                status: status.as_u16(),
                message,
            }
        }
    }
}

fn extract_message(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    MESSAGE_KEYS
        .iter()
        .find_map(|k| json.get(k).and_then(|v| v.as_str()))
        .map(str::to_string)
}

/// Per-field rejections in the `{"field": ["message", ...]}` shape.
pub(crate) fn field_errors(body: &str) -> FieldErrors {
    let Ok(serde_json::Value::Object(map)) = serde_json::from_str(body) else {
        return FieldErrors::new();
    };
    map.into_iter()
        .filter_map(|(key, value)| {
            let message = match value {
                serde_json::Value::String(s) => Some(s),
                serde_json::Value::Array(items) => items
                    .into_iter()
                    .find_map(|i| i.as_str().map(str::to_string)),
                _ => None,
            }?;
            Some((key, message))
        })
        .filter(|(key, _)| !MESSAGE_KEYS.contains(&key.as_str()))
        .collect()
}
