use serde_json::Value;
use thiserror::Error;
use tower_api_client::Error as TransportError;

/// Failure of a single gateway call.
///
/// Every non-success HTTP status maps to exactly one of these variants; transport
/// and decoding failures become `RequestFailed` without a status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("not found: {detail}")]
    NotFound { detail: String },

    #[error("request failed{}: {detail}", status_suffix(.status))]
    RequestFailed { status: Option<u16>, detail: String },
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" ({code})"),
        None => String::new(),
    }
}

impl ApiError {
    /// Build the error for a non-success response from its status and raw body.
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = extract_detail(body);
        if status == 404 {
            ApiError::NotFound {
                detail: detail.unwrap_or_else(|| "resource not found".to_string()),
            }
        } else {
            ApiError::RequestFailed {
                status: Some(status),
                detail: detail.unwrap_or_else(|| format!("HTTP {status}")),
            }
        }
    }

    pub fn transport(detail: impl Into<String>) -> Self {
        ApiError::RequestFailed {
            status: None,
            detail: detail.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::RequestFailed { status, .. } => *status,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            ApiError::NotFound { detail } | ApiError::RequestFailed { detail, .. } => detail,
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(value: TransportError) -> Self {
        match value {
            TransportError::ClientError(status, body) | TransportError::ServerError(status, body) => {
                ApiError::from_status(status.as_u16(), &body)
            }
            e => ApiError::transport(e.to_string()),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        match value.status() {
            Some(status) => ApiError::from_status(status.as_u16(), &value.to_string()),
            None => ApiError::transport(value.to_string()),
        }
    }
}

/// Pull a human readable message out of an error body.
///
/// The backend answers with `{"detail": ...}`; anything else falls back to the raw text.
fn extract_detail(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("detail").or_else(|| map.get("message")) {
            Some(Value::String(detail)) => Some(detail.clone()),
            Some(other) => Some(other.to_string()),
            None => Some(body.to_string()),
        },
        Ok(Value::String(detail)) => Some(detail),
        _ => Some(body.to_string()),
    }
}
