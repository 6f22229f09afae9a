//! ComplAI API client error types.

/// Errors from ComplAI API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP transport error (connection refused, timeout, TLS, ...).
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Backend returned a non-2xx status.
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Backend answered 2xx with an envelope whose `success` is false.
    #[error("{endpoint} rejected the request: {message}")]
    Rejected { endpoint: String, message: String },
    /// Response body did not match the expected shape.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: serde_json::Error,
    },
    /// A file selected for upload could not be read.
    #[error("failed to read upload {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

impl ApiError {
    /// Message suitable for a notification: the backend's own `error` or
    /// `message` field when it sent one, otherwise the error's display text.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { body, .. } => extract_message(body).unwrap_or_else(|| self.to_string()),
            Self::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// HTTP status, when the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|k| value.get(k).and_then(|v| v.as_str()).map(str::to_string))
}
