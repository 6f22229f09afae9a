//! The uniform result envelope.
//!
//! Every call can be reported as `{success, data?, error?, message?}`.
//! Backends may themselves wrap payloads in `{success, data, message}`; the
//! client unwraps that form transparently so callers see the bare payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// Successful payload plus the backend's optional `message`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply<T> {
    pub data: T,
    pub message: Option<String>,
}

impl<T> ApiReply<T> {
    /// Discard the message.
    pub fn into_data(self) -> T {
        self.data
    }

    /// Transform the payload, keeping the message.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiReply<U> {
        ApiReply {
            data: f(self.data),
            message: self.message,
        }
    }
}

/// Normalised outcome of an API call.
///
/// `success == false` always carries `error`; `success == true` always
/// carries `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful envelope.
    pub fn ok(data: T, message: Option<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message,
        }
    }

    /// Failed envelope.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
        }
    }

    /// Convert back into a `Result`, using `error` as the failure text.
    pub fn into_result(self) -> Result<T, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(self.error.unwrap_or_else(|| "request failed".to_string())),
        }
    }
}

impl<T> From<Result<ApiReply<T>, ApiError>> for ApiResponse<T> {
    fn from(result: Result<ApiReply<T>, ApiError>) -> Self {
        match result {
            Ok(reply) => Self::ok(reply.data, reply.message),
            Err(e) => Self::failed(e.user_message()),
        }
    }
}

/// Split a raw response body into payload and message.
///
/// An object carrying a boolean `success` key is treated as an envelope:
/// `success: false` becomes [`ApiError::Rejected`], otherwise `data` (or
/// `null` when absent) is the payload. Any other body is the payload itself.
pub(crate) fn open(endpoint: &str, body: Value) -> Result<ApiReply<Value>, ApiError> {
    let Value::Object(mut obj) = body else {
        return Ok(ApiReply {
            data: body,
            message: None,
        });
    };
    let Some(success) = obj.get("success").and_then(Value::as_bool) else {
        return Ok(ApiReply {
            data: Value::Object(obj),
            message: None,
        });
    };
    let message = obj
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string);
    if !success {
        let reason = obj
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or(message)
            .unwrap_or_else(|| "request failed".to_string());
        return Err(ApiError::Rejected {
            endpoint: endpoint.to_string(),
            message: reason,
        });
    }
    Ok(ApiReply {
        data: obj.remove("data").unwrap_or(Value::Null),
        message,
    })
}
