//! Single-attempt request execution shared by the endpoint clients.
//!
//! No retries and no backoff: a transport failure is surfaced to the
//! caller on the first attempt.

use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::envelope::{self, ApiReply};
use crate::error::ApiError;

/// Append path segments to a base URL ending in `/`. Segments are
/// percent-encoded, so record ids can carry arbitrary characters.
pub(crate) fn url_for(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Send `request`, check the status, unwrap the envelope, and decode `T`.
pub(crate) async fn execute<T: DeserializeOwned>(
    endpoint: &str,
    request: reqwest::RequestBuilder,
) -> Result<ApiReply<T>, ApiError> {
    tracing::debug!(endpoint, "sending request");

    let resp = request.send().await.map_err(|e| {
        tracing::warn!(endpoint, error = %e, "request failed");
        ApiError::Http {
            endpoint: endpoint.to_string(),
            source: e,
        }
    })?;

    let status = resp.status();
    let text = resp.text().await.map_err(|e| ApiError::Http {
        endpoint: endpoint.to_string(),
        source: e,
    })?;

    if !status.is_success() {
        tracing::warn!(endpoint, status = status.as_u16(), "backend returned error status");
        return Err(ApiError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body: text,
        });
    }

    let body = if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).map_err(|e| ApiError::Deserialization {
            endpoint: endpoint.to_string(),
            source: e,
        })?
    };

    let reply = envelope::open(endpoint, body)?;
    let data = serde_json::from_value(reply.data).map_err(|e| ApiError::Deserialization {
        endpoint: endpoint.to_string(),
        source: e,
    })?;
    Ok(ApiReply {
        data,
        message: reply.message,
    })
}
