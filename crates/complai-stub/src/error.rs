//! Handler errors and their HTTP mapping.
//!
//! Every error is rendered in the uniform envelope,
//! `{"success": false, "error": "<message>"}`, so the API client surfaces
//! the message unchanged.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use complai_api_client::ApiResponse;
use complai_core::{ImportError, ValidationError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("{0}")]
    NotFound(String),

    /// Request body failed domain validation (422).
    #[error("{0}")]
    Validation(String),

    /// Request could not be read (400).
    #[error("{0}")]
    BadRequest(String),

    /// Route exists on the real backend but not here (501).
    #[error("not implemented by the stub backend")]
    NotImplemented,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotImplemented => StatusCode::NOT_IMPLEMENTED,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_client_error() {
            tracing::debug!(%status, error = %self, "request rejected");
        }
        (status, Json(ApiResponse::<()>::failed(self.to_string()))).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        match &err {
            ImportError::Sheet(_) => Self::BadRequest(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        Self::BadRequest(err.body_text())
    }
}
