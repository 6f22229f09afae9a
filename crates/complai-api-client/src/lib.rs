//! # complai-api-client -- Typed Rust client for the ComplAI backend
//!
//! Provides typed access to the two resource families the dashboard uses:
//! - **Tasks** via `tasks/*` (create, list, reassign, bulk upload, documents,
//!   comments)
//! - **Clients** via `clients/*` (CRUD)
//!
//! ## Behaviour
//!
//! - One attempt per call. Transport failures, non-2xx statuses, and
//!   `{success: false}` envelopes all surface as [`ApiError`].
//! - Any result converts into the uniform [`ApiResponse`] envelope
//!   (`{success, data, error, message}`) for display.
//! - No caching; every call goes to the network.
//!
//! ## URL Convention
//!
//! Endpoint paths are appended to the configured base URL, e.g.
//! `http://localhost:3000/v1/tasks/get-all-tasks`.

pub mod clients;
pub mod config;
pub mod envelope;
pub mod error;
pub mod tasks;
pub(crate) mod transport;
pub mod upload;

pub use clients::ClientApi;
pub use config::{ApiConfig, ConfigError};
pub use envelope::{ApiReply, ApiResponse};
pub use error::ApiError;
pub use tasks::{TaskApi, UploadSummary};
pub use upload::UploadFile;

use std::time::Duration;

/// Top-level ComplAI API client. Holds the per-resource sub-clients, which
/// share one connection pool.
#[derive(Debug, Clone)]
pub struct ComplaiClient {
    tasks: TaskApi,
    clients: ClientApi,
}

impl ComplaiClient {
    /// Create a new API client from configuration.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();

        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        if let Some(token) = &config.api_token {
            let mut headers = reqwest::header::HeaderMap::new();
            let mut value =
                reqwest::header::HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
                    .map_err(|_| ApiError::Config(ConfigError::InvalidToken))?;
            value.set_sensitive(true);
            headers.insert(reqwest::header::AUTHORIZATION, value);
            builder = builder.default_headers(headers);
        }

        let http = builder.build().map_err(|e| ApiError::Http {
            endpoint: "client_init".into(),
            source: e,
        })?;

        tracing::debug!(base_url = %config.base_url(), "ComplAI API client ready");

        Ok(Self {
            tasks: TaskApi::new(http.clone(), config.base_url().clone()),
            clients: ClientApi::new(http, config.base_url().clone()),
        })
    }

    /// Access the task endpoints.
    pub fn tasks(&self) -> &TaskApi {
        &self.tasks
    }

    /// Access the client-management endpoints.
    pub fn clients(&self) -> &ClientApi {
        &self.clients
    }
}
