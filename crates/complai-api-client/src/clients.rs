//! Typed client for the client-management endpoints.
//!
//! | Method | Path (relative to base URL) | Operation |
//! |--------|-----------------------------|-----------|
//! | GET    | `clients`                   | List clients |
//! | GET    | `clients/{id}`              | Get by ID |
//! | POST   | `clients`                   | Create client |
//! | PUT    | `clients/{id}`              | Update client |
//! | DELETE | `clients/{id}`              | Delete client |

use complai_core::{Client, ClientId, ClientPatch, NewClient};
use serde::de::IgnoredAny;
use url::Url;

use crate::envelope::ApiReply;
use crate::error::ApiError;
use crate::transport::{execute, url_for};

/// Client for the client-management endpoints.
#[derive(Debug, Clone)]
pub struct ClientApi {
    http: reqwest::Client,
    base_url: Url,
}

impl ClientApi {
    pub(crate) fn new(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Fetch every client.
    ///
    /// Calls `GET {base_url}/clients`.
    pub async fn list(&self) -> Result<ApiReply<Vec<Client>>, ApiError> {
        let url = url_for(&self.base_url, &["clients"]);
        execute("GET /clients", self.http.get(url)).await
    }

    /// Fetch one client. A 404 is reported as `Ok(None)`.
    ///
    /// Calls `GET {base_url}/clients/{id}`.
    pub async fn get(&self, id: &ClientId) -> Result<Option<ApiReply<Client>>, ApiError> {
        let endpoint = format!("GET /clients/{id}");
        let url = url_for(&self.base_url, &["clients", id.as_str()]);
        match execute(&endpoint, self.http.get(url)).await {
            Ok(reply) => Ok(Some(reply)),
            Err(ApiError::Status { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create a client.
    ///
    /// Calls `POST {base_url}/clients`.
    pub async fn create(&self, client: &NewClient) -> Result<ApiReply<Client>, ApiError> {
        let url = url_for(&self.base_url, &["clients"]);
        execute("POST /clients", self.http.post(url).json(client)).await
    }

    /// Apply a partial update.
    ///
    /// Calls `PUT {base_url}/clients/{id}`.
    pub async fn update(
        &self,
        id: &ClientId,
        patch: &ClientPatch,
    ) -> Result<ApiReply<Client>, ApiError> {
        let endpoint = format!("PUT /clients/{id}");
        let url = url_for(&self.base_url, &["clients", id.as_str()]);
        execute(&endpoint, self.http.put(url).json(patch)).await
    }

    /// Delete a client. Any response payload is ignored.
    ///
    /// Calls `DELETE {base_url}/clients/{id}`.
    pub async fn delete(&self, id: &ClientId) -> Result<ApiReply<()>, ApiError> {
        let endpoint = format!("DELETE /clients/{id}");
        let url = url_for(&self.base_url, &["clients", id.as_str()]);
        let reply: ApiReply<IgnoredAny> = execute(&endpoint, self.http.delete(url)).await?;
        Ok(reply.map(|_| ()))
    }
}
