//! Backend seams for the store.
//!
//! The store talks to the REST API through these traits so tests (and
//! offline callers) can substitute their own backend. The HTTP client
//! implements both.

use async_trait::async_trait;
use complai_api_client::{ApiError, ApiReply, ClientApi, TaskApi};
use complai_core::{Client, ClientId, ClientPatch, NewClient, NewTask, ReassignTask, Task, TaskId};

/// Client-management operations the store needs.
#[async_trait]
pub trait ClientBackend: Send + Sync {
    async fn list_clients(&self) -> Result<ApiReply<Vec<Client>>, ApiError>;

    async fn create_client(&self, client: &NewClient) -> Result<ApiReply<Client>, ApiError>;

    async fn update_client(
        &self,
        id: &ClientId,
        patch: &ClientPatch,
    ) -> Result<ApiReply<Client>, ApiError>;

    async fn delete_client(&self, id: &ClientId) -> Result<ApiReply<()>, ApiError>;
}

/// Task operations the board needs.
#[async_trait]
pub trait TaskBackend: Send + Sync {
    async fn list_tasks(&self) -> Result<ApiReply<Vec<Task>>, ApiError>;

    async fn create_task(&self, task: &NewTask) -> Result<ApiReply<Task>, ApiError>;

    async fn reassign_task(
        &self,
        id: &TaskId,
        req: &ReassignTask,
    ) -> Result<ApiReply<Task>, ApiError>;
}

#[async_trait]
impl ClientBackend for ClientApi {
    async fn list_clients(&self) -> Result<ApiReply<Vec<Client>>, ApiError> {
        self.list().await
    }

    async fn create_client(&self, client: &NewClient) -> Result<ApiReply<Client>, ApiError> {
        self.create(client).await
    }

    async fn update_client(
        &self,
        id: &ClientId,
        patch: &ClientPatch,
    ) -> Result<ApiReply<Client>, ApiError> {
        self.update(id, patch).await
    }

    async fn delete_client(&self, id: &ClientId) -> Result<ApiReply<()>, ApiError> {
        self.delete(id).await
    }
}

#[async_trait]
impl TaskBackend for TaskApi {
    async fn list_tasks(&self) -> Result<ApiReply<Vec<Task>>, ApiError> {
        self.list().await
    }

    async fn create_task(&self, task: &NewTask) -> Result<ApiReply<Task>, ApiError> {
        self.create(task).await
    }

    async fn reassign_task(
        &self,
        id: &TaskId,
        req: &ReassignTask,
    ) -> Result<ApiReply<Task>, ApiError> {
        self.reassign(id, req).await
    }
}
