//! Typed client for the task endpoints.
//!
//! | Method | Path (relative to base URL) | Operation |
//! |--------|-----------------------------|-----------|
//! | POST   | `tasks/create-task`         | Create task |
//! | GET    | `tasks/get-all-tasks`       | List tasks |
//! | PUT    | `tasks/reassign-task/{id}`  | Reassign task |
//! | POST   | `tasks/upload-tasks`        | Bulk upload (multipart) |
//! | POST   | `tasks/upload-task-doc`     | Attach document (multipart) |
//! | GET    | `tasks/{id}/comments`       | List comments |
//! | POST   | `tasks/{id}/comments`       | Add comment |
//! | GET    | `tasks/{id}/documents`      | List documents |

use complai_core::{Comment, NewComment, NewTask, ReassignTask, Task, TaskDocument, TaskId};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::envelope::ApiReply;
use crate::error::ApiError;
use crate::transport::{execute, url_for};
use crate::upload::UploadFile;

/// Result of a bulk task upload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    /// Tasks the backend created.
    #[serde(default)]
    pub created: usize,
    /// Rows the backend rejected.
    #[serde(default)]
    pub failed: usize,
    /// Per-row rejection reasons.
    #[serde(default)]
    pub errors: Vec<String>,
    /// The created tasks, when the backend echoes them.
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// Client for the task endpoints.
#[derive(Debug, Clone)]
pub struct TaskApi {
    http: reqwest::Client,
    base_url: Url,
}

impl TaskApi {
    pub(crate) fn new(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Create a task.
    ///
    /// Calls `POST {base_url}/tasks/create-task`.
    pub async fn create(&self, task: &NewTask) -> Result<ApiReply<Task>, ApiError> {
        let url = url_for(&self.base_url, &["tasks", "create-task"]);
        execute("POST /tasks/create-task", self.http.post(url).json(task)).await
    }

    /// Fetch every task.
    ///
    /// Calls `GET {base_url}/tasks/get-all-tasks`.
    pub async fn list(&self) -> Result<ApiReply<Vec<Task>>, ApiError> {
        let url = url_for(&self.base_url, &["tasks", "get-all-tasks"]);
        execute("GET /tasks/get-all-tasks", self.http.get(url)).await
    }

    /// Hand a task to another assignee.
    ///
    /// Calls `PUT {base_url}/tasks/reassign-task/{id}`.
    pub async fn reassign(
        &self,
        id: &TaskId,
        req: &ReassignTask,
    ) -> Result<ApiReply<Task>, ApiError> {
        let endpoint = format!("PUT /tasks/reassign-task/{id}");
        let url = url_for(&self.base_url, &["tasks", "reassign-task", id.as_str()]);
        execute(&endpoint, self.http.put(url).json(req)).await
    }

    /// Upload a task sheet for server-side bulk creation.
    ///
    /// Calls `POST {base_url}/tasks/upload-tasks` with the file in the
    /// multipart `file` field.
    pub async fn upload_tasks(&self, file: UploadFile) -> Result<ApiReply<UploadSummary>, ApiError> {
        let endpoint = "POST /tasks/upload-tasks";
        let url = url_for(&self.base_url, &["tasks", "upload-tasks"]);
        let form = reqwest::multipart::Form::new().part("file", file.into_part(endpoint)?);
        execute(endpoint, self.http.post(url).multipart(form)).await
    }

    /// Attach a document to a task.
    ///
    /// Calls `POST {base_url}/tasks/upload-task-doc` with multipart fields
    /// `taskId` and `file`.
    pub async fn upload_task_doc(
        &self,
        id: &TaskId,
        file: UploadFile,
    ) -> Result<ApiReply<TaskDocument>, ApiError> {
        let endpoint = "POST /tasks/upload-task-doc";
        let url = url_for(&self.base_url, &["tasks", "upload-task-doc"]);
        let form = reqwest::multipart::Form::new()
            .text("taskId", id.as_str().to_string())
            .part("file", file.into_part(endpoint)?);
        execute(endpoint, self.http.post(url).multipart(form)).await
    }

    /// List the comments on a task.
    ///
    /// Calls `GET {base_url}/tasks/{id}/comments`.
    pub async fn comments(&self, id: &TaskId) -> Result<ApiReply<Vec<Comment>>, ApiError> {
        let endpoint = format!("GET /tasks/{id}/comments");
        let url = url_for(&self.base_url, &["tasks", id.as_str(), "comments"]);
        execute(&endpoint, self.http.get(url)).await
    }

    /// Post a comment on a task.
    ///
    /// Calls `POST {base_url}/tasks/{id}/comments`.
    pub async fn add_comment(
        &self,
        id: &TaskId,
        comment: &NewComment,
    ) -> Result<ApiReply<Comment>, ApiError> {
        let endpoint = format!("POST /tasks/{id}/comments");
        let url = url_for(&self.base_url, &["tasks", id.as_str(), "comments"]);
        execute(&endpoint, self.http.post(url).json(comment)).await
    }

    /// List the documents attached to a task.
    ///
    /// Calls `GET {base_url}/tasks/{id}/documents`.
    pub async fn documents(&self, id: &TaskId) -> Result<ApiReply<Vec<TaskDocument>>, ApiError> {
        let endpoint = format!("GET /tasks/{id}/documents");
        let url = url_for(&self.base_url, &["tasks", id.as_str(), "documents"]);
        execute(&endpoint, self.http.get(url)).await
    }
}
