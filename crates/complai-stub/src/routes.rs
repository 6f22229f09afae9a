//! Route definitions for the ComplAI stub backend.
//!
//! Implements every endpoint the API client calls, under `/v1`. Successful
//! responses use the `{success, data, message}` envelope; failures use
//! `{success: false, error}` via [`AppError`].

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use complai_api_client::{ApiResponse, UploadSummary};
use complai_core::{
    parse_sheet, transform_uploaded_tasks, Client, ClientId, ClientPatch, Comment, CommentId,
    DocumentId, NewClient, NewComment, NewTask, ReassignTask, Task, TaskDocument, TaskId,
};
use complai_store::Repository;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

/// Build the complete router with all stub routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // Tasks
        .route("/v1/tasks/create-task", post(task_create))
        .route("/v1/tasks/get-all-tasks", get(task_list))
        .route("/v1/tasks/reassign-task/{id}", put(task_reassign))
        .route("/v1/tasks/upload-tasks", post(task_upload))
        .route("/v1/tasks/upload-task-doc", post(task_upload_doc))
        .route(
            "/v1/tasks/{id}/comments",
            get(comment_list).post(comment_create),
        )
        .route("/v1/tasks/{id}/documents", get(document_list))
        // Clients
        .route("/v1/clients", get(client_list).post(client_create))
        .route(
            "/v1/clients/{id}",
            get(client_get).put(client_update).delete(client_delete),
        )
        // Fallback: 501 Not Implemented
        .fallback(not_implemented)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn ok<T: Serialize>(status: StatusCode, data: T, message: &str) -> Response {
    (status, Json(ApiResponse::ok(data, Some(message.to_string())))).into_response()
}

fn list<T: Serialize>(data: Vec<T>) -> Json<ApiResponse<Vec<T>>> {
    Json(ApiResponse::ok(data, None))
}

fn require_task(state: &AppState, id: &TaskId) -> Result<Task, AppError> {
    state
        .tasks()
        .get_by_id(id)
        .ok_or_else(|| AppError::NotFound(format!("Task {id} not found")))
}

// ── Health ──────────────────────────────────────────────────────────

async fn health() -> StatusCode {
    StatusCode::OK
}

// ── Tasks ───────────────────────────────────────────────────────────

async fn task_create(
    State(state): State<AppState>,
    Json(body): Json<NewTask>,
) -> Result<Response, AppError> {
    body.validate()?;
    let task = Task::from_new(TaskId::new(new_id()), body);
    tracing::info!(task_id = %task.id, "task created");
    state.tasks().upsert(task.clone());
    Ok(ok(StatusCode::CREATED, task, "Task created"))
}

async fn task_list(State(state): State<AppState>) -> Json<ApiResponse<Vec<Task>>> {
    list(state.tasks().list())
}

async fn task_reassign(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ReassignTask>,
) -> Result<Response, AppError> {
    let id = TaskId::new(id);
    let assignee = body.assignee.trim();
    if assignee.is_empty() {
        return Err(AppError::Validation("assignee must not be empty".into()));
    }
    let task = state
        .tasks()
        .update(&id, |t| t.assignee = assignee.to_string())
        .ok_or_else(|| AppError::NotFound(format!("Task {id} not found")))?;
    if let Some(note) = body.note.filter(|n| !n.trim().is_empty()) {
        state.comments().upsert(Comment {
            id: CommentId::new(new_id()),
            task_id: id.clone(),
            author: "system".into(),
            body: format!("Reassigned to {assignee}: {note}"),
            created_at: Utc::now(),
        });
    }
    Ok(ok(StatusCode::OK, task, "Task reassigned"))
}

/// A file part read from a multipart body.
struct FilePart {
    file_name: String,
    bytes: Vec<u8>,
}

/// Read the `file` part and any text fields of a multipart body.
async fn read_multipart(
    mut multipart: Multipart,
) -> Result<(Option<FilePart>, Vec<(String, String)>), AppError> {
    let mut file = None;
    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let bytes = field.bytes().await?.to_vec();
            file = Some(FilePart { file_name, bytes });
        } else {
            fields.push((name, field.text().await?));
        }
    }
    Ok((file, fields))
}

async fn task_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let (file, _) = read_multipart(multipart).await?;
    let file = file.ok_or_else(|| AppError::BadRequest("missing multipart field \"file\"".into()))?;

    let rows = parse_sheet(&file.file_name, &file.bytes)?;
    let report = transform_uploaded_tasks(&rows, Utc::now().date_naive());

    let tasks: Vec<Task> = report
        .tasks
        .into_iter()
        .map(|new| Task::from_new(TaskId::new(new_id()), new))
        .collect();
    for task in &tasks {
        state.tasks().upsert(task.clone());
    }

    let summary = UploadSummary {
        created: tasks.len(),
        failed: report.errors.len(),
        errors: report.errors.iter().map(ToString::to_string).collect(),
        tasks,
    };
    tracing::info!(
        file = %file.file_name,
        created = summary.created,
        failed = summary.failed,
        "task sheet imported"
    );
    let message = format!("{} task(s) created, {} failed", summary.created, summary.failed);
    Ok(ok(StatusCode::OK, summary, &message))
}

async fn task_upload_doc(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let (file, fields) = read_multipart(multipart).await?;
    let task_id = fields
        .into_iter()
        .find(|(name, _)| name == "taskId")
        .map(|(_, value)| TaskId::new(value.trim()))
        .ok_or_else(|| AppError::BadRequest("missing multipart field \"taskId\"".into()))?;
    let file = file.ok_or_else(|| AppError::BadRequest("missing multipart field \"file\"".into()))?;
    require_task(&state, &task_id)?;

    let id = DocumentId::new(new_id());
    let doc = TaskDocument {
        url: Some(format!("/v1/tasks/{task_id}/documents/{id}")),
        id,
        task_id,
        file_name: file.file_name,
        size_bytes: Some(file.bytes.len() as u64),
        uploaded_at: Utc::now(),
    };
    state.documents().upsert(doc.clone());
    Ok(ok(StatusCode::CREATED, doc, "Document uploaded"))
}

async fn comment_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Comment>>>, AppError> {
    let id = TaskId::new(id);
    require_task(&state, &id)?;
    Ok(list(state.comments().filter(|c| c.task_id == id)))
}

async fn comment_create(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<NewComment>,
) -> Result<Response, AppError> {
    let id = TaskId::new(id);
    require_task(&state, &id)?;
    if body.body.trim().is_empty() {
        return Err(AppError::Validation("comment must not be empty".into()));
    }
    let comment = Comment {
        id: CommentId::new(new_id()),
        task_id: id,
        author: body.author,
        body: body.body,
        created_at: Utc::now(),
    };
    state.comments().upsert(comment.clone());
    Ok(ok(StatusCode::CREATED, comment, "Comment added"))
}

async fn document_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<TaskDocument>>>, AppError> {
    let id = TaskId::new(id);
    require_task(&state, &id)?;
    Ok(list(state.documents().filter(|d| d.task_id == id)))
}

// ── Clients ─────────────────────────────────────────────────────────

async fn client_list(State(state): State<AppState>) -> Json<ApiResponse<Vec<Client>>> {
    list(state.clients().list())
}

async fn client_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Client>>, AppError> {
    let id = ClientId::new(id);
    state
        .clients()
        .get_by_id(&id)
        .map(|c| Json(ApiResponse::ok(c, None)))
        .ok_or_else(|| AppError::NotFound(format!("Client {id} not found")))
}

async fn client_create(
    State(state): State<AppState>,
    Json(mut body): Json<NewClient>,
) -> Result<Response, AppError> {
    body.validate()?;
    let client = Client::from_new(ClientId::new(new_id()), body, Utc::now());
    tracing::info!(client_id = %client.id, "client created");
    state.clients().upsert(client.clone());
    Ok(ok(StatusCode::CREATED, client, "Client created"))
}

async fn client_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut patch): Json<ClientPatch>,
) -> Result<Response, AppError> {
    let id = ClientId::new(id);
    patch.validate()?;
    let mut client = state
        .clients()
        .get_by_id(&id)
        .ok_or_else(|| AppError::NotFound(format!("Client {id} not found")))?;
    client.apply(&patch);
    client.validate_registrations()?;
    state.clients().upsert(client.clone());
    Ok(ok(StatusCode::OK, client, "Client updated"))
}

async fn client_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let id = ClientId::new(id);
    match state.clients().remove(&id) {
        Some(_) => Ok(Json(ApiResponse {
            success: true,
            data: None,
            error: None,
            message: Some("Client deleted".into()),
        })),
        None => Err(AppError::NotFound(format!("Client {id} not found"))),
    }
}

// ── Fallback ────────────────────────────────────────────────────────

async fn not_implemented() -> Response {
    AppError::NotImplemented.into_response()
}
