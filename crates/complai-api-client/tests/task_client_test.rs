//! Contract tests for TaskApi against a wiremock backend.
//!
//! ## Endpoints Tested
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | POST   | `/v1/tasks/create-task` | `create_task_*` |
//! | GET    | `/v1/tasks/get-all-tasks` | `list_tasks_*` |
//! | PUT    | `/v1/tasks/reassign-task/{id}` | `reassign_task_*` |
//! | POST   | `/v1/tasks/upload-tasks` | `upload_tasks_*` |
//! | POST   | `/v1/tasks/upload-task-doc` | `upload_task_doc_*` |
//! | GET/POST | `/v1/tasks/{id}/comments` | `comments_*` |
//! | GET    | `/v1/tasks/{id}/documents` | `documents_*` |

use chrono::NaiveDate;
use complai_api_client::{ApiConfig, ApiError, ApiResponse, ComplaiClient, UploadFile};
use complai_core::{
    ComplianceBucket, NewComment, NewTask, Priority, ReassignTask, TaskId, TaskStatus,
};
use wiremock::matchers::{body_partial_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Build a client with its base URL pointed at a wiremock server.
fn test_client(mock_server: &MockServer) -> ComplaiClient {
    let config = ApiConfig::new(&format!("{}/v1", mock_server.uri())).unwrap();
    ComplaiClient::new(config).unwrap()
}

fn task_json(id: &str, title: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "description": "",
        "status": "pending",
        "priority": "high",
        "assignee": "Priya",
        "dueDate": "2025-04-20",
        "bucket": "GST",
        "frequency": "monthly",
        "entity": "Acme Pvt Ltd",
        "tags": ["gst"],
        "estimatedHours": 2.0,
        "completedHours": 0.0
    })
}

fn due() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 20).unwrap()
}

// ── POST /tasks/create-task ─────────────────────────────────────────

#[tokio::test]
async fn create_task_sends_snake_case_status_and_returns_task() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/tasks/create-task"))
        .and(body_partial_json(serde_json::json!({
            "title": "GSTR-3B March",
            "status": "in_progress",
            "bucket": "GST",
            "dueDate": "2025-04-20"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "success": true,
            "data": task_json("t-1", "GSTR-3B March"),
            "message": "Task created"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let mut req = NewTask::new("GSTR-3B March", ComplianceBucket::Gst, due());
    req.status = TaskStatus::InProgress;

    let reply = client.tasks().create(&req).await.unwrap();
    assert_eq!(reply.data.id.as_str(), "t-1");
    assert_eq!(reply.data.priority, Priority::High);
    assert_eq!(reply.message.as_deref(), Some("Task created"));
}

#[tokio::test]
async fn create_task_handles_400_with_error_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/tasks/create-task"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({"success": false, "error": "title is required"})),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let result = client
        .tasks()
        .create(&NewTask::new("", ComplianceBucket::Gst, due()))
        .await;

    match result {
        Err(ApiError::Status { status, body, .. }) => {
            assert_eq!(status, 400);
            assert!(body.contains("title is required"));
        }
        other => panic!("expected Status error, got: {other:?}"),
    }
}

// ── GET /tasks/get-all-tasks ────────────────────────────────────────

#[tokio::test]
async fn list_tasks_accepts_bare_array() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/tasks/get-all-tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            task_json("t-1", "GSTR-1"),
            task_json("t-2", "GSTR-3B")
        ])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let tasks = client.tasks().list().await.unwrap().into_data();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[1].title, "GSTR-3B");
}

#[tokio::test]
async fn list_tasks_rejected_envelope_becomes_failed_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/tasks/get-all-tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "message": "Session expired"
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let envelope: ApiResponse<_> = client.tasks().list().await.into();
    assert!(!envelope.success);
    assert_eq!(envelope.error.as_deref(), Some("Session expired"));
    assert!(envelope.data.is_none());
}

#[tokio::test]
async fn list_tasks_malformed_body_is_deserialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/tasks/get-all-tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client.tasks().list().await.unwrap_err();
    assert!(matches!(err, ApiError::Deserialization { .. }));
}

// ── PUT /tasks/reassign-task/{id} ───────────────────────────────────

#[tokio::test]
async fn reassign_task_puts_to_id_path() {
    let mock_server = MockServer::start().await;

    let mut reassigned = task_json("t-9", "TDS Q4");
    reassigned["assignee"] = serde_json::json!("Rahul");

    Mock::given(method("PUT"))
        .and(path("/v1/tasks/reassign-task/t-9"))
        .and(body_partial_json(serde_json::json!({"assignee": "Rahul"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(reassigned))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let req = ReassignTask {
        assignee: "Rahul".into(),
        note: None,
    };
    let task = client
        .tasks()
        .reassign(&TaskId::new("t-9"), &req)
        .await
        .unwrap()
        .into_data();
    assert_eq!(task.assignee, "Rahul");
}

// ── Multipart uploads ───────────────────────────────────────────────

#[tokio::test]
async fn upload_tasks_sends_multipart_file() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/tasks/upload-tasks"))
        .and(header_exists("content-type"))
        .respond_with(|req: &Request| {
            let content_type = req
                .headers
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            let body = String::from_utf8_lossy(&req.body).to_string();
            let ok = content_type.starts_with("multipart/form-data")
                && body.contains("name=\"file\"")
                && body.contains("filename=\"tasks.csv\"")
                && body.contains("title,bucket");
            if ok {
                ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "success": true,
                    "data": {"created": 1, "failed": 0}
                }))
            } else {
                ResponseTemplate::new(400)
            }
        })
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let file = UploadFile::new("tasks.csv", b"title,bucket\nGSTR-1,GST\n".to_vec());
    let summary = client.tasks().upload_tasks(file).await.unwrap().into_data();
    assert_eq!(summary.created, 1);
    assert_eq!(summary.failed, 0);
    assert!(summary.tasks.is_empty());
}

#[tokio::test]
async fn upload_task_doc_includes_task_id_field() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/tasks/upload-task-doc"))
        .respond_with(|req: &Request| {
            let body = String::from_utf8_lossy(&req.body).to_string();
            if body.contains("name=\"taskId\"") && body.contains("t-3") {
                ResponseTemplate::new(201).set_body_json(serde_json::json!({
                    "id": "d-1",
                    "taskId": "t-3",
                    "fileName": "challan.pdf",
                    "uploadedAt": "2025-04-10T08:00:00Z"
                }))
            } else {
                ResponseTemplate::new(400)
            }
        })
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let doc = client
        .tasks()
        .upload_task_doc(&TaskId::new("t-3"), UploadFile::new("challan.pdf", vec![1, 2, 3]))
        .await
        .unwrap()
        .into_data();
    assert_eq!(doc.file_name, "challan.pdf");
    assert_eq!(doc.task_id.as_str(), "t-3");
}

// ── Comments & documents ────────────────────────────────────────────

#[tokio::test]
async fn comments_list_and_add() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/tasks/t-1/comments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": [{
                "id": "c-1", "taskId": "t-1", "author": "Priya",
                "body": "Waiting on sales register", "createdAt": "2025-04-01T10:00:00Z"
            }]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/tasks/t-1/comments"))
        .and(body_partial_json(serde_json::json!({"body": "Received"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": "c-2", "taskId": "t-1", "author": "Rahul",
            "body": "Received", "createdAt": "2025-04-02T10:00:00Z"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let id = TaskId::new("t-1");
    let comments = client.tasks().comments(&id).await.unwrap().into_data();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].author, "Priya");

    let added = client
        .tasks()
        .add_comment(
            &id,
            &NewComment {
                author: "Rahul".into(),
                body: "Received".into(),
            },
        )
        .await
        .unwrap()
        .into_data();
    assert_eq!(added.id.as_str(), "c-2");
}

#[tokio::test]
async fn documents_list_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/tasks/t-1/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let docs = client
        .tasks()
        .documents(&TaskId::new("t-1"))
        .await
        .unwrap()
        .into_data();
    assert!(docs.is_empty());
}

// ── Auth & transport ────────────────────────────────────────────────

#[tokio::test]
async fn bearer_token_is_sent_when_configured() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/tasks/get-all-tasks"))
        .and(header("authorization", "Bearer t0ken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ApiConfig::new(&format!("{}/v1", mock_server.uri()))
        .unwrap()
        .with_token("t0ken");
    let client = ComplaiClient::new(config).unwrap();
    assert!(client.tasks().list().await.is_ok());
}

#[tokio::test]
async fn unreachable_backend_fails_once_without_retry() {
    // Port 1 is never listening; the call must fail on the first attempt.
    let client = ComplaiClient::new(ApiConfig::local(1).unwrap().with_timeout_secs(2)).unwrap();
    let envelope: ApiResponse<_> = client.tasks().list().await.into();
    assert!(!envelope.success);
    assert!(envelope.error.unwrap().contains("GET /tasks/get-all-tasks"));
}
