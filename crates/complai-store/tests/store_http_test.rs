//! ClientStore and TaskBoard driven through the real HTTP client against a
//! wiremock backend.

use std::sync::Arc;

use chrono::NaiveDate;
use complai_api_client::{ApiConfig, ComplaiClient};
use complai_core::{ClientId, ClientType, ComplianceBucket, NewClient, NewTask};
use complai_store::fixtures::demo_clients;
use complai_store::{ClientStore, NotificationLevel, RecordingNotifier, TaskBoard};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api(mock_server: &MockServer) -> ComplaiClient {
    ComplaiClient::new(ApiConfig::new(&format!("{}/v1", mock_server.uri())).unwrap()).unwrap()
}

#[tokio::test]
async fn create_failure_over_http_leaves_store_untouched() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/clients"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "success": false,
            "error": "database unavailable"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let notifier = Arc::new(RecordingNotifier::new());
    let store = ClientStore::new(Arc::new(api(&mock_server).clients().clone()))
        .with_clients(demo_clients())
        .with_notifier(notifier.clone());
    let before = store.clients();

    let ok = store
        .create_client_from_api(NewClient::new("Zen Labs", ClientType::Opc))
        .await;

    assert!(!ok);
    assert_eq!(store.clients(), before);
    let n = notifier.last().unwrap();
    assert_eq!(n.level, NotificationLevel::Error);
    assert_eq!(n.message, "database unavailable");
}

#[tokio::test]
async fn load_merges_remote_clients_by_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": [
                {"id": "1", "name": "Acme (remote)", "type": "Pvt Ltd", "createdAt": "2024-01-15T00:00:00Z"},
                {"id": 77, "name": "Orbit OPC", "type": "OPC", "createdAt": "2025-02-01T00:00:00Z"}
            ]
        })))
        .mount(&mock_server)
        .await;

    let store = ClientStore::new(Arc::new(api(&mock_server).clients().clone()))
        .with_clients(demo_clients());

    assert!(store.load().await);
    assert!(!store.is_loading());
    assert_eq!(store.len(), 4);
    assert_eq!(
        store.get(&ClientId::new("1")).unwrap().name,
        "Acme Technologies Pvt Ltd"
    );
    assert_eq!(store.get(&ClientId::new("77")).unwrap().client_type, ClientType::Opc);
}

#[tokio::test]
async fn task_board_creates_over_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/tasks/create-task"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "success": true,
            "data": {
                "id": "t-100",
                "title": "PF ECR March",
                "dueDate": "2025-04-15",
                "bucket": "PF"
            },
            "message": "Task created"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let notifier = Arc::new(RecordingNotifier::new());
    let board = TaskBoard::new(Arc::new(api(&mock_server).tasks().clone()))
        .with_notifier(notifier.clone());

    let due = NaiveDate::from_ymd_opt(2025, 4, 15).unwrap();
    assert!(board.create_via_api(NewTask::new("PF ECR March", ComplianceBucket::Pf, due)).await);
    assert_eq!(board.by_bucket(&ComplianceBucket::Pf).len(), 1);
    assert_eq!(notifier.last().unwrap().message, "Task created");
}
