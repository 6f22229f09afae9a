//! Shared harness: serve the stub router on an ephemeral port.

use complai_api_client::{ApiConfig, ComplaiClient};
use complai_stub::{router, AppState};

/// A running stub. The server stops when this is dropped.
pub struct StubServer {
    pub port: u16,
    pub state: AppState,
    _shutdown: tokio::sync::oneshot::Sender<()>,
}

impl StubServer {
    pub fn client(&self) -> ComplaiClient {
        ComplaiClient::new(ApiConfig::local(self.port).unwrap().with_timeout_secs(5)).unwrap()
    }
}

/// Start a stub seeded from `state`.
pub async fn start_stub(state: AppState) -> StubServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind to random port");
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let app = router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(async {
                rx.await.ok();
            })
            .await
            .ok();
    });

    StubServer {
        port,
        state,
        _shutdown: tx,
    }
}
