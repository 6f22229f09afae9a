//! ComplAI stub backend — standalone development server.
//!
//! Storage is in-memory with no persistence; data is lost on restart. The
//! client list starts with the demo clients.
//!
//! Environment:
//! - `COMPLAI_STUB_PORT` (default 3000)
//! - `RUST_LOG` (default `info`)

use std::net::SocketAddr;

use complai_stub::{router, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port: u16 = std::env::var("COMPLAI_STUB_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(3000);

    let app = router(AppState::with_demo_data());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("complai-stub listening on {addr}, API base http://localhost:{port}/v1");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await
}
