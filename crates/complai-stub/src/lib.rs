//! # complai-stub — In-Memory ComplAI Backend
//!
//! Implements every endpoint `complai-api-client` calls, backed by
//! in-memory repositories. Used for local development (`complai-stub`
//! binary) and by the end-to-end tests, which mount [`router`] on an
//! ephemeral port.

pub mod error;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use routes::router;
pub use state::AppState;
