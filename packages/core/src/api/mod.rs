//! HTTP API: shared handler state and route assembly.

pub mod answers;
pub mod health;
pub mod questions;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::repository::QaRepository;

/// Shared state for all API routes.
pub type ApiState = Arc<QaRepository>;

/// Assemble the application router. `main.rs` and the integration tests use
/// the same wiring; CORS and metrics layers are added by the caller.
pub fn create_router(repo: ApiState) -> Router {
    Router::new()
        .route(
            "/questions/",
            get(questions::list_questions).post(questions::create_question),
        )
        .route(
            "/questions/:id",
            get(questions::get_question).delete(questions::delete_question),
        )
        .route("/questions/:id/answers/", post(answers::create_answer))
        .route(
            "/answers/:id",
            get(answers::get_answer).delete(answers::delete_answer),
        )
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness))
        .route("/health", get(health::health))
        .with_state(repo)
}
