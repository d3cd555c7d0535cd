//! Answer endpoints.
//!
//! Routes:
//! - `POST   /questions/:id/answers/` — attach an answer to a question
//! - `GET    /answers/:id`            — fetch one answer
//! - `DELETE /answers/:id`            — delete one answer

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::ApiState;
use crate::error::ApiError;
use crate::repository::Answer;
use crate::validate::{normalize_text, ANSWER_TEXT_MAX, USER_ID_MAX};

#[derive(Debug, Deserialize)]
pub struct CreateAnswerRequest {
    pub user_id: String,
    pub text: String,
}

/// `POST /questions/:id/answers/` — create an answer under a question.
/// 404 when the question does not exist; the existence check and insert run
/// in one repository transaction, so no row is left behind on failure.
pub async fn create_answer(
    State(repo): State<ApiState>,
    Path(question_id): Path<i64>,
    Json(body): Json<CreateAnswerRequest>,
) -> Result<(StatusCode, Json<Answer>), ApiError> {
    let user_id = normalize_text(&body.user_id, "user_id", USER_ID_MAX).map_err(|err| {
        tracing::warn!("Answer rejected: {}", err);
        err
    })?;
    let text = normalize_text(&body.text, "text", ANSWER_TEXT_MAX).map_err(|err| {
        tracing::warn!("Answer rejected: {}", err);
        err
    })?;

    let answer = repo
        .create_answer(question_id, &user_id, &text)
        .await?
        .ok_or_else(|| {
            tracing::warn!(
                "Attempted to answer non-existent question id={}",
                question_id
            );
            ApiError::not_found("Question")
        })?;

    tracing::info!(
        "Created answer id={} for question id={}",
        answer.id,
        question_id
    );
    Ok((StatusCode::CREATED, Json(answer)))
}

/// `GET /answers/:id` — fetch a single answer.
pub async fn get_answer(
    State(repo): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<Json<Answer>, ApiError> {
    let answer = repo.get_answer(id).await?.ok_or_else(|| {
        tracing::warn!("Answer id={} not found", id);
        ApiError::not_found("Answer")
    })?;
    Ok(Json(answer))
}

/// `DELETE /answers/:id` — delete a single answer. Its question and any
/// sibling answers are untouched.
pub async fn delete_answer(
    State(repo): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if repo.delete_answer(id).await? {
        tracing::info!("Deleted answer id={}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        tracing::warn!("Answer id={} not found", id);
        Err(ApiError::not_found("Answer"))
    }
}
