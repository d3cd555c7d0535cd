//! Question endpoints.
//!
//! Routes:
//! - `POST   /questions/`     — create a question
//! - `GET    /questions/`     — list all questions, without answers
//! - `GET    /questions/:id`  — one question with all of its answers
//! - `DELETE /questions/:id`  — delete a question and, with it, its answers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::error::ApiError;
use crate::repository::{Answer, Question};
use crate::validate::{normalize_text, QUESTION_TEXT_MAX};

#[derive(Debug, Deserialize)]
pub struct CreateQuestionRequest {
    pub text: String,
}

/// Response shape for `GET /questions/:id`: the question plus its answers,
/// eagerly loaded.
#[derive(Debug, Serialize)]
pub struct QuestionWithAnswers {
    pub id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub answers: Vec<Answer>,
}

/// `GET /questions/` — list all questions.
pub async fn list_questions(
    State(repo): State<ApiState>,
) -> Result<Json<Vec<Question>>, ApiError> {
    let questions = repo.list_questions().await?;
    Ok(Json(questions))
}

/// `POST /questions/` — create a question from validated text.
pub async fn create_question(
    State(repo): State<ApiState>,
    Json(body): Json<CreateQuestionRequest>,
) -> Result<(StatusCode, Json<Question>), ApiError> {
    let text = normalize_text(&body.text, "text", QUESTION_TEXT_MAX).map_err(|err| {
        tracing::warn!("Question rejected: {}", err);
        err
    })?;

    let question = repo.create_question(&text).await?;
    tracing::info!("Created question id={}", question.id);
    Ok((StatusCode::CREATED, Json(question)))
}

/// `GET /questions/:id` — a question with all of its answers.
pub async fn get_question(
    State(repo): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<Json<QuestionWithAnswers>, ApiError> {
    let question = repo.get_question(id).await?.ok_or_else(|| {
        tracing::warn!("Question id={} not found", id);
        ApiError::not_found("Question")
    })?;
    let answers = repo.list_answers_for(id).await?;

    Ok(Json(QuestionWithAnswers {
        id: question.id,
        text: question.text,
        created_at: question.created_at,
        answers,
    }))
}

/// `DELETE /questions/:id` — delete a question together with its answers.
pub async fn delete_question(
    State(repo): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if repo.delete_question(id).await? {
        tracing::info!("Deleted question id={}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        tracing::warn!("Question id={} not found", id);
        Err(ApiError::not_found("Question"))
    }
}
