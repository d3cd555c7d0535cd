//! Database repository for questions and answers.
//!
//! All SQLite read/write logic lives here. Handlers call into
//! [`QaRepository`] with already-validated input; the repository owns the
//! integrity rules the schema alone cannot express as a single statement:
//! an answer is only inserted inside the same transaction that confirms its
//! question exists, and deleting a question removes its answers in the same
//! transaction.
//!
//! Timestamps are stored as RFC 3339 strings and parsed back on read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

/// A question row. Questions own their answers exclusively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// An answer row, always referencing an existing question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub id: i64,
    pub question_id: i64,
    pub user_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Repository for reading and writing questions and answers.
pub struct QaRepository {
    pool: SqlitePool,
}

fn row_to_question(row: &SqliteRow) -> Option<Question> {
    let id: i64 = row.try_get("id").ok()?;
    let text: String = row.try_get("text").ok()?;
    let created_at_str: String = row.try_get("created_at").ok()?;

    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .ok()?
        .with_timezone(&Utc);

    Some(Question {
        id,
        text,
        created_at,
    })
}

fn row_to_answer(row: &SqliteRow) -> Option<Answer> {
    let id: i64 = row.try_get("id").ok()?;
    let question_id: i64 = row.try_get("question_id").ok()?;
    let user_id: String = row.try_get("user_id").ok()?;
    let text: String = row.try_get("text").ok()?;
    let created_at_str: String = row.try_get("created_at").ok()?;

    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .ok()?
        .with_timezone(&Utc);

    Some(Answer {
        id,
        question_id,
        user_id,
        text,
        created_at,
    })
}

impl QaRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new question. Returns the row with its generated id and
    /// creation timestamp.
    pub async fn create_question(&self, text: &str) -> Result<Question, sqlx::Error> {
        let created_at = Utc::now();

        let result = sqlx::query("INSERT INTO questions (text, created_at) VALUES (?, ?)")
            .bind(text)
            .bind(created_at.to_rfc3339())
            .execute(&self.pool)
            .await?;

        Ok(Question {
            id: result.last_insert_rowid(),
            text: text.to_string(),
            created_at,
        })
    }

    /// All questions in insertion order, without their answers.
    pub async fn list_questions(&self) -> Result<Vec<Question>, sqlx::Error> {
        let rows = sqlx::query("SELECT id, text, created_at FROM questions ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().filter_map(row_to_question).collect())
    }

    /// Fetch a single question, or `None` if the id is absent.
    pub async fn get_question(&self, id: i64) -> Result<Option<Question>, sqlx::Error> {
        let row = sqlx::query("SELECT id, text, created_at FROM questions WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().and_then(row_to_question))
    }

    /// All answers referencing `question_id`, in insertion order.
    pub async fn list_answers_for(&self, question_id: i64) -> Result<Vec<Answer>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT id, question_id, user_id, text, created_at
             FROM answers
             WHERE question_id = ?
             ORDER BY id ASC",
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().filter_map(row_to_answer).collect())
    }

    /// Delete a question and all of its answers in one transaction.
    /// Returns `false` if the question id was absent (nothing is deleted).
    pub async fn delete_question(&self, id: i64) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        // The FK cascade covers this too; deleting explicitly keeps both
        // steps inside the same transaction even if foreign keys are off.
        sqlx::query("DELETE FROM answers WHERE question_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM questions WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Insert an answer for `question_id`. The question's existence is
    /// checked inside the insert transaction; returns `None` without
    /// persisting anything when the question is absent.
    pub async fn create_answer(
        &self,
        question_id: i64,
        user_id: &str,
        text: &str,
    ) -> Result<Option<Answer>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let question = sqlx::query("SELECT id FROM questions WHERE id = ?")
            .bind(question_id)
            .fetch_optional(&mut *tx)
            .await?;
        if question.is_none() {
            // Dropping the transaction rolls it back.
            return Ok(None);
        }

        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO answers (question_id, user_id, text, created_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(question_id)
        .bind(user_id)
        .bind(text)
        .bind(created_at.to_rfc3339())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(Answer {
            id: result.last_insert_rowid(),
            question_id,
            user_id: user_id.to_string(),
            text: text.to_string(),
            created_at,
        }))
    }

    /// Fetch a single answer, or `None` if the id is absent.
    pub async fn get_answer(&self, id: i64) -> Result<Option<Answer>, sqlx::Error> {
        let row = sqlx::query(
            "SELECT id, question_id, user_id, text, created_at FROM answers WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().and_then(row_to_answer))
    }

    /// Delete a single answer. Returns `false` if the id was absent.
    pub async fn delete_answer(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM answers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Trivial round-trip used by the readiness and health endpoints.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::db::create_pool;

    async fn make_repo() -> QaRepository {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        QaRepository::new(pool)
    }

    // ---- questions ----

    #[tokio::test]
    async fn create_and_get_question_roundtrip() {
        let repo = make_repo().await;
        let created = repo.create_question("What is ownership?").await.unwrap();
        assert!(created.id > 0);

        let fetched = repo.get_question(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.text, "What is ownership?");
        assert_eq!(fetched.created_at, created.created_at);
    }

    #[tokio::test]
    async fn list_questions_returns_insertion_order() {
        let repo = make_repo().await;
        repo.create_question("first").await.unwrap();
        repo.create_question("second").await.unwrap();
        repo.create_question("third").await.unwrap();

        let questions = repo.list_questions().await.unwrap();
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[0].text, "first");
        assert_eq!(questions[2].text, "third");
    }

    #[tokio::test]
    async fn get_question_returns_none_for_missing_id() {
        let repo = make_repo().await;
        assert!(repo.get_question(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_question_returns_false_for_missing_id() {
        let repo = make_repo().await;
        assert!(!repo.delete_question(9999).await.unwrap());
    }

    // ---- answers ----

    #[tokio::test]
    async fn create_answer_for_existing_question() {
        let repo = make_repo().await;
        let question = repo.create_question("2+2=?").await.unwrap();

        let answer = repo
            .create_answer(question.id, "user123", "4")
            .await
            .unwrap()
            .unwrap();
        assert!(answer.id > 0);
        assert_eq!(answer.question_id, question.id);
        assert_eq!(answer.user_id, "user123");

        let fetched = repo.get_answer(answer.id).await.unwrap().unwrap();
        assert_eq!(fetched.text, "4");
    }

    #[tokio::test]
    async fn create_answer_for_missing_question_persists_nothing() {
        let repo = make_repo().await;
        let result = repo.create_answer(9999, "user123", "orphan").await.unwrap();
        assert!(result.is_none());

        let answers = repo.list_answers_for(9999).await.unwrap();
        assert!(answers.is_empty());
    }

    #[tokio::test]
    async fn list_answers_for_returns_only_that_questions_answers() {
        let repo = make_repo().await;
        let q1 = repo.create_question("q1").await.unwrap();
        let q2 = repo.create_question("q2").await.unwrap();
        repo.create_answer(q1.id, "u1", "a1").await.unwrap();
        repo.create_answer(q1.id, "u2", "a2").await.unwrap();
        repo.create_answer(q2.id, "u3", "other").await.unwrap();

        let answers = repo.list_answers_for(q1.id).await.unwrap();
        assert_eq!(answers.len(), 2);
        assert!(answers.iter().all(|a| a.question_id == q1.id));
    }

    #[tokio::test]
    async fn delete_answer_leaves_parent_and_siblings() {
        let repo = make_repo().await;
        let question = repo.create_question("q").await.unwrap();
        let a1 = repo
            .create_answer(question.id, "u1", "first")
            .await
            .unwrap()
            .unwrap();
        let a2 = repo
            .create_answer(question.id, "u2", "second")
            .await
            .unwrap()
            .unwrap();

        assert!(repo.delete_answer(a1.id).await.unwrap());

        assert!(repo.get_answer(a1.id).await.unwrap().is_none());
        assert!(repo.get_answer(a2.id).await.unwrap().is_some());
        assert!(repo.get_question(question.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn delete_answer_returns_false_for_missing_id() {
        let repo = make_repo().await;
        assert!(!repo.delete_answer(9999).await.unwrap());
    }

    // ---- cascade delete ----

    #[tokio::test]
    async fn delete_question_cascades_over_all_answers() {
        let repo = make_repo().await;
        let question = repo.create_question("doomed").await.unwrap();
        let mut answer_ids = Vec::new();
        for i in 0..3 {
            let answer = repo
                .create_answer(question.id, &format!("user{i}"), &format!("answer {i}"))
                .await
                .unwrap()
                .unwrap();
            answer_ids.push(answer.id);
        }

        assert!(repo.delete_question(question.id).await.unwrap());

        assert!(repo.get_question(question.id).await.unwrap().is_none());
        for id in answer_ids {
            assert!(repo.get_answer(id).await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn delete_question_does_not_touch_other_questions_answers() {
        let repo = make_repo().await;
        let doomed = repo.create_question("doomed").await.unwrap();
        let kept = repo.create_question("kept").await.unwrap();
        repo.create_answer(doomed.id, "u1", "gone").await.unwrap();
        let survivor = repo
            .create_answer(kept.id, "u2", "stays")
            .await
            .unwrap()
            .unwrap();

        repo.delete_question(doomed.id).await.unwrap();

        assert!(repo.get_answer(survivor.id).await.unwrap().is_some());
        assert_eq!(repo.list_answers_for(kept.id).await.unwrap().len(), 1);
    }

    // ---- ping ----

    #[tokio::test]
    async fn ping_succeeds_on_open_pool() {
        let repo = make_repo().await;
        assert!(repo.ping().await.is_ok());
    }

    #[tokio::test]
    async fn ping_fails_on_closed_pool() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        let repo = QaRepository::new(pool.clone());
        pool.close().await;
        assert!(repo.ping().await.is_err());
    }
}
