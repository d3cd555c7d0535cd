//! SQLite pool construction and schema setup.
//!
//! [`create_pool`] is the only way the rest of the crate obtains a database
//! handle: it opens the pool, turns foreign-key enforcement on for the
//! connection, and applies the schema so a fresh database (including the
//! `sqlite::memory:` pools used throughout the tests) is immediately usable.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// Schema applied on startup. `created_at` columns hold RFC 3339 strings;
/// the repository sets them on insert.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS questions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        text TEXT NOT NULL,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS answers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        question_id INTEGER NOT NULL REFERENCES questions(id) ON DELETE CASCADE,
        user_id TEXT NOT NULL,
        text TEXT NOT NULL,
        created_at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_answers_question_id ON answers(question_id)",
];

/// Open a SQLite pool for `url` and apply the schema.
///
/// The pool is capped at one connection: SQLite allows a single writer
/// anyway, and one connection keeps `sqlite::memory:` databases coherent
/// across the pool.
pub async fn create_pool(url: &str) -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                sqlx::query("PRAGMA foreign_keys = ON")
                    .execute(&mut *conn)
                    .await?;
                Ok(())
            })
        })
        .connect(url)
        .await?;

    for statement in SCHEMA {
        sqlx::query(statement).execute(&pool).await?;
    }

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_pool_applies_schema() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        sqlx::query("SELECT id, text, created_at FROM questions")
            .fetch_all(&pool)
            .await
            .unwrap();
        sqlx::query("SELECT id, question_id, user_id, text, created_at FROM answers")
            .fetch_all(&pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        let result = sqlx::query(
            "INSERT INTO answers (question_id, user_id, text, created_at)
             VALUES (999, 'u1', 'orphan', '2024-01-01T00:00:00+00:00')",
        )
        .execute(&pool)
        .await;
        assert!(result.is_err(), "orphan answer insert should be rejected");
    }

    #[tokio::test]
    async fn create_pool_is_idempotent_over_the_schema() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await.unwrap();
        }
    }
}
