//! Feedback persistence.

use sqlx::SqlitePool;

use crate::models::Feedback;
use crate::validation::validate_feedback;
use crate::Result;

/// Store a piece of feedback, returning its row id.
pub async fn insert_feedback(pool: &SqlitePool, user_id: &str, content: &str) -> Result<i64> {
    let content = validate_feedback(content)?;

    let result = sqlx::query(
        r#"
        INSERT INTO feedback (user_id, content)
        VALUES (?, ?)
        "#,
    )
    .bind(user_id)
    .bind(content)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// List feedback left by a user, newest first.
pub async fn list_feedback_for_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<Feedback>> {
    let rows = sqlx::query_as::<_, Feedback>(
        r#"
        SELECT id, user_id, content, created_at
        FROM feedback
        WHERE user_id = ?
        ORDER BY id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
