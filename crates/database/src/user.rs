//! User CRUD operations.

use brain_core::ChatMessage;
use sqlx::types::Json;
use sqlx::{FromRow, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::{now_timestamp, User, UserUpdate};

/// Row shape of the `users` table; the history column holds JSON.
#[derive(Debug, FromRow)]
struct UserRow {
    id: String,
    display_name: Option<String>,
    balance: f64,
    messages: Json<Vec<ChatMessage>>,
    pending_termination: Option<String>,
    created_at: String,
    updated_at: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            display_name: row.display_name,
            balance: row.balance,
            messages: row.messages.0,
            pending_termination: row.pending_termination,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Create a new user.
pub async fn create_user(pool: &SqlitePool, user: &User) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO users (id, display_name, balance, messages, pending_termination, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&user.id)
    .bind(&user.display_name)
    .bind(user.balance)
    .bind(Json(&user.messages))
    .bind(&user.pending_termination)
    .bind(&user.created_at)
    .bind(&user.updated_at)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "User",
                    id: user.id.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(())
}

/// Find a user by ID, returning `None` when absent.
pub async fn find_user(pool: &SqlitePool, id: &str) -> Result<Option<User>> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, display_name, balance, messages, pending_termination, created_at, updated_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(User::from))
}

/// Get a user by ID.
pub async fn get_user(pool: &SqlitePool, id: &str) -> Result<User> {
    find_user(pool, id)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "User",
            id: id.to_string(),
        })
}

/// Update the fields set in `update`, leaving the others as stored.
///
/// `pending_termination` can be cleared to NULL, so it is guarded by an
/// explicit flag instead of `COALESCE`.
pub async fn update_user_fields(pool: &SqlitePool, id: &str, update: &UserUpdate) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET balance = COALESCE(?, balance),
            messages = COALESCE(?, messages),
            pending_termination = CASE WHEN ? THEN ? ELSE pending_termination END,
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(update.balance)
    .bind(update.messages.as_ref().map(Json))
    .bind(update.pending_termination.is_some())
    .bind(update.pending_termination.clone().flatten())
    .bind(now_timestamp())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "User",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Delete a user by ID.
pub async fn delete_user(pool: &SqlitePool, id: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "User",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Count total users.
pub async fn count_users(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM users
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
