//! SQLite persistence layer for the relay.
//!
//! This crate provides async database operations for sender records and
//! feedback using SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{Database, User, user};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:relay.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Create a user with the opening credit
//!     let user = User::new("27820000000", Some("Thandi".to_string()), 5.0);
//!     user::create_user(db.pool(), &user).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod feedback;
pub mod models;
pub mod user;
pub mod validation;

pub use error::{DatabaseError, Result};
pub use models::{Feedback, User, UserUpdate};
pub use validation::ValidationError;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 10;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/relay.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing; keep it to one connection)
    /// let db = database::Database::connect_with_pool_size("sqlite::memory:", 1).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!("Connected to database: {} (pool size: {})", url, pool_size);

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brain_core::ChatMessage;

    async fn test_db() -> Database {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_user_crud() {
        let db = test_db().await;

        // Create
        let user = User::new("27820000001", Some("Alice".to_string()), 5.0);
        user::create_user(db.pool(), &user).await.unwrap();

        // Read
        let fetched = user::get_user(db.pool(), &user.id).await.unwrap();
        assert_eq!(fetched.display_name.as_deref(), Some("Alice"));
        assert_eq!(fetched.balance, 5.0);
        assert!(fetched.messages.is_empty());

        // Partial update: history only
        let history = vec![ChatMessage::user("hello"), ChatMessage::assistant("hi")];
        user::update_user_fields(db.pool(), &user.id, &UserUpdate::messages(history.clone()))
            .await
            .unwrap();
        let fetched = user::get_user(db.pool(), &user.id).await.unwrap();
        assert_eq!(fetched.messages, history);
        assert_eq!(fetched.balance, 5.0);

        // Partial update: balance only
        user::update_user_fields(db.pool(), &user.id, &UserUpdate::balance(4.25))
            .await
            .unwrap();
        let fetched = user::get_user(db.pool(), &user.id).await.unwrap();
        assert_eq!(fetched.balance, 4.25);
        assert_eq!(fetched.messages, history);

        assert_eq!(user::count_users(db.pool()).await.unwrap(), 1);

        // Delete
        user::delete_user(db.pool(), &user.id).await.unwrap();
        let result = user::get_user(db.pool(), &user.id).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
        assert!(user::find_user(db.pool(), &user.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_user_rejected() {
        let db = test_db().await;
        let user = User::new("dup", None, 5.0);

        user::create_user(db.pool(), &user).await.unwrap();
        let result = user::create_user(db.pool(), &user).await;
        assert!(matches!(result, Err(DatabaseError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let db = test_db().await;
        let result = user::update_user_fields(db.pool(), "ghost", &UserUpdate::balance(1.0)).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));

        let result = user::delete_user(db.pool(), "ghost").await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_missing_columns_backfill_defaults() {
        let db = test_db().await;

        sqlx::query("INSERT INTO users (id) VALUES ('legacy')")
            .execute(db.pool())
            .await
            .unwrap();

        let user = user::get_user(db.pool(), "legacy").await.unwrap();
        assert_eq!(user.balance, 0.0);
        assert!(user.messages.is_empty());
        assert!(user.display_name.is_none());
        assert!(user.pending_termination.is_none());
        assert!(!user.created_at.is_empty());
    }

    #[tokio::test]
    async fn test_pending_termination_set_and_cleared() {
        let db = test_db().await;
        let user = User::new("pending", None, 5.0);
        user::create_user(db.pool(), &user).await.unwrap();

        let set = UserUpdate::messages(vec![ChatMessage::user("stop")])
            .with_pending_termination(Some("stop".to_string()));
        user::update_user_fields(db.pool(), &user.id, &set).await.unwrap();
        let fetched = user::get_user(db.pool(), &user.id).await.unwrap();
        assert_eq!(fetched.pending_termination.as_deref(), Some("stop"));

        // Updates that leave the marker alone keep it
        user::update_user_fields(db.pool(), &user.id, &UserUpdate::balance(4.0))
            .await
            .unwrap();
        let fetched = user::get_user(db.pool(), &user.id).await.unwrap();
        assert_eq!(fetched.pending_termination.as_deref(), Some("stop"));

        let clear = UserUpdate::default().with_pending_termination(None);
        user::update_user_fields(db.pool(), &user.id, &clear).await.unwrap();
        let fetched = user::get_user(db.pool(), &user.id).await.unwrap();
        assert!(fetched.pending_termination.is_none());
        assert_eq!(fetched.balance, 4.0);
        assert_eq!(fetched.messages.len(), 1);
    }

    #[tokio::test]
    async fn test_feedback_survives_user_deletion() {
        let db = test_db().await;
        let user = User::new("fb-user", None, 5.0);
        user::create_user(db.pool(), &user).await.unwrap();

        feedback::insert_feedback(db.pool(), &user.id, "  first  ")
            .await
            .unwrap();
        feedback::insert_feedback(db.pool(), &user.id, "second")
            .await
            .unwrap();
        user::delete_user(db.pool(), &user.id).await.unwrap();

        let entries = feedback::list_feedback_for_user(db.pool(), &user.id)
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].content, "second");
        assert_eq!(entries[1].content, "first");
    }

    #[tokio::test]
    async fn test_empty_feedback_rejected() {
        let db = test_db().await;
        let result = feedback::insert_feedback(db.pool(), "someone", "   ").await;
        assert!(matches!(result, Err(DatabaseError::Invalid(_))));
    }
}
