//! User state storage.

use std::collections::HashMap;

use async_trait::async_trait;
use database::{feedback, user, Database, User, UserUpdate};
use tokio::sync::RwLock;

use crate::error::OrchestratorError;

/// Key-value persistence of user records, keyed by sender id.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user.
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, OrchestratorError>;

    /// Insert a new user.
    async fn insert(&self, user: &User) -> Result<(), OrchestratorError>;

    /// Apply a partial update.
    async fn update_fields(&self, id: &str, update: &UserUpdate) -> Result<(), OrchestratorError>;

    /// Remove a user entirely.
    async fn delete(&self, id: &str) -> Result<(), OrchestratorError>;

    /// Store a piece of feedback.
    async fn record_feedback(&self, user_id: &str, content: &str) -> Result<(), OrchestratorError>;
}

#[async_trait]
impl UserStore for Database {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, OrchestratorError> {
        Ok(user::find_user(self.pool(), id).await?)
    }

    async fn insert(&self, record: &User) -> Result<(), OrchestratorError> {
        Ok(user::create_user(self.pool(), record).await?)
    }

    async fn update_fields(&self, id: &str, update: &UserUpdate) -> Result<(), OrchestratorError> {
        Ok(user::update_user_fields(self.pool(), id, update).await?)
    }

    async fn delete(&self, id: &str) -> Result<(), OrchestratorError> {
        Ok(user::delete_user(self.pool(), id).await?)
    }

    async fn record_feedback(&self, user_id: &str, content: &str) -> Result<(), OrchestratorError> {
        feedback::insert_feedback(self.pool(), user_id, content).await?;
        Ok(())
    }
}

/// Thread-safe in-memory store for tests and local runs.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, User>>,
    feedback: RwLock<Vec<(String, String)>>,
}

impl InMemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a stored user.
    pub async fn get(&self, id: &str) -> Option<User> {
        self.users.read().await.get(id).cloned()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// Whether the store holds no users.
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    /// All stored feedback as `(user_id, content)` pairs.
    pub async fn feedback(&self) -> Vec<(String, String)> {
        self.feedback.read().await.clone()
    }
}

fn not_found(id: &str) -> OrchestratorError {
    OrchestratorError::Storage(format!("User not found: {}", id))
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, OrchestratorError> {
        Ok(self.get(id).await)
    }

    async fn insert(&self, user: &User) -> Result<(), OrchestratorError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(OrchestratorError::Storage(format!(
                "User already exists: {}",
                user.id
            )));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn update_fields(&self, id: &str, update: &UserUpdate) -> Result<(), OrchestratorError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(id).ok_or_else(|| not_found(id))?;
        user.apply(update);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), OrchestratorError> {
        self.users
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }

    async fn record_feedback(&self, user_id: &str, content: &str) -> Result<(), OrchestratorError> {
        self.feedback
            .write()
            .await
            .push((user_id.to_string(), content.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brain_core::ChatMessage;

    #[tokio::test]
    async fn test_in_memory_lifecycle() {
        let store = InMemoryUserStore::new();
        let user = User::new("1", None, 5.0);

        store.insert(&user).await.unwrap();
        assert!(store.insert(&user).await.is_err());

        store
            .update_fields("1", &UserUpdate::messages(vec![ChatMessage::user("hi")]))
            .await
            .unwrap();
        let stored = store.find_by_id("1").await.unwrap().unwrap();
        assert_eq!(stored.balance, 5.0);
        assert_eq!(stored.messages.len(), 1);

        store.delete("1").await.unwrap();
        assert!(store.find_by_id("1").await.unwrap().is_none());
        assert!(store.delete("1").await.is_err());
    }

    #[tokio::test]
    async fn test_database_store() {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();

        let user = User::new("2782", Some("Thandi".to_string()), 5.0);
        db.insert(&user).await.unwrap();
        db.update_fields("2782", &UserUpdate::balance(4.0)).await.unwrap();
        db.record_feedback("2782", "great").await.unwrap();

        let stored = db.find_by_id("2782").await.unwrap().unwrap();
        assert_eq!(stored.balance, 4.0);

        db.delete("2782").await.unwrap();
        assert!(db.find_by_id("2782").await.unwrap().is_none());
        assert!(matches!(
            db.update_fields("2782", &UserUpdate::balance(1.0)).await,
            Err(OrchestratorError::Storage(_))
        ));
    }
}
