//! In-process store for tests and `DATABASE_URL=memory://` development runs.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::manager::DatabaseError;
use super::memoizer::ConnectionState;
use super::models::{User, Video};
use super::store::Store;

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, User>>,
    videos: RwLock<Vec<Video>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    fn connection_state(&self) -> ConnectionState {
        ConnectionState::Connected
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn insert_user(&self, user: &mut User) -> Result<(), DatabaseError> {
        user.before_save().await?;

        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            return Err(DatabaseError::Duplicate(user.email.clone()));
        }
        users.insert(user.email.clone(), user.clone());
        Ok(())
    }

    async fn list_videos(&self) -> Result<Vec<Video>, DatabaseError> {
        // Reverse first so equal timestamps keep the latest insert on top
        let mut videos: Vec<Video> = self.videos.read().await.iter().rev().cloned().collect();
        videos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(videos)
    }

    async fn insert_video(&self, video: &Video) -> Result<(), DatabaseError> {
        self.videos.write().await.push(video.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_hashed_password_and_rejects_duplicates() {
        let store = MemoryStore::new();

        let mut user = User::new("a@b.com", "x", "A");
        store.insert_user(&mut user).await.unwrap();

        let stored = store.find_user_by_email("a@b.com").await.unwrap().unwrap();
        assert_ne!(stored.password_hash(), Some("x"));
        assert!(stored.verify_password("x").await);

        let mut again = User::new("a@b.com", "y", "B");
        let err = store.insert_user(&mut again).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Duplicate(email) if email == "a@b.com"));
    }

    #[tokio::test]
    async fn unknown_email_is_none() {
        let store = MemoryStore::new();
        assert!(store.find_user_by_email("nobody@b.com").await.unwrap().is_none());
    }
}
