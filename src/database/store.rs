use async_trait::async_trait;
use sqlx::PgPool;

use super::manager::{Database, DatabaseError};
use super::memoizer::ConnectionState;
use super::models::{User, UserRow, Video};

/// Persistence operations the handlers depend on.
///
/// `insert_user` implementations must run [`User::before_save`] before the
/// write so a plaintext password never reaches storage.
#[async_trait]
pub trait Store: Send + Sync {
    async fn ping(&self) -> Result<(), DatabaseError>;

    fn connection_state(&self) -> ConnectionState;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    async fn insert_user(&self, user: &mut User) -> Result<(), DatabaseError>;

    /// Newest first.
    async fn list_videos(&self) -> Result<Vec<Video>, DatabaseError>;

    async fn insert_video(&self, video: &Video) -> Result<(), DatabaseError>;
}

/// PostgreSQL store. Every operation goes through the shared connection memoizer.
pub struct PgStore {
    database: &'static Database,
}

impl PgStore {
    pub fn new(database: &'static Database) -> Self {
        Self { database }
    }

    async fn pool(&self) -> Result<PgPool, DatabaseError> {
        let buffer_commands = self.database.connector().settings().buffer_commands;
        self.database.acquire(buffer_commands).await
    }
}

const UNIQUE_VIOLATION: &str = "23505";

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        let pool = self.pool().await?;
        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(())
    }

    fn connection_state(&self) -> ConnectionState {
        self.database.state()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let pool = self.pool().await?;

        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, password, name, created_at, updated_at
             FROM users
             WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn insert_user(&self, user: &mut User) -> Result<(), DatabaseError> {
        user.before_save().await?;
        let pool = self.pool().await?;

        let hash = user
            .password_hash()
            .ok_or_else(|| DatabaseError::Password("password was not hashed".to_string()))?;

        sqlx::query(
            "INSERT INTO users (id, email, password, name, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(hash)
        .bind(&user.name)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DatabaseError::Duplicate(user.email.clone())
            } else {
                DatabaseError::from(e)
            }
        })?;

        Ok(())
    }

    async fn list_videos(&self) -> Result<Vec<Video>, DatabaseError> {
        let pool = self.pool().await?;

        let videos = sqlx::query_as::<_, Video>(
            "SELECT id, title, description, video_url, thumbnail_url, controls, owner_id,
                    created_at, updated_at
             FROM videos
             ORDER BY created_at DESC",
        )
        .fetch_all(&pool)
        .await?;

        Ok(videos)
    }

    async fn insert_video(&self, video: &Video) -> Result<(), DatabaseError> {
        let pool = self.pool().await?;

        sqlx::query(
            "INSERT INTO videos
                (id, title, description, video_url, thumbnail_url, controls, owner_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(video.id)
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.video_url)
        .bind(&video.thumbnail_url)
        .bind(video.controls)
        .bind(video.owner_id)
        .bind(video.created_at)
        .bind(video.updated_at)
        .execute(&pool)
        .await?;

        Ok(())
    }
}
