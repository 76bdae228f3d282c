use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::manager::DatabaseError;

/// Password field of a user record. `Plain` marks a value that changed since
/// the last save and still has to be hashed.
#[derive(Clone)]
pub enum Password {
    Plain(String),
    Hashed(String),
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Password::Plain(_) => f.write_str("Password::Plain(..)"),
            Password::Hashed(_) => f.write_str("Password::Hashed(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    password: Password,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: impl Into<String>, password: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            name: name.into(),
            password: Password::Plain(password.into()),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = Password::Plain(password.into());
    }

    pub fn is_password_modified(&self) -> bool {
        matches!(self.password, Password::Plain(_))
    }

    /// Stored hash, available once the record went through [`User::before_save`].
    pub fn password_hash(&self) -> Option<&str> {
        match &self.password {
            Password::Hashed(hash) => Some(hash),
            Password::Plain(_) => None,
        }
    }

    /// Runs right before every write. Hashes the password only when it was
    /// modified, so a stored hash is never hashed again. Argon2 runs on the
    /// blocking pool; call this before taking any store lock.
    pub async fn before_save(&mut self) -> Result<(), DatabaseError> {
        if let Password::Plain(plain) = &self.password {
            let plain = plain.clone();
            let hash = tokio::task::spawn_blocking(move || hash_password(&plain))
                .await
                .map_err(|e| DatabaseError::Password(e.to_string()))??;
            self.password = Password::Hashed(hash);
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Checks `candidate` against the stored hash on the blocking pool.
    pub async fn verify_password(&self, candidate: &str) -> bool {
        let Password::Hashed(hash) = &self.password else {
            return false;
        };
        let (hash, candidate) = (hash.clone(), candidate.to_string());

        match tokio::task::spawn_blocking(move || verify_hash(&hash, &candidate)).await {
            Ok(Ok(matches)) => matches,
            Ok(Err(e)) => {
                tracing::warn!("Stored password hash for user {} is unreadable: {}", self.id, e);
                false
            }
            Err(e) => {
                tracing::error!("Password check for user {} did not complete: {}", self.id, e);
                false
            }
        }
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            created_at: self.created_at,
        }
    }
}

fn hash_password(plain: &str) -> Result<String, DatabaseError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DatabaseError::Password(e.to_string()))
}

fn verify_hash(hash: &str, candidate: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(hash)?;
    Ok(Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok())
}

/// Row shape of the `users` table.
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            name: row.name,
            password: Password::Hashed(row.password),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Client-facing view of a user; never carries the password.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
