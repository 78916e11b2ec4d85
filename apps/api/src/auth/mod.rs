//! Credential store gating access to sessions.
//!
//! `AppState` holds an `Arc<dyn CredentialStore>`. The in-memory store is process-local
//! and lost on restart; a durable backend only has to implement `register` and `verify`.

pub mod handlers;

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::user::UserRecord;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already exists!")]
    Duplicate,

    #[error("Email not found!")]
    NotFound,

    #[error("Incorrect password!")]
    WrongCredential,

    #[error("credential hashing failed: {0}")]
    Hash(String),
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Inserts a new account. Fails with `Duplicate` if the email is already a key,
    /// leaving the existing record untouched.
    async fn register(&self, email: &str, password: &str) -> Result<(), AuthError>;

    /// Checks a login attempt: `NotFound` for unknown emails, `WrongCredential` on mismatch.
    async fn verify(&self, email: &str, password: &str) -> Result<(), AuthError>;
}

/// Process-local store keyed by email, holding argon2 hashes rather than passwords.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn register(&self, email: &str, password: &str) -> Result<(), AuthError> {
        if self.users.read().await.contains_key(email) {
            return Err(AuthError::Duplicate);
        }

        // Hash off the runtime and outside the lock; the entry check below stays atomic.
        let password = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AuthError::Hash(e.to_string()))??;

        match self.users.write().await.entry(email.to_string()) {
            Entry::Occupied(_) => Err(AuthError::Duplicate),
            Entry::Vacant(slot) => {
                let record = slot.insert(UserRecord {
                    email: email.to_string(),
                    password_hash,
                    created_at: Utc::now(),
                });
                debug!(email = %record.email, created_at = %record.created_at, "Account stored");
                Ok(())
            }
        }
    }

    async fn verify(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let stored = self
            .users
            .read()
            .await
            .get(email)
            .map(|record| record.password_hash.clone())
            .ok_or(AuthError::NotFound)?;

        let password = password.to_string();
        tokio::task::spawn_blocking(move || verify_password(&password, &stored))
            .await
            .map_err(|e| AuthError::Hash(e.to_string()))?
    }
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

fn verify_password(password: &str, stored: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(stored).map_err(|e| AuthError::Hash(e.to_string()))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::WrongCredential)
}
