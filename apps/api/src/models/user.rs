use chrono::{DateTime, Utc};

/// A registered account. Created once on registration, never updated or deleted.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
