//! Database models for authors.

use std::fmt;

use crate::types::AuthorId;

/// Database request for creating a new author
#[derive(Clone)]
pub struct AuthorCreateDBRequest {
    pub username: String,
    pub password_hash: String,
}

/// Database response for an author
#[derive(Clone, sqlx::FromRow)]
pub struct AuthorDBResponse {
    pub id: AuthorId,
    pub username: String,
    pub password_hash: String,
    pub is_active: bool,
}

impl fmt::Debug for AuthorCreateDBRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorCreateDBRequest")
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for AuthorDBResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorDBResponse")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("is_active", &self.is_active)
            .finish()
    }
}
