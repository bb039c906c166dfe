//! Database models for posts.

use crate::types::{AuthorId, PostId};

/// Database request for creating a new post
#[derive(Debug, Clone)]
pub struct PostCreateDBRequest {
    pub title: String,
    pub description: Option<String>,
    pub owner_id: AuthorId,
}

/// Database response for a post
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PostDBResponse {
    pub id: PostId,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: AuthorId,
}
