use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{api::models::posts::PostResponse, db::models::authors::AuthorDBResponse, types::AuthorId};

/// Registration payload
#[derive(Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthorCreate {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for AuthorCreate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorCreate")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// An author with their posts. The password hash is never part of this.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthorResponse {
    pub id: AuthorId,
    pub username: String,
    pub is_active: bool,
    pub posts: Vec<PostResponse>,
}

impl From<(AuthorDBResponse, Vec<PostResponse>)> for AuthorResponse {
    fn from((author, posts): (AuthorDBResponse, Vec<PostResponse>)) -> Self {
        Self {
            id: author.id,
            username: author.username,
            is_active: author.is_active,
            posts,
        }
    }
}
