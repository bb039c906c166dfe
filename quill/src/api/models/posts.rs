use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    db::models::posts::PostDBResponse,
    types::{AuthorId, PostId},
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostCreate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PostResponse {
    pub id: PostId,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: AuthorId,
}

impl From<PostDBResponse> for PostResponse {
    fn from(db: PostDBResponse) -> Self {
        Self {
            id: db.id,
            title: db.title,
            description: db.description,
            owner_id: db.owner_id,
        }
    }
}
