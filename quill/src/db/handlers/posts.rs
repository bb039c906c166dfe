//! Database repository for posts.

use std::collections::HashMap;

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::instrument;

use crate::{
    db::{
        errors::Result,
        handlers::repository::Repository,
        models::posts::{PostCreateDBRequest, PostDBResponse},
    },
    types::{AuthorId, PostId},
};

/// Filter for listing posts
#[derive(Debug, Clone)]
pub struct PostFilter {
    pub skip: i64,
    pub limit: i64,
}

impl PostFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self { skip, limit }
    }
}

pub struct Posts<'c> {
    db: &'c mut SqliteConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Posts<'c> {
    type CreateRequest = PostCreateDBRequest;
    type Response = PostDBResponse;
    type Id = PostId;
    type Filter = PostFilter;

    #[instrument(skip(self, request), fields(owner_id = request.owner_id), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let post = sqlx::query_as::<_, PostDBResponse>(
            r#"
            INSERT INTO posts (title, description, owner_id)
            VALUES (?, ?, ?)
            RETURNING id, title, description, owner_id
            "#,
        )
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.owner_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(post)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let post = sqlx::query_as::<_, PostDBResponse>("SELECT id, title, description, owner_id FROM posts WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(post)
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let posts = sqlx::query_as::<_, PostDBResponse>(
            "SELECT id, title, description, owner_id FROM posts ORDER BY id LIMIT ? OFFSET ?",
        )
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(posts)
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl<'c> Posts<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }

    /// Posts owned by one author, oldest first
    #[instrument(skip(self), err)]
    pub async fn list_by_owner(&mut self, owner_id: AuthorId) -> Result<Vec<PostDBResponse>> {
        let posts = sqlx::query_as::<_, PostDBResponse>(
            "SELECT id, title, description, owner_id FROM posts WHERE owner_id = ? ORDER BY id",
        )
        .bind(owner_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(posts)
    }

    /// Posts for several authors at once, keyed by owner. Owners without posts are absent.
    #[instrument(skip(self, owner_ids), fields(count = owner_ids.len()), err)]
    pub async fn list_by_owners(&mut self, owner_ids: &[AuthorId]) -> Result<HashMap<AuthorId, Vec<PostDBResponse>>> {
        if owner_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new("SELECT id, title, description, owner_id FROM posts WHERE owner_id IN (");
        let mut separated = query.separated(", ");
        for owner_id in owner_ids {
            separated.push_bind(*owner_id);
        }
        separated.push_unseparated(") ORDER BY id");

        let posts = query.build_query_as::<PostDBResponse>().fetch_all(&mut *self.db).await?;

        let mut result: HashMap<AuthorId, Vec<PostDBResponse>> = HashMap::new();
        for post in posts {
            result.entry(post.owner_id).or_default().push(post);
        }

        Ok(result)
    }
}
