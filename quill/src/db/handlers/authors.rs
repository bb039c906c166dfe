//! Database repository for authors.

use sqlx::SqliteConnection;
use tracing::instrument;

use crate::{
    auth::store::{CredentialStore, Identity},
    db::{
        errors::Result,
        handlers::repository::Repository,
        models::authors::{AuthorCreateDBRequest, AuthorDBResponse},
    },
    types::AuthorId,
};

/// Filter for listing authors
#[derive(Debug, Clone)]
pub struct AuthorFilter {
    pub skip: i64,
    pub limit: i64,
}

impl AuthorFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self { skip, limit }
    }
}

pub struct Authors<'c> {
    db: &'c mut SqliteConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Authors<'c> {
    type CreateRequest = AuthorCreateDBRequest;
    type Response = AuthorDBResponse;
    type Id = AuthorId;
    type Filter = AuthorFilter;

    #[instrument(skip(self, request), fields(username = %request.username), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let author = sqlx::query_as::<_, AuthorDBResponse>(
            r#"
            INSERT INTO authors (username, password_hash)
            VALUES (?, ?)
            RETURNING id, username, password_hash, is_active
            "#,
        )
        .bind(&request.username)
        .bind(&request.password_hash)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(author)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let author = sqlx::query_as::<_, AuthorDBResponse>("SELECT id, username, password_hash, is_active FROM authors WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(author)
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let authors = sqlx::query_as::<_, AuthorDBResponse>(
            "SELECT id, username, password_hash, is_active FROM authors ORDER BY id LIMIT ? OFFSET ?",
        )
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(authors)
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        // Posts go with their owner (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM authors WHERE id = ?")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl<'c> Authors<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn get_by_username(&mut self, username: &str) -> Result<Option<AuthorDBResponse>> {
        let author = sqlx::query_as::<_, AuthorDBResponse>(
            "SELECT id, username, password_hash, is_active FROM authors WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(author)
    }
}

#[async_trait::async_trait]
impl<'c> CredentialStore for Authors<'c> {
    async fn find_identity_by_username(&mut self, username: &str) -> Result<Option<Identity>> {
        Ok(self.get_by_username(username).await?.map(Identity::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{errors::DbError, handlers::Posts, models::posts::PostCreateDBRequest};
    use sqlx::SqlitePool;

    fn create_request(username: &str) -> AuthorCreateDBRequest {
        AuthorCreateDBRequest {
            username: username.to_string(),
            password_hash: format!("$argon2id$fake-hash-for-{username}"),
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_author(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Authors::new(&mut conn);

        let author = repo.create(&create_request("alice")).await.unwrap();
        assert_eq!(author.username, "alice");
        assert_eq!(author.password_hash, "$argon2id$fake-hash-for-alice");
        assert!(author.is_active);

        let fetched = repo.get_by_id(author.id).await.unwrap().unwrap();
        assert_eq!(fetched.username, "alice");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_duplicate_username_is_unique_violation(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Authors::new(&mut conn);

        repo.create(&create_request("alice")).await.unwrap();
        let err = repo.create(&create_request("alice")).await.unwrap_err();

        match err {
            DbError::UniqueViolation { message, .. } => assert!(message.contains("authors.username")),
            other => panic!("expected UniqueViolation, got {other:?}"),
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_get_by_username(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Authors::new(&mut conn);

        let created = repo.create(&create_request("bob")).await.unwrap();

        let found = repo.get_by_username("bob").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);

        assert!(repo.get_by_username("Bob").await.unwrap().is_none());
        assert!(repo.get_by_username("nobody").await.unwrap().is_none());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_authors_paginated(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Authors::new(&mut conn);

        for name in ["a1", "a2", "a3", "a4", "a5"] {
            repo.create(&create_request(name)).await.unwrap();
        }

        let page = repo.list(&AuthorFilter::new(1, 2)).await.unwrap();
        let names: Vec<_> = page.iter().map(|a| a.username.as_str()).collect();
        assert_eq!(names, vec!["a2", "a3"]);

        let all = repo.list(&AuthorFilter::new(0, 100)).await.unwrap();
        assert_eq!(all.len(), 5);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_delete_author_removes_their_posts(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();

        let author = Authors::new(&mut conn).create(&create_request("carol")).await.unwrap();
        let post = Posts::new(&mut conn)
            .create(&PostCreateDBRequest {
                title: "Carol's first post".to_string(),
                description: None,
                owner_id: author.id,
            })
            .await
            .unwrap();

        assert!(Authors::new(&mut conn).delete(author.id).await.unwrap());
        assert!(!Authors::new(&mut conn).delete(author.id).await.unwrap());
        assert!(Posts::new(&mut conn).get_by_id(post.id).await.unwrap().is_none());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_find_identity_by_username(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Authors::new(&mut conn);

        let created = repo.create(&create_request("dave")).await.unwrap();

        let identity = repo.find_identity_by_username("dave").await.unwrap().unwrap();
        assert_eq!(identity.id, created.id);
        assert_eq!(identity.username, "dave");
        assert!(identity.is_active);

        assert!(repo.find_identity_by_username("erin").await.unwrap().is_none());
    }
}
