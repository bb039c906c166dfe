//! HTTP handlers for author endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};

use crate::{
    AppState,
    api::models::{
        authors::{AuthorCreate, AuthorResponse},
        pagination::Pagination,
        posts::PostResponse,
    },
    auth::{
        password::{self, Argon2Params},
        permissions::require_owner,
        store::Identity,
    },
    db::{
        errors::DbError,
        handlers::{Authors, Posts, Repository, authors::AuthorFilter},
        models::authors::AuthorCreateDBRequest,
    },
    errors::{Error, Result},
    types::{AuthorId, Operation, Resource},
};

const AUTHOR_EXISTS_MESSAGE: &str = "Author already exists";

/// List authors with their posts
#[utoipa::path(
    get,
    path = "/authors/",
    tag = "authors",
    params(Pagination),
    responses(
        (status = 200, description = "A page of authors", body = [AuthorResponse]),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_authors(State(state): State<AppState>, Query(pagination): Query<Pagination>) -> Result<Json<Vec<AuthorResponse>>> {
    let (skip, limit) = pagination.params();
    let mut pool_conn = state.db.acquire().await.map_err(DbError::from)?;

    let authors = Authors::new(&mut pool_conn).list(&AuthorFilter::new(skip, limit)).await?;
    let ids: Vec<AuthorId> = authors.iter().map(|a| a.id).collect();
    let mut posts = Posts::new(&mut pool_conn).list_by_owners(&ids).await?;

    let response = authors
        .into_iter()
        .map(|author| {
            let author_posts = posts
                .remove(&author.id)
                .unwrap_or_default()
                .into_iter()
                .map(PostResponse::from)
                .collect();
            AuthorResponse::from((author, author_posts))
        })
        .collect();

    Ok(Json(response))
}

/// Register a new author
#[utoipa::path(
    post,
    path = "/authors/",
    tag = "authors",
    request_body = AuthorCreate,
    responses(
        (status = 201, description = "Author registered", body = AuthorResponse),
        (status = 400, description = "Author already exists, or the username or password is not acceptable"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_author(State(state): State<AppState>, Json(request): Json<AuthorCreate>) -> Result<(StatusCode, Json<AuthorResponse>)> {
    if !state.config.auth.allow_registration {
        return Err(Error::BadRequest {
            message: "Author registration is disabled".to_string(),
        });
    }

    if request.username.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "Username must not be empty".to_string(),
        });
    }

    let password_config = &state.config.auth.password;
    let password_length = request.password.chars().count();
    if password_length < password_config.min_length {
        return Err(Error::BadRequest {
            message: format!("Password must be at least {} characters", password_config.min_length),
        });
    }
    if password_length > password_config.max_length {
        return Err(Error::BadRequest {
            message: format!("Password must be no more than {} characters", password_config.max_length),
        });
    }

    let mut pool_conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut authors = Authors::new(&mut pool_conn);

    if authors.get_by_username(&request.username).await?.is_some() {
        return Err(Error::BadRequest {
            message: AUTHOR_EXISTS_MESSAGE.to_string(),
        });
    }

    // Hash on a blocking thread to avoid stalling the async runtime
    let params = Argon2Params::from(password_config);
    let plaintext = request.password;
    let password_hash = tokio::task::spawn_blocking(move || password::hash_string_with_params(&plaintext, Some(params)))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password hashing task: {e}"),
        })??;

    let created = authors
        .create(&AuthorCreateDBRequest {
            username: request.username,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            // A concurrent registration took the username after the check above
            DbError::UniqueViolation { .. } => Error::BadRequest {
                message: AUTHOR_EXISTS_MESSAGE.to_string(),
            },
            other => Error::Database(other),
        })?;

    tracing::info!(author_id = created.id, "Registered author");
    Ok((StatusCode::CREATED, Json(AuthorResponse::from((created, Vec::new())))))
}

/// Get an author with their posts
#[utoipa::path(
    get,
    path = "/author/{author_id}",
    tag = "authors",
    params(("author_id" = i64, Path, description = "Author ID")),
    responses(
        (status = 200, description = "The author", body = AuthorResponse),
        (status = 404, description = "Author not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_author(State(state): State<AppState>, Path(author_id): Path<AuthorId>) -> Result<Json<AuthorResponse>> {
    let mut pool_conn = state.db.acquire().await.map_err(DbError::from)?;

    let author = Authors::new(&mut pool_conn)
        .get_by_id(author_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Author".to_string(),
            id: author_id.to_string(),
        })?;
    let posts = Posts::new(&mut pool_conn)
        .list_by_owner(author_id)
        .await?
        .into_iter()
        .map(PostResponse::from)
        .collect();

    Ok(Json(AuthorResponse::from((author, posts))))
}

/// Delete your own account, along with all of your posts
#[utoipa::path(
    delete,
    path = "/author/{author_id}",
    tag = "authors",
    params(("author_id" = i64, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 403, description = "Not your account"),
        (status = 404, description = "Author not found"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_author(
    State(state): State<AppState>,
    Path(author_id): Path<AuthorId>,
    current_user: Identity,
) -> Result<StatusCode> {
    require_owner(&current_user, author_id, Operation::DeleteOwn, Resource::Authors)?;

    let mut pool_conn = state.db.acquire().await.map_err(DbError::from)?;
    if !Authors::new(&mut pool_conn).delete(author_id).await? {
        return Err(Error::NotFound {
            resource: "Author".to_string(),
            id: author_id.to_string(),
        });
    }

    tracing::info!(author_id, "Deleted author");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::{
        api::models::{authors::AuthorResponse, posts::PostResponse},
        test_utils::{bearer_header, create_test_app, create_test_author, create_test_post, issue_test_token},
    };
    use axum::http::StatusCode;
    use serde_json::json;
    use sqlx::SqlitePool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_register_author(pool: SqlitePool) {
        let server = create_test_app(pool.clone()).await;

        let response = server
            .post("/authors/")
            .json(&json!({"username": "alice", "password": "password123"}))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["username"], "alice");
        assert_eq!(body["is_active"], true);
        assert_eq!(body["posts"], json!([]));
        assert!(body.get("password").is_none());
        assert!(body.get("password_hash").is_none());

        // The stored hash is not the plaintext
        let stored: String = sqlx::query_scalar("SELECT password_hash FROM authors WHERE username = 'alice'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert!(stored.starts_with("$argon2id$"));
        assert!(!stored.contains("password123"));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_register_duplicate_author(pool: SqlitePool) {
        let server = create_test_app(pool.clone()).await;
        create_test_author(&pool, "alice", "password123").await;

        let response = server
            .post("/authors/")
            .json(&json!({"username": "alice", "password": "another-password"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["detail"], "Author already exists");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_register_password_policy(pool: SqlitePool) {
        let server = create_test_app(pool).await;

        let response = server.post("/authors/").json(&json!({"username": "alice", "password": "short"})).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["detail"], "Password must be at least 8 characters");

        let long = "x".repeat(65);
        let response = server.post("/authors/").json(&json!({"username": "alice", "password": long})).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = server.post("/authors/").json(&json!({"username": "  ", "password": "password123"})).await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_get_author_with_posts(pool: SqlitePool) {
        let server = create_test_app(pool.clone()).await;
        let author = create_test_author(&pool, "alice", "password123").await;
        let post = create_test_post(&pool, author.id, "First post").await;

        let response = server.get(&format!("/author/{}", author.id)).await;
        response.assert_status_ok();

        let body: AuthorResponse = response.json();
        assert_eq!(body.id, author.id);
        assert_eq!(body.posts, vec![PostResponse::from(post)]);

        let response = server.get(&format!("/author/{}", author.id + 1)).await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_authors_paginated(pool: SqlitePool) {
        let server = create_test_app(pool.clone()).await;
        for i in 0..12 {
            let author = create_test_author(&pool, &format!("author{i:02}"), "password123").await;
            if i % 2 == 0 {
                create_test_post(&pool, author.id, &format!("Post by {i}")).await;
            }
        }

        let response = server.get("/authors/").await;
        response.assert_status_ok();
        let page: Vec<AuthorResponse> = response.json();
        assert_eq!(page.len(), 10);
        assert_eq!(page[0].username, "author00");
        assert_eq!(page[0].posts.len(), 1);
        assert!(page[1].posts.is_empty());

        let response = server.get("/authors/").add_query_param("skip", 10).add_query_param("limit", 5).await;
        let page: Vec<AuthorResponse> = response.json();
        let names: Vec<_> = page.iter().map(|a| a.username.as_str()).collect();
        assert_eq!(names, vec!["author10", "author11"]);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_delete_own_account(pool: SqlitePool) {
        let server = create_test_app(pool.clone()).await;
        let alice = create_test_author(&pool, "alice", "password123").await;
        create_test_post(&pool, alice.id, "Soon gone").await;
        let token = issue_test_token(&server, "alice", "password123").await;
        let (name, value) = bearer_header(&token);

        let response = server.delete(&format!("/author/{}", alice.id)).add_header(&name, &value).await;
        response.assert_status(StatusCode::NO_CONTENT);

        server.get(&format!("/author/{}", alice.id)).await.assert_status(StatusCode::NOT_FOUND);
        let posts: Vec<PostResponse> = server.get("/posts/").await.json();
        assert!(posts.is_empty());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_cannot_delete_another_account(pool: SqlitePool) {
        let server = create_test_app(pool.clone()).await;
        create_test_author(&pool, "alice", "password123").await;
        let bob = create_test_author(&pool, "bob", "password123").await;
        let token = issue_test_token(&server, "alice", "password123").await;
        let (name, value) = bearer_header(&token);

        let response = server.delete(&format!("/author/{}", bob.id)).add_header(&name, &value).await;
        response.assert_status(StatusCode::FORBIDDEN);

        server.get(&format!("/author/{}", bob.id)).await.assert_status_ok();

        let response = server.delete(&format!("/author/{}", bob.id)).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}
