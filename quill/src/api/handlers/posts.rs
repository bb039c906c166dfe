//! HTTP handlers for post endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};

use crate::{
    AppState,
    api::models::{
        pagination::Pagination,
        posts::{PostCreate, PostResponse},
    },
    auth::{permissions::require_owner, store::Identity},
    db::{
        errors::DbError,
        handlers::{Posts, Repository, posts::PostFilter},
        models::posts::PostCreateDBRequest,
    },
    errors::{Error, Result},
    types::{AuthorId, Operation, PostId, Resource},
};

fn post_not_found(post_id: PostId) -> Error {
    Error::NotFound {
        resource: "Post".to_string(),
        id: post_id.to_string(),
    }
}

/// List posts
#[utoipa::path(
    get,
    path = "/posts/",
    tag = "posts",
    params(Pagination),
    responses(
        (status = 200, description = "A page of posts", body = [PostResponse]),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_posts(State(state): State<AppState>, Query(pagination): Query<Pagination>) -> Result<Json<Vec<PostResponse>>> {
    let (skip, limit) = pagination.params();
    let mut pool_conn = state.db.acquire().await.map_err(DbError::from)?;

    let posts = Posts::new(&mut pool_conn).list(&PostFilter::new(skip, limit)).await?;

    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// Get a single post
#[utoipa::path(
    get,
    path = "/posts/{post_id}",
    tag = "posts",
    params(("post_id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "The post", body = PostResponse),
        (status = 404, description = "Post not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_post(State(state): State<AppState>, Path(post_id): Path<PostId>) -> Result<Json<PostResponse>> {
    let mut pool_conn = state.db.acquire().await.map_err(DbError::from)?;

    let post = Posts::new(&mut pool_conn)
        .get_by_id(post_id)
        .await?
        .ok_or_else(|| post_not_found(post_id))?;

    Ok(Json(PostResponse::from(post)))
}

/// Publish a post as the given author
#[utoipa::path(
    post,
    path = "/author/{author_id}/posts/",
    tag = "posts",
    params(("author_id" = i64, Path, description = "Author ID; must be the caller's own")),
    request_body = PostCreate,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Empty title"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 403, description = "Posting as another author"),
        (status = 409, description = "A post with this title already exists"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_post_for_author(
    State(state): State<AppState>,
    Path(author_id): Path<AuthorId>,
    current_user: Identity,
    Json(request): Json<PostCreate>,
) -> Result<(StatusCode, Json<PostResponse>)> {
    require_owner(&current_user, author_id, Operation::CreateOwn, Resource::Posts)?;

    if request.title.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "Title must not be empty".to_string(),
        });
    }

    let mut pool_conn = state.db.acquire().await.map_err(DbError::from)?;
    let post = Posts::new(&mut pool_conn)
        .create(&PostCreateDBRequest {
            title: request.title,
            description: request.description,
            owner_id: author_id,
        })
        .await
        .map_err(|e| match e {
            DbError::UniqueViolation { .. } => Error::Conflict {
                message: "A post with this title already exists".to_string(),
            },
            other => Error::Database(other),
        })?;

    tracing::info!(post_id = post.id, author_id, "Created post");
    Ok((StatusCode::CREATED, Json(PostResponse::from(post))))
}

/// Delete one of your own posts
#[utoipa::path(
    delete,
    path = "/posts/{post_id}",
    tag = "posts",
    params(("post_id" = i64, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 403, description = "Not your post"),
        (status = 404, description = "Post not found"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_post(State(state): State<AppState>, Path(post_id): Path<PostId>, current_user: Identity) -> Result<StatusCode> {
    let mut pool_conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut posts = Posts::new(&mut pool_conn);

    let post = posts.get_by_id(post_id).await?.ok_or_else(|| post_not_found(post_id))?;
    require_owner(&current_user, post.owner_id, Operation::DeleteOwn, Resource::Posts)?;

    if !posts.delete(post_id).await? {
        return Err(post_not_found(post_id));
    }

    tracing::info!(post_id, "Deleted post");
    Ok(StatusCode::NO_CONTENT)
}
