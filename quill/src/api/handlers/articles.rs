//! Server-rendered HTML view of a post.

use axum::{
    extract::{Path, State},
    response::Html,
};

use crate::{
    AppState,
    api::models::posts::PostResponse,
    db::{
        errors::DbError,
        handlers::{Posts, Repository},
    },
    errors::{Error, Result},
    types::PostId,
};

/// A post rendered as an HTML page
#[utoipa::path(
    get,
    path = "/article/{article_id}",
    tag = "articles",
    params(("article_id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "The article page", content_type = "text/html", body = String),
        (status = 404, description = "No article was found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_article(State(state): State<AppState>, Path(article_id): Path<PostId>) -> Result<Html<String>> {
    let mut pool_conn = state.db.acquire().await.map_err(DbError::from)?;

    let article = Posts::new(&mut pool_conn)
        .get_by_id(article_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Article".to_string(),
            id: article_id.to_string(),
        })?;

    let page = state.templates.render_article(article_id, &PostResponse::from(article))?;
    Ok(Html(page))
}
