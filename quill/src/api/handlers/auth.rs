//! HTTP handler for issuing bearer tokens.

use axum::{
    extract::{Form, State},
    response::Json,
};

use crate::{
    AppState,
    api::models::auth::{LoginForm, TokenResponse},
    auth::authenticator,
    db::{errors::DbError, handlers::Authors},
    errors::{Error, Result},
};

/// Exchange a username and password for a bearer token
#[utoipa::path(
    post,
    path = "/token",
    tag = "authentication",
    summary = "Log in",
    description = "OAuth2 password grant. The returned token goes in `Authorization: Bearer <token>`.",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Unsupported grant type"),
        (status = 401, description = "Incorrect username or password"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn issue_token(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Result<Json<TokenResponse>> {
    if let Some(grant_type) = form.grant_type.as_deref()
        && grant_type != "password"
    {
        return Err(Error::BadRequest {
            message: format!("Unsupported grant_type '{grant_type}'"),
        });
    }

    let mut pool_conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut authors = Authors::new(&mut pool_conn);

    let identity = authenticator::authenticate(&mut authors, &form.username, &form.password).await?;
    let access_token = state.tokens.encode(&identity.username, None)?;

    tracing::info!(author_id = identity.id, "Issued bearer token");
    Ok(Json(TokenResponse::bearer(access_token)))
}

#[cfg(test)]
mod tests {
    use crate::{
        api::models::auth::TokenResponse,
        auth::error::INVALID_CREDENTIALS_MESSAGE,
        test_utils::{create_test_app, create_test_author},
    };
    use axum::http::{StatusCode, header};
    use sqlx::SqlitePool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_issue_token_success(pool: SqlitePool) {
        let server = create_test_app(pool.clone()).await;
        create_test_author(&pool, "alice", "password123").await;

        let response = server
            .post("/token")
            .form(&[("username", "alice"), ("password", "password123")])
            .await;

        response.assert_status_ok();
        let body: TokenResponse = response.json();
        assert_eq!(body.token_type, "Bearer");
        assert_eq!(body.access_token.split('.').count(), 3);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_issue_token_accepts_password_grant_type(pool: SqlitePool) {
        let server = create_test_app(pool.clone()).await;
        create_test_author(&pool, "alice", "password123").await;

        let response = server
            .post("/token")
            .form(&[("grant_type", "password"), ("username", "alice"), ("password", "password123")])
            .await;
        response.assert_status_ok();

        let response = server
            .post("/token")
            .form(&[("grant_type", "client_credentials"), ("username", "alice"), ("password", "password123")])
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_login_failures_look_the_same(pool: SqlitePool) {
        let server = create_test_app(pool.clone()).await;
        create_test_author(&pool, "alice", "password123").await;

        let wrong_password = server
            .post("/token")
            .form(&[("username", "alice"), ("password", "not-the-password")])
            .await;
        let unknown_user = server
            .post("/token")
            .form(&[("username", "nobody"), ("password", "password123")])
            .await;

        for response in [&wrong_password, &unknown_user] {
            response.assert_status(StatusCode::UNAUTHORIZED);
            assert_eq!(response.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
            let body: serde_json::Value = response.json();
            assert_eq!(body["detail"], INVALID_CREDENTIALS_MESSAGE);
        }
        assert_eq!(wrong_password.text(), unknown_user.text());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_inactive_author_cannot_log_in(pool: SqlitePool) {
        let server = create_test_app(pool.clone()).await;
        let author = create_test_author(&pool, "alice", "password123").await;

        sqlx::query("UPDATE authors SET is_active = 0 WHERE id = ?")
            .bind(author.id)
            .execute(&pool)
            .await
            .unwrap();

        let response = server
            .post("/token")
            .form(&[("username", "alice"), ("password", "password123")])
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["detail"], INVALID_CREDENTIALS_MESSAGE);
    }
}
