//! # quill: a small blogging API
//!
//! `quill` manages two resources, authors and posts, behind a JSON API, and renders posts as HTML
//! article pages. Reads are public. Writes need a bearer token obtained from `POST /token`, and
//! an author can only create or delete their own posts and delete their own account.
//!
//! ## Architecture
//!
//! The HTTP layer is [Axum](https://github.com/tokio-rs/axum); persistence is SQLite through SQLx.
//!
//! - The **API layer** ([`api`]) holds the route handlers and the request/response models.
//! - The **authentication layer** ([`auth`]) verifies passwords, issues and verifies signed
//!   tokens, resolves a token to the author it names, and enforces ownership.
//! - The **database layer** ([`db`]) uses the repository pattern over a borrowed connection.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use quill::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = quill::config::Args::parse();
//!     let config = Config::load(&args)?;
//!     quill::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod middleware;
mod openapi;
pub mod telemetry;
pub mod templates;
pub mod types;

#[cfg(test)]
pub mod test_utils;

use std::{str::FromStr, sync::Arc, time::Duration};

use axum::{
    Json, Router,
    http::{self, HeaderValue},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use bon::Builder;
pub use config::Config;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    auth::token::TokenCodec,
    config::{CorsOrigin, DatabaseConfig},
    openapi::ApiDoc,
    templates::Templates,
};

/// Application state shared across all request handlers.
///
/// Everything here is read-only after startup; cloning is cheap.
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Config,
    pub tokens: Arc<TokenCodec>,
    pub templates: Arc<Templates>,
}

/// Get the quill database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Open the connection pool described by `config`, creating the database file if needed.
async fn setup_database(config: &DatabaseConfig) -> anyhow::Result<SqlitePool> {
    let connect_options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.pool.max_connections)
        .min_connections(config.pool.min_connections)
        .acquire_timeout(Duration::from_secs(config.pool.acquire_timeout_secs))
        .idle_timeout(Some(Duration::from_secs(config.pool.idle_timeout_secs)))
        .max_lifetime(Some(Duration::from_secs(config.pool.max_lifetime_secs)))
        .connect_with(connect_options)
        .await?;

    migrator().run(&pool).await?;
    Ok(pool)
}

fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let allowed_origins = &config.auth.security.cors.allowed_origins;

    // `*` cannot be part of an explicit origin list
    let allow_origin = if allowed_origins.iter().any(|origin| matches!(origin, CorsOrigin::Wildcard)) {
        AllowOrigin::any()
    } else {
        let mut origins = Vec::new();
        for origin in allowed_origins {
            if let CorsOrigin::Url(url) = origin {
                // Browsers send the origin without a trailing slash
                origins.push(url.as_str().trim_end_matches('/').parse::<HeaderValue>()?);
            }
        }
        AllowOrigin::list(origins)
    };

    let mut cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([http::Method::GET, http::Method::POST, http::Method::DELETE])
        .allow_headers([http::header::AUTHORIZATION, http::header::CONTENT_TYPE])
        .allow_credentials(config.auth.security.cors.allow_credentials);

    if let Some(max_age) = config.auth.security.cors.max_age {
        cors = cors.max_age(Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the application router with all endpoints and middleware.
#[instrument(skip_all)]
pub fn build_router(state: &AppState) -> anyhow::Result<Router> {
    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        // Authentication
        .route("/token", post(api::handlers::auth::issue_token))
        // Authors
        .route(
            "/authors/",
            get(api::handlers::authors::list_authors).post(api::handlers::authors::create_author),
        )
        .route(
            "/author/{author_id}",
            get(api::handlers::authors::get_author).delete(api::handlers::authors::delete_author),
        )
        // Posts
        .route("/author/{author_id}/posts/", post(api::handlers::posts::create_post_for_author))
        .route("/posts/", get(api::handlers::posts::list_posts))
        .route(
            "/posts/{post_id}",
            get(api::handlers::posts::get_post).delete(api::handlers::posts::delete_post),
        )
        // HTML
        .route("/article/{article_id}", get(api::handlers::articles::get_article))
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .layer(from_fn(middleware::process_time_middleware))
        .layer(from_fn_with_state(state.clone(), middleware::trusted_host_middleware))
        .with_state(state.clone());

    let router = router.layer(create_cors_layer(&state.config)?);

    let router = router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

pub struct Application {
    router: Router,
    config: Config,
    pool: SqlitePool,
}

impl Application {
    /// Create a new application instance, connecting to and migrating the configured database
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let pool = setup_database(&config.database).await?;
        Self::new_with_pool(config, pool)
    }

    /// Create an application around an existing, already migrated pool
    pub fn new_with_pool(config: Config, pool: SqlitePool) -> anyhow::Result<Self> {
        let tokens = TokenCodec::from_config(&config)?;
        let templates = Templates::new()?;

        let app_state = AppState::builder()
            .db(pool.clone())
            .config(config.clone())
            .tokens(Arc::new(tokens))
            .templates(Arc::new(templates))
            .build();

        let router = build_router(&app_state)?;

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("quill listening on http://{}", bind_addr);

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}
