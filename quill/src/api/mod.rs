//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers
//! - **[`models`]**: Request/response data structures
//!
//! # API Structure
//!
//! - **Authentication** (`/token`): exchange a username and password for a bearer token
//! - **Authors** (`/authors/`, `/author/{author_id}`): registration, profiles, account deletion
//! - **Posts** (`/posts/`, `/author/{author_id}/posts/`): reading, publishing and deleting posts
//! - **Articles** (`/article/{article_id}`): a post rendered as an HTML page
//!
//! All JSON endpoints are documented with `utoipa`; the document is served at
//! `/api-docs/openapi.json`.

pub mod handlers;
pub mod models;
