//! Database layer for data persistence and access.
//!
//! Data access uses SQLx with SQLite, following the Repository pattern:
//!
//! ```text
//! Handlers (api) -> Repositories (db::handlers) -> Models (db::models) -> SQLite
//! ```
//!
//! - [`handlers`]: Repository implementations for CRUD operations
//! - [`models`]: Request and response structures for the repositories
//! - [`errors`]: Database-specific error types
//!
//! Repositories borrow a single connection, acquired per request from the pool:
//!
//! ```ignore
//! let mut conn = pool.acquire().await?;
//! let mut authors = Authors::new(&mut conn);
//! let author = authors.get_by_username("alice").await?;
//! ```
//!
//! Migrations live in `migrations/` and are applied by [`crate::migrator`] at startup.

pub mod errors;
pub mod handlers;
pub mod models;
