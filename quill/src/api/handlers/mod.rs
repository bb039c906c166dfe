//! HTTP request handlers for all API endpoints.
//!
//! - [`auth`]: token issuance (`POST /token`)
//! - [`authors`]: author registration, lookup and account deletion
//! - [`posts`]: post listing, lookup, publishing and deletion
//! - [`articles`]: the HTML article page
//!
//! Handlers that mutate data take an [`crate::auth::store::Identity`] extractor and check ownership
//! with [`crate::auth::permissions::require_owner`]. They return [`crate::errors::Error`], which
//! becomes a JSON `{"detail": ...}` body with the matching status code.

pub mod articles;
pub mod auth;
pub mod authors;
pub mod posts;
