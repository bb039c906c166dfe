//! Database record models.
//!
//! These are kept separate from the API models in [`crate::api::models`] so that storage-only
//! fields (the password hash) never reach a response body by accident.

pub mod authors;
pub mod posts;
