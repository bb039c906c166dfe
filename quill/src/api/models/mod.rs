//! API request and response models.
//!
//! These are what clients send and receive. Database records live in [`crate::db::models`]
//! and are converted with `From` impls here, which is where storage-only fields are dropped.

pub mod auth;
pub mod authors;
pub mod pagination;
pub mod posts;
