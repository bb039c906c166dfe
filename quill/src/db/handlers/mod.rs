//! Repository implementations for database access.
//!
//! Each repository wraps a borrowed SQLite connection and implements the [`Repository`] trait:
//!
//! - [`Authors`]: author accounts, also the credential store for authentication
//! - [`Posts`]: blog posts, owned by an author

pub mod authors;
pub mod posts;
pub mod repository;

pub use authors::Authors;
pub use posts::Posts;
pub use repository::Repository;
