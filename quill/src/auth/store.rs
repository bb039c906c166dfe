//! The credential lookup the authentication core depends on.

use std::fmt;

use crate::{
    db::{errors::Result, models::authors::AuthorDBResponse},
    types::AuthorId,
};

/// An author as seen by the authentication core.
///
/// Also the request extractor for authenticated routes, see [`crate::auth::current_user`].
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: AuthorId,
    pub username: String,
    pub password_hash: String,
    pub is_active: bool,
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("is_active", &self.is_active)
            .finish()
    }
}

impl From<AuthorDBResponse> for Identity {
    fn from(author: AuthorDBResponse) -> Self {
        Self {
            id: author.id,
            username: author.username,
            password_hash: author.password_hash,
            is_active: author.is_active,
        }
    }
}

/// Read-only lookup of identities by their unique username.
#[async_trait::async_trait]
pub trait CredentialStore: Send {
    async fn find_identity_by_username(&mut self, username: &str) -> Result<Option<Identity>>;
}
