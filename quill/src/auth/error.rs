//! Failure kinds of the authentication core.
//!
//! The kinds stay distinct internally so they can be logged, but they collapse into a small set
//! of client-facing errors when converted into [`crate::errors::Error`]: every credential failure
//! reads the same, and every token failure reads the same.

use thiserror::Error as ThisError;

use crate::{
    db::errors::DbError,
    errors::Error,
    types::{AuthorId, Operation, Resource},
};

/// Message returned for any failed username/password check.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Incorrect username or password";

/// Message returned for any bearer token that could not be resolved to an author.
pub const INVALID_SESSION_MESSAGE: &str = "Could not validate credentials";

#[derive(ThisError, Debug)]
pub enum AuthError {
    /// Unknown username, inactive account, or wrong password
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Bad signature, wrong algorithm, malformed structure or missing claims
    #[error("invalid token")]
    InvalidToken,

    /// Structurally valid and correctly signed, but past its expiry
    #[error("expired token")]
    ExpiredToken,

    /// Valid token whose subject no longer resolves to a stored author
    #[error("token subject '{subject}' does not resolve to an author")]
    UnknownSubject { subject: String },

    /// Authenticated author tried to mutate a resource owned by another author
    #[error("author {actor} cannot {action} {resource} owned by author {owner}")]
    Forbidden {
        actor: AuthorId,
        owner: AuthorId,
        action: Operation,
        resource: Resource,
    },

    /// The credential store failed; not an authentication decision
    #[error(transparent)]
    Store(#[from] DbError),

    #[error("Failed to {operation}")]
    Internal { operation: String },
}

impl AuthError {
    /// Whether this failure came from a bearer token (as opposed to a password check or policy)
    pub fn is_token_failure(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidToken | AuthError::ExpiredToken | AuthError::UnknownSubject { .. }
        )
    }
}

impl From<AuthError> for Error {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Error::Unauthenticated {
                message: Some(INVALID_CREDENTIALS_MESSAGE.to_string()),
            },
            AuthError::InvalidToken | AuthError::ExpiredToken | AuthError::UnknownSubject { .. } => Error::Unauthenticated {
                message: Some(INVALID_SESSION_MESSAGE.to_string()),
            },
            AuthError::Forbidden {
                owner, action, resource, ..
            } => Error::InsufficientPermissions {
                action,
                resource: format!("{resource} owned by author {owner}"),
            },
            AuthError::Store(db_err) => Error::Database(db_err),
            AuthError::Internal { operation } => Error::Internal { operation },
        }
    }
}
