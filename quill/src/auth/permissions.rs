//! Ownership checks for mutations.
//!
//! There are no roles: an author may create and delete their own posts and delete their own
//! account, and nothing else. Reads are public and never pass through here.

use tracing::info;

use crate::{
    auth::{error::AuthError, store::Identity},
    types::{AuthorId, Operation, Resource},
};

/// Whether `actor` may mutate a resource owned by `resource_owner_id`.
pub fn can_mutate(actor: &Identity, resource_owner_id: AuthorId) -> bool {
    actor.id == resource_owner_id
}

/// Like [`can_mutate`], as a `Result` for use with `?` in handlers.
pub fn require_owner(actor: &Identity, resource_owner_id: AuthorId, action: Operation, resource: Resource) -> Result<(), AuthError> {
    if can_mutate(actor, resource_owner_id) {
        return Ok(());
    }

    info!(
        actor = actor.id,
        owner = resource_owner_id,
        "Rejected attempt to {action} {resource} owned by another author"
    );
    Err(AuthError::Forbidden {
        actor: actor.id,
        owner: resource_owner_id,
        action,
        resource,
    })
}
