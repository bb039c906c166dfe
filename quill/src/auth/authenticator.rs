//! Username/password authentication.

use tracing::{debug, instrument};

use crate::auth::{
    error::AuthError,
    password::{dummy_hash, verify_string},
    store::{CredentialStore, Identity},
};

/// Check a username/password pair against the credential store.
///
/// Unknown usernames, inactive accounts and wrong passwords all fail with
/// [`AuthError::InvalidCredentials`]. An unknown username is still verified against a dummy hash so
/// it costs about the same as a wrong password. Read-only.
#[instrument(skip(store, password), err(level = "debug"))]
pub async fn authenticate<S>(store: &mut S, username: &str, password: &str) -> Result<Identity, AuthError>
where
    S: CredentialStore + ?Sized,
{
    let identity = store.find_identity_by_username(username).await?;

    let stored_hash = identity.as_ref().map(|i| i.password_hash.clone());
    let password = password.to_string();
    let verified = tokio::task::spawn_blocking(move || match stored_hash {
        Some(hash) => verify_string(&password, &hash),
        None => {
            verify_string(&password, dummy_hash());
            false
        }
    })
    .await
    .map_err(|e| AuthError::Internal {
        operation: format!("spawn password verification task: {e}"),
    })?;

    match identity {
        None => {
            debug!("Unknown username");
            Err(AuthError::InvalidCredentials)
        }
        Some(identity) if !identity.is_active => {
            debug!(author_id = identity.id, "Inactive account");
            Err(AuthError::InvalidCredentials)
        }
        Some(identity) if !verified => {
            debug!(author_id = identity.id, "Password mismatch");
            Err(AuthError::InvalidCredentials)
        }
        Some(identity) => Ok(identity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::InMemoryCredentials;

    fn store() -> InMemoryCredentials {
        let mut store = InMemoryCredentials::default();
        store.insert(1, "alice", "correct horse battery", true);
        store.insert(2, "mallory", "inactive password", false);
        store
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let mut store = store();

        let identity = authenticate(&mut store, "alice", "correct horse battery").await.unwrap();
        assert_eq!(identity.id, 1);
        assert_eq!(identity.username, "alice");
        assert_eq!(store.lookups, 1);
    }

    #[tokio::test]
    async fn test_failures_are_indistinguishable() {
        let mut store = store();

        let unknown = authenticate(&mut store, "nobody", "correct horse battery").await.unwrap_err();
        let wrong_password = authenticate(&mut store, "alice", "wrong password").await.unwrap_err();
        let inactive = authenticate(&mut store, "mallory", "inactive password").await.unwrap_err();

        for err in [&unknown, &wrong_password, &inactive] {
            assert!(matches!(err, AuthError::InvalidCredentials), "got {err:?}");
        }
        assert_eq!(unknown.to_string(), wrong_password.to_string());
        assert_eq!(wrong_password.to_string(), inactive.to_string());
    }

    #[tokio::test]
    async fn test_username_is_case_sensitive() {
        let mut store = store();

        let err = authenticate(&mut store, "Alice", "correct horse battery").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_store_failure_is_propagated() {
        let mut store = store();
        store.fail = true;

        let err = authenticate(&mut store, "alice", "correct horse battery").await.unwrap_err();
        assert!(matches!(err, AuthError::Store(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_works_through_trait_object() {
        let mut store = store();
        let dyn_store: &mut dyn CredentialStore = &mut store;

        let identity = authenticate(dyn_store, "alice", "correct horse battery").await.unwrap();
        assert_eq!(identity.id, 1);
    }
}
