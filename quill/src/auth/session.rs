//! Resolve a bearer token to the author it was issued for.

use tracing::instrument;

use crate::auth::{
    error::AuthError,
    store::{CredentialStore, Identity},
    token::TokenCodec,
};

/// Verify `token` and look its subject up in `store`.
///
/// Decoding errors keep their kind ([`AuthError::ExpiredToken`] or [`AuthError::InvalidToken`]).
/// A subject that no longer exists is [`AuthError::UnknownSubject`]. Exactly one store lookup is
/// made for a token that decodes. The active flag is not checked: tokens already issued stay
/// usable until they expire.
#[instrument(skip_all, err(level = "debug"))]
pub async fn resolve<S>(codec: &TokenCodec, store: &mut S, token: &str) -> Result<Identity, AuthError>
where
    S: CredentialStore + ?Sized,
{
    let claims = codec.decode(token)?;

    if claims.sub.is_empty() {
        return Err(AuthError::InvalidToken);
    }

    store
        .find_identity_by_username(&claims.sub)
        .await?
        .ok_or(AuthError::UnknownSubject { subject: claims.sub })
}
