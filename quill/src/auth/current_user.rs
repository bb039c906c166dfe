use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::{debug, info, instrument, trace};

use crate::{
    AppState,
    auth::{error::INVALID_SESSION_MESSAGE, session, store::Identity},
    db::{errors::DbError, handlers::Authors},
    errors::{Error, Result},
};

/// Pull the token out of an `Authorization: Bearer <token>` header.
///
/// Returns `None` when the header is absent, not valid UTF-8, or uses another scheme.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for Identity {
    type Rejection = Error;

    #[instrument(skip_all)]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let Some(token) = bearer_token(parts) else {
            trace!("No bearer token in request");
            return Err(Error::Unauthenticated {
                message: Some(INVALID_SESSION_MESSAGE.to_string()),
            });
        };

        // The connection is only held for the lookup
        let mut conn = state.db.acquire().await.map_err(DbError::from)?;
        let mut authors = Authors::new(&mut conn);

        match session::resolve(&state.tokens, &mut authors, token).await {
            Ok(identity) => {
                debug!(author_id = identity.id, "Authenticated bearer token");
                Ok(identity)
            }
            Err(e) => {
                if e.is_token_failure() {
                    info!("Bearer token rejected: {e}");
                }
                Err(e.into())
            }
        }
    }
}
