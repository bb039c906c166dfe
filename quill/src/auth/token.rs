//! Bearer token creation and verification (signed JWTs).
//!
//! Tokens are integrity-protected, not encrypted: anyone holding one can read its claims, only
//! the holder of the secret key can mint one. Nothing secret beyond the subject is ever placed in
//! the claims.

use std::{fmt, str::FromStr};

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{auth::error::AuthError, config::Config, errors::Error};

/// Claims carried by every issued token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (author username)
    pub exp: i64,    // Expiration time
    pub iat: i64,    // Issued at
}

/// Parse a configured algorithm name, accepting only the HMAC family.
///
/// The signing key is a shared secret, so asymmetric algorithms cannot be used with it.
pub fn parse_algorithm(name: &str) -> Result<Algorithm, Error> {
    match Algorithm::from_str(name) {
        Ok(algorithm @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => Ok(algorithm),
        Ok(other) => Err(Error::Internal {
            operation: format!("Config validation: JWT algorithm {other:?} is not supported, use HS256, HS384 or HS512"),
        }),
        Err(_) => Err(Error::Internal {
            operation: format!("Config validation: unknown JWT algorithm '{name}'"),
        }),
    }
}

/// Encodes claims into signed tokens and verifies them again.
///
/// Built once at startup from [`Config`] and shared read-only for the life of the process.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validation: Validation,
    default_ttl: TimeDelta,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.algorithm)
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(secret: &str, algorithm: Algorithm, default_ttl: TimeDelta) -> Self {
        // Only the configured algorithm is accepted, whatever the token header claims
        let mut validation = Validation::new(algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            validation,
            default_ttl,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let secret_key = config.secret_key.as_deref().ok_or_else(|| Error::Internal {
            operation: "build token codec: secret_key is required".to_string(),
        })?;
        let algorithm = parse_algorithm(&config.auth.security.jwt_algorithm)?;
        let default_ttl = TimeDelta::from_std(config.auth.security.jwt_expiry).map_err(|e| Error::Internal {
            operation: format!("build token codec: jwt_expiry out of range: {e}"),
        })?;

        Ok(Self::new(secret_key, algorithm, default_ttl))
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn default_ttl(&self) -> TimeDelta {
        self.default_ttl
    }

    /// Issue a token for `subject`, valid for `ttl` (or the configured default) from now.
    pub fn encode(&self, subject: &str, ttl: Option<TimeDelta>) -> Result<String, Error> {
        let now = Utc::now();
        let exp = now + ttl.unwrap_or(self.default_ttl);

        let claims = Claims {
            sub: subject.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key).map_err(|e| Error::Internal {
            operation: format!("create JWT: {e}"),
        })
    }

    /// Verify a token and return its claims.
    ///
    /// Expiry is reported as [`AuthError::ExpiredToken`]; every other failure, including a
    /// different algorithm in the header, is [`AuthError::InvalidToken`].
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => {
                    debug!("Rejected bearer token: {e}");
                    AuthError::InvalidToken
                }
            })
    }
}
