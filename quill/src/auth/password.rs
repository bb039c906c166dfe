//! Password hashing and verification.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use once_cell::sync::Lazy;
use tracing::debug;

use crate::{config::PasswordConfig, errors::Error};

/// Argon2 hashing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Argon2Params {
    fn to_argon2(self) -> Result<Argon2<'static>, Error> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None).map_err(|e| Error::Internal {
            operation: format!("create argon2 params: {e}"),
        })?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl Default for Argon2Params {
    /// Argon2id RFC recommendations
    fn default() -> Self {
        Self {
            memory_kib: 19456, // 19 MB
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl From<&PasswordConfig> for Argon2Params {
    fn from(config: &PasswordConfig) -> Self {
        Self {
            memory_kib: config.argon2_memory_kib,
            iterations: config.argon2_iterations,
            parallelism: config.argon2_parallelism,
        }
    }
}

/// Hash a string using Argon2id with a fresh random salt.
///
/// Uses the provided parameters or the defaults if None.
pub fn hash_string_with_params(input: &str, params: Option<Argon2Params>) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = params.unwrap_or_default().to_argon2()?;

    let hash = argon2.hash_password(input.as_bytes(), &salt).map_err(|e| Error::Internal {
        operation: format!("hash string: {e}"),
    })?;

    Ok(hash.to_string())
}

pub fn hash_string(input: &str) -> Result<String, Error> {
    hash_string_with_params(input, None)
}

/// Verify a string against a PHC-format hash.
///
/// Verification uses the parameters embedded in the hash itself. A hash that cannot be parsed
/// verifies as `false`, the same as a wrong input.
pub fn verify_string(input: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!("Stored password hash could not be parsed: {e}");
            return false;
        }
    };

    Argon2::default().verify_password(input.as_bytes(), &parsed_hash).is_ok()
}

static DUMMY_HASH: Lazy<String> = Lazy::new(|| {
    hash_string("quill-dummy-password").unwrap_or_else(|e| {
        debug!("Failed to compute dummy hash: {e}");
        String::new()
    })
});

/// A valid hash of a throwaway value.
///
/// Verified against when a username is unknown so that path costs about as much as a wrong password.
pub fn dummy_hash() -> &'static str {
    DUMMY_HASH.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_params() -> Option<Argon2Params> {
        Some(Argon2Params {
            memory_kib: 128,
            iterations: 1,
            parallelism: 1,
        })
    }

    #[test]
    fn test_string_hashing() {
        let input = "test_password_123";
        let hash = hash_string(input).unwrap();

        assert!(!hash.is_empty());
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains(input));

        assert!(verify_string(input, &hash));
        assert!(!verify_string("wrong_password", &hash));
    }

    #[test]
    fn test_same_input_different_hashes() {
        let input = "same_password";

        let hash1 = hash_string_with_params(input, cheap_params()).unwrap();
        let hash2 = hash_string_with_params(input, cheap_params()).unwrap();

        // Salted: same input, different output
        assert_ne!(hash1, hash2);

        assert!(verify_string(input, &hash1));
        assert!(verify_string(input, &hash2));
    }

    #[test]
    fn test_verify_uses_params_embedded_in_hash() {
        let hash = hash_string_with_params("pw", cheap_params()).unwrap();
        assert!(hash.contains("m=128,t=1,p=1"));
        assert!(verify_string("pw", &hash));
    }

    #[test]
    fn test_malformed_hash_is_a_mismatch() {
        for hash in ["", "not-a-hash", "$argon2id$v=19$broken", "plaintext-password"] {
            assert!(!verify_string("plaintext-password", hash), "hash {hash:?} verified");
        }
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = Argon2Params {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        };
        assert!(hash_string_with_params("pw", Some(params)).is_err());
    }

    #[test]
    fn test_params_from_config() {
        let config = PasswordConfig::default();
        let params = Argon2Params::from(&config);
        assert_eq!(params.memory_kib, config.argon2_memory_kib);
        assert_eq!(params.iterations, config.argon2_iterations);
        assert_eq!(params.parallelism, config.argon2_parallelism);
    }

    #[test]
    fn test_dummy_hash_is_verifiable() {
        let hash = dummy_hash();
        assert!(PasswordHash::new(hash).is_ok());
        assert!(!verify_string("anything", hash));
    }
}
