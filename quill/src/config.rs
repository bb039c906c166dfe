//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable overrides. The configuration
//! file path defaults to `config.yaml` but can be specified via `-f` flag or `QUILL_CONFIG`
//! environment variable.
//!
//! ## Loading Priority
//!
//! Configuration sources are merged in the following order (later sources override earlier ones):
//!
//! 1. **YAML config file** - Base configuration (default: `config.yaml`)
//! 2. **Environment variables** - Variables prefixed with `QUILL_` override YAML values
//! 3. **DATABASE_URL** - Special case: overrides `database.url` if set
//!
//! For nested config values, use double underscores in environment variables. For example,
//! `QUILL_AUTH__SECURITY__JWT_EXPIRY=1h` sets the `auth.security.jwt_expiry` field.
//!
//! ## Environment Variable Examples
//!
//! ```bash
//! # The signing key for bearer tokens (required)
//! QUILL_SECRET_KEY="a-long-random-string"
//!
//! # Override server port
//! QUILL_PORT=8080
//!
//! # Point at another database file
//! DATABASE_URL="sqlite:///var/lib/quill/quill.db?mode=rwc"
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};
use url::Url;

use crate::auth::token;
use crate::errors::Error;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "QUILL_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// This is the root configuration structure loaded from YAML and environment variables.
/// All fields have defaults defined in the `Default` implementation, except `secret_key`
/// which must always be supplied.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Secret key for signing bearer tokens (required)
    pub secret_key: Option<String>,
    /// Database connection settings
    pub database: DatabaseConfig,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Host header values accepted by the server. Empty, or containing `*`, accepts any host.
    pub allowed_hosts: Vec<String>,
    /// Authentication configuration
    pub auth: AuthConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// SQLite connection URL (e.g. `sqlite://quill.db?mode=rwc`)
    pub url: String,
    /// Connection pool settings
    pub pool: PoolSettings,
}

/// Pool configuration with the SQLx parameters we expose.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolSettings {
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of idle connections to maintain
    pub min_connections: u32,
    /// Maximum time to wait for a connection (seconds)
    pub acquire_timeout_secs: u64,
    /// Time before idle connections are closed (seconds, 0 = never)
    pub idle_timeout_secs: u64,
    /// Maximum lifetime of a connection (seconds, 0 = never)
    pub max_lifetime_secs: u64,
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    /// Allow new authors to self-register via `POST /authors/`
    pub allow_registration: bool,
    /// Password validation and hashing rules
    pub password: PasswordConfig,
    /// Token and CORS settings
    pub security: SecurityConfig,
}

/// Password validation rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PasswordConfig {
    /// Minimum password length
    pub min_length: usize,
    /// Maximum password length
    pub max_length: usize,
    /// Argon2 memory cost in KiB (default: 19456 KiB = 19 MB)
    pub argon2_memory_kib: u32,
    /// Argon2 iterations (default: 2)
    pub argon2_iterations: u32,
    /// Argon2 parallelism (default: 1)
    pub argon2_parallelism: u32,
}

/// Security configuration for bearer tokens and CORS.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SecurityConfig {
    /// JWT signing algorithm. Only the HMAC family is supported: HS256, HS384, HS512.
    pub jwt_algorithm: String,
    /// Default lifetime of an issued token
    #[serde(with = "humantime_serde")]
    pub jwt_expiry: Duration,
    /// CORS configuration for browser clients
    pub cors: CorsConfig,
}

/// CORS (Cross-Origin Resource Sharing) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins for CORS requests
    pub allowed_origins: Vec<CorsOrigin>,
    /// Allow credentials in CORS requests
    pub allow_credentials: bool,
    /// Cache preflight requests for this many seconds
    pub max_age: Option<u64>,
}

/// CORS origin specification.
///
/// Can be either a wildcard (`*`) to allow all origins, or a specific URL.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CorsOrigin {
    /// Allow all origins (`*`)
    #[serde(deserialize_with = "parse_wildcard")]
    Wildcard,
    /// Specific origin URL (e.g., `https://blog.example.com`)
    #[serde(deserialize_with = "parse_url")]
    Url(Url),
}

fn parse_wildcard<'de, D>(deserializer: D) -> Result<(), D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    if s == "*" {
        Ok(())
    } else {
        Err(serde::de::Error::custom("Expected '*'"))
    }
}

fn parse_url<'de, D>(deserializer: D) -> Result<Url, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    Url::parse(&s).map_err(serde::de::Error::custom)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7000,
            secret_key: None,
            database: DatabaseConfig::default(),
            static_dir: PathBuf::from("static"),
            allowed_hosts: vec!["127.0.0.1".to_string(), "localhost".to_string()],
            auth: AuthConfig::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://quill.db?mode=rwc".to_string(),
            pool: PoolSettings::default(),
        }
    }
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 0,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,  // 10 minutes
            max_lifetime_secs: 1800, // 30 minutes
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            allow_registration: true,
            password: PasswordConfig::default(),
            security: SecurityConfig::default(),
        }
    }
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 64,
            // Argon2id RFC recommendations
            argon2_memory_kib: 19456, // 19 MB
            argon2_iterations: 2,
            argon2_parallelism: 1,
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_algorithm: "HS256".to_string(),
            jwt_expiry: Duration::from_secs(30 * 60), // 30 minutes
            cors: CorsConfig::default(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        let origins = ["http://localhost", "http://localhost:8080", "http://localhost:7000"];
        Self {
            allowed_origins: origins
                .iter()
                .filter_map(|origin| Url::parse(origin).ok())
                .map(CorsOrigin::Url)
                .collect(),
            allow_credentials: true,
            max_age: Some(3600), // Cache preflight for 1 hour
        }
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required fields
    pub fn validate(&self) -> Result<(), Error> {
        match self.secret_key.as_deref() {
            None | Some("") => {
                return Err(Error::Internal {
                    operation: "Config validation: secret_key is not configured. \
                     Please set QUILL_SECRET_KEY environment variable or add secret_key to config file."
                        .to_string(),
                });
            }
            Some(_) => {}
        }

        token::parse_algorithm(&self.auth.security.jwt_algorithm)?;

        if self.auth.security.jwt_expiry.as_secs() < 60 {
            return Err(Error::Internal {
                operation: "Config validation: JWT expiry duration is too short (minimum 1 minute)".to_string(),
            });
        }

        if self.auth.security.jwt_expiry.as_secs() > 86400 * 30 {
            return Err(Error::Internal {
                operation: "Config validation: JWT expiry duration is too long (maximum 30 days)".to_string(),
            });
        }

        let password = &self.auth.password;
        if password.min_length > password.max_length {
            return Err(Error::Internal {
                operation: format!(
                    "Config validation: Invalid password configuration: min_length ({}) cannot be greater than max_length ({})",
                    password.min_length, password.max_length
                ),
            });
        }

        if password.min_length < 1 {
            return Err(Error::Internal {
                operation: "Config validation: Invalid password configuration: min_length must be at least 1".to_string(),
            });
        }

        if self.auth.security.cors.allowed_origins.is_empty() {
            return Err(Error::Internal {
                operation: "Config validation: CORS allowed_origins cannot be empty. Add at least one allowed origin.".to_string(),
            });
        }

        let has_wildcard = self
            .auth
            .security
            .cors
            .allowed_origins
            .iter()
            .any(|origin| matches!(origin, CorsOrigin::Wildcard));
        if has_wildcard && self.auth.security.cors.allow_credentials {
            return Err(Error::Internal {
                operation: "Config validation: CORS cannot use wildcard origin '*' with allow_credentials=true. Specify explicit origins."
                    .to_string(),
            });
        }

        Ok(())
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables can still override specific values
            .merge(Env::prefixed("QUILL_").split("__"))
            // Common DATABASE_URL pattern
            .merge(Env::raw().only(&["DATABASE_URL"]).map(|_| "database.url".into()))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
