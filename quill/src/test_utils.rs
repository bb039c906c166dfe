//! Test utilities shared by the unit and HTTP tests.

use std::{collections::HashMap, sync::Arc};

use axum_test::TestServer;
use sqlx::SqlitePool;

use crate::{
    AppState,
    auth::{
        password::{self, Argon2Params},
        store::{CredentialStore, Identity},
        token::TokenCodec,
    },
    config::{Config, PasswordConfig, PoolSettings},
    db::{
        errors::{DbError, Result},
        handlers::{Authors, Posts, Repository},
        models::{
            authors::{AuthorCreateDBRequest, AuthorDBResponse},
            posts::{PostCreateDBRequest, PostDBResponse},
        },
    },
    templates::Templates,
    types::AuthorId,
};

/// Argon2 parameters cheap enough to hash in every test
const TEST_ARGON2: Argon2Params = Argon2Params {
    memory_kib: 128,
    iterations: 1,
    parallelism: 1,
};

pub fn create_test_config() -> Config {
    let mut config = Config {
        secret_key: Some("test-secret-key-for-testing-only".to_string()),
        allowed_hosts: vec![],
        ..Default::default()
    };

    config.database.pool = PoolSettings {
        max_connections: 1,
        min_connections: 1,
        ..Default::default()
    };

    config.auth.allow_registration = true;
    config.auth.password = PasswordConfig {
        min_length: 8,
        max_length: 64,
        argon2_memory_kib: TEST_ARGON2.memory_kib,
        argon2_iterations: TEST_ARGON2.iterations,
        argon2_parallelism: TEST_ARGON2.parallelism,
    };

    config
}

pub fn create_test_state(pool: SqlitePool) -> AppState {
    create_test_state_with_config(pool, create_test_config())
}

pub fn create_test_state_with_config(pool: SqlitePool, config: Config) -> AppState {
    let tokens = TokenCodec::from_config(&config).expect("Failed to create token codec");
    let templates = Templates::new().expect("Failed to load templates");

    AppState::builder()
        .db(pool)
        .config(config)
        .tokens(Arc::new(tokens))
        .templates(Arc::new(templates))
        .build()
}

pub async fn create_test_app(pool: SqlitePool) -> TestServer {
    crate::Application::new_with_pool(create_test_config(), pool)
        .expect("Failed to create application")
        .into_test_server()
}

pub async fn create_test_author(pool: &SqlitePool, username: &str, password: &str) -> AuthorDBResponse {
    let password_hash = password::hash_string_with_params(password, Some(TEST_ARGON2)).expect("Failed to hash password");

    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    let mut repo = Authors::new(&mut conn);
    repo.create(&AuthorCreateDBRequest {
        username: username.to_string(),
        password_hash,
    })
    .await
    .expect("Failed to create test author")
}

pub async fn create_test_post(pool: &SqlitePool, owner_id: AuthorId, title: &str) -> PostDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    let mut repo = Posts::new(&mut conn);
    repo.create(&PostCreateDBRequest {
        title: title.to_string(),
        description: Some(format!("About {title}")),
        owner_id,
    })
    .await
    .expect("Failed to create test post")
}

/// Log in through `POST /token` and return the access token
pub async fn issue_test_token(server: &TestServer, username: &str, password: &str) -> String {
    let response = server
        .post("/token")
        .form(&[("username", username), ("password", password)])
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    body["access_token"].as_str().expect("access_token missing").to_string()
}

pub fn bearer_header(token: &str) -> (String, String) {
    ("authorization".to_string(), format!("Bearer {token}"))
}

/// A [`CredentialStore`] backed by a map, for exercising the auth core without a database.
#[derive(Default)]
pub struct InMemoryCredentials {
    identities: HashMap<String, Identity>,
    /// Number of lookups served so far
    pub lookups: usize,
    /// When set, every lookup fails with a store error
    pub fail: bool,
}

impl InMemoryCredentials {
    pub fn insert(&mut self, id: AuthorId, username: &str, password: &str, is_active: bool) {
        let password_hash = password::hash_string_with_params(password, Some(TEST_ARGON2)).expect("Failed to hash password");
        self.identities.insert(
            username.to_string(),
            Identity {
                id,
                username: username.to_string(),
                password_hash,
                is_active,
            },
        );
    }

    pub fn remove(&mut self, username: &str) {
        self.identities.remove(username);
    }
}

#[async_trait::async_trait]
impl CredentialStore for InMemoryCredentials {
    async fn find_identity_by_username(&mut self, username: &str) -> Result<Option<Identity>> {
        self.lookups += 1;
        if self.fail {
            return Err(DbError::Other(anyhow::anyhow!("credential store unavailable")));
        }
        Ok(self.identities.get(username).cloned())
    }
}
