use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// OAuth2 password-grant form (`application/x-www-form-urlencoded`)
#[derive(Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginForm {
    /// When present, must be `password`
    #[serde(default)]
    pub grant_type: Option<String>,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("grant_type", &self.grant_type)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always `Bearer`
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
        }
    }
}
