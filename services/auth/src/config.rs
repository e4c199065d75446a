use serde::Deserialize;

use nutrack_core::config::Config;

fn default_auth_port() -> u16 {
    3101
}

/// Auth service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// HMAC secret for signing JWT access tokens. Env var: `JWT_SECRET`.
    pub jwt_secret: String,
    /// OAuth client ID expected in the `aud` claim of Google ID tokens.
    /// Env var: `GOOGLE_CLIENT_ID`.
    pub google_client_id: String,
    /// App bundle ID expected in the `aud` claim of Apple identity tokens.
    /// Env var: `APPLE_CLIENT_ID`.
    pub apple_client_id: String,
    /// TCP port to listen on (default 3101). Env var: `AUTH_PORT`.
    #[serde(default = "default_auth_port")]
    pub auth_port: u16,
    /// When a revoked refresh token is presented again (possible theft),
    /// revoke every session of the account instead of just rejecting.
    /// Env var: `REVOKE_ALL_ON_TOKEN_REUSE` (default false).
    #[serde(default)]
    pub revoke_all_on_token_reuse: bool,
}

impl Config for AuthConfig {}
