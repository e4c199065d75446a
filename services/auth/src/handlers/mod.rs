pub mod credentials;
pub mod password;
pub mod social;
pub mod token;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::types::{Account, LinkedIdentity};
use crate::usecase::session::IssuedSession;

/// Token pair plus user summary — the response body of every
/// session-issuing endpoint.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResult {
    pub access_token: String,
    pub refresh_token: String,
    pub user: AuthUser,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_new_user: Option<bool>,
    #[serde(serialize_with = "nutrack_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl AuthResult {
    /// Response for register/login/refresh — no provider decoration.
    pub fn from_account(account: &Account, tokens: &IssuedSession) -> Self {
        Self {
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
            user: AuthUser {
                id: account.id.to_string(),
                email: account.email.clone(),
                display_name: None,
                photo_url: None,
                provider: None,
                is_new_user: None,
                created_at: account.created_at,
            },
        }
    }

    /// Response for social login — decorated with the linked identity.
    pub fn from_social_login(
        account: &Account,
        identity: &LinkedIdentity,
        tokens: &IssuedSession,
        is_new_user: bool,
    ) -> Self {
        Self {
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
            user: AuthUser {
                id: account.id.to_string(),
                email: account.email.clone(),
                display_name: identity.display_name.clone(),
                photo_url: identity.photo_url.clone(),
                provider: Some(identity.provider.as_str()),
                is_new_user: Some(is_new_user),
                created_at: account.created_at,
            },
        }
    }
}
