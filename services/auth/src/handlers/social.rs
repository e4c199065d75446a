use axum::{Json, extract::State};
use serde::Deserialize;

use crate::domain::types::Provider;
use crate::error::AuthServiceError;
use crate::handlers::AuthResult;
use crate::state::AppState;
use crate::usecase::social::{SocialLoginInput, SocialLoginUseCase};

// ── POST /auth/google ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleAuthRequest {
    pub id_token: String,
}

pub async fn google_login(
    State(state): State<AppState>,
    Json(body): Json<GoogleAuthRequest>,
) -> Result<Json<AuthResult>, AuthServiceError> {
    social_login(
        state,
        SocialLoginInput {
            provider: Provider::Google,
            provider_token: body.id_token,
            fallback_email: None,
            fallback_display_name: None,
        },
    )
    .await
}

// ── POST /auth/apple ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppleAuthRequest {
    pub identity_token: String,
    /// Forwarded by the client but unused here; server-to-server Apple calls
    /// would need it.
    pub authorization_code: Option<String>,
    /// Apple discloses these only on first authorization, as a sibling of
    /// the token — the client forwards them so enrollment can capture them.
    pub email: Option<String>,
    pub full_name: Option<String>,
}

pub async fn apple_login(
    State(state): State<AppState>,
    Json(body): Json<AppleAuthRequest>,
) -> Result<Json<AuthResult>, AuthServiceError> {
    social_login(
        state,
        SocialLoginInput {
            provider: Provider::Apple,
            provider_token: body.identity_token,
            fallback_email: body.email,
            fallback_display_name: body.full_name,
        },
    )
    .await
}

async fn social_login(
    state: AppState,
    input: SocialLoginInput,
) -> Result<Json<AuthResult>, AuthServiceError> {
    let usecase = SocialLoginUseCase {
        verifier: state.provider_verifier(),
        accounts: state.account_repo(),
        identities: state.identity_repo(),
        sessions: state.session_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };

    let out = usecase.execute(input).await?;

    Ok(Json(AuthResult::from_social_login(
        &out.account,
        &out.identity,
        &out.tokens,
        out.is_new_user,
    )))
}
