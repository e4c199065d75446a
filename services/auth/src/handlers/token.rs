use axum::{Json, extract::State, http::StatusCode};
use axum_extra::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};
use serde::Deserialize;

use nutrack_auth_types::token::validate_access_token;

use crate::error::AuthServiceError;
use crate::handlers::AuthResult;
use crate::state::AppState;
use crate::usecase::session::{LogoutUseCase, RefreshTokenUseCase};

// ── POST /auth/refresh ────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshTokenRequest>,
) -> Result<Json<AuthResult>, AuthServiceError> {
    let usecase = RefreshTokenUseCase {
        accounts: state.account_repo(),
        sessions: state.session_repo(),
        jwt_secret: state.jwt_secret.clone(),
        revoke_all_on_reuse: state.revoke_all_on_token_reuse,
    };

    let out = usecase.execute(&body.refresh_token).await?;

    Ok(Json(AuthResult::from_account(&out.account, &out.tokens)))
}

// ── POST /auth/logout ─────────────────────────────────────────────────────────

pub async fn logout(
    State(state): State<AppState>,
    authorization: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<StatusCode, AuthServiceError> {
    // Missing and invalid bearer tokens both answer 401.
    let TypedHeader(authorization) = authorization.ok_or(AuthServiceError::InvalidToken)?;
    let info = validate_access_token(authorization.token(), &state.jwt_secret)
        .map_err(|_| AuthServiceError::InvalidToken)?;

    let usecase = LogoutUseCase {
        sessions: state.session_repo(),
    };
    usecase.execute(info.account_id, info.session_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
