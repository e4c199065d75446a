use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::password_reset::{
    ForgotPasswordInput, ForgotPasswordUseCase, ResetPasswordInput, ResetPasswordUseCase,
};

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ── POST /auth/forgot-password ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Always 200 with the same body — the response must not reveal whether the
/// email is registered.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AuthServiceError> {
    let usecase = ForgotPasswordUseCase {
        accounts: state.account_repo(),
        tickets: state.reset_ticket_repo(),
    };
    usecase
        .execute(ForgotPasswordInput { email: body.email })
        .await?;

    Ok(Json(MessageResponse {
        message: "If the email exists, a reset link has been sent",
    }))
}

// ── POST /auth/reset-password ─────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[serde(alias = "ticketToken")]
    pub reset_token: String,
    pub new_password: String,
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AuthServiceError> {
    let usecase = ResetPasswordUseCase {
        tickets: state.reset_ticket_repo(),
        hasher: state.password_hasher(),
    };
    usecase
        .execute(ResetPasswordInput {
            ticket_token: body.reset_token,
            new_password: body.new_password,
        })
        .await?;

    Ok(Json(MessageResponse {
        message: "Password has been reset successfully",
    }))
}
