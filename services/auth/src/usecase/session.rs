use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use rand::RngExt;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use nutrack_auth_types::token::{ACCESS_TOKEN_EXP, JwtClaims, REFRESH_TOKEN_EXP};

use crate::domain::repository::{AccountRepository, SessionRepository};
use crate::domain::types::{Account, OPAQUE_TOKEN_LEN, Session};
use crate::error::AuthServiceError;

/// Charset for opaque token values (refresh tokens, reset tickets).
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a fresh opaque token value. Returned to the caller once; only
/// its digest is ever stored.
pub fn generate_opaque_token() -> String {
    let mut rng = rand::rng();
    (0..OPAQUE_TOKEN_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

/// SHA-256 hex digest of an opaque token value — the stored form.
pub fn hash_token(value: &str) -> String {
    hex::encode(Sha256::digest(value.as_bytes()))
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

pub fn issue_access_token(
    account: &Account,
    session_id: Uuid,
    secret: &str,
) -> Result<(String, u64), AuthServiceError> {
    let exp = now_secs() + ACCESS_TOKEN_EXP;
    let claims = JwtClaims {
        sub: account.id.to_string(),
        email: account.email.clone(),
        sid: session_id.to_string(),
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthServiceError::Internal(e.into()))?;
    Ok((token, exp))
}

/// A freshly issued session with its token pair. The `session` record still
/// has to be persisted (or swapped in via rotation) by the caller.
#[derive(Debug)]
pub struct IssuedSession {
    pub session: Session,
    pub access_token: String,
    pub access_token_exp: u64,
    pub refresh_token: String,
}

pub fn issue_session(account: &Account, secret: &str) -> Result<IssuedSession, AuthServiceError> {
    let session_id = Uuid::now_v7();
    let (access_token, access_token_exp) = issue_access_token(account, session_id, secret)?;
    let refresh_token = generate_opaque_token();
    let now = Utc::now();
    let session = Session {
        id: session_id,
        account_id: account.id,
        refresh_token_hash: hash_token(&refresh_token),
        issued_at: now,
        expires_at: now + Duration::seconds(REFRESH_TOKEN_EXP as i64),
        revoked_at: None,
    };
    Ok(IssuedSession {
        session,
        access_token,
        access_token_exp,
        refresh_token,
    })
}

// ── RefreshToken ─────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct RefreshTokenOutput {
    pub account: Account,
    pub tokens: IssuedSession,
}

pub struct RefreshTokenUseCase<A: AccountRepository, S: SessionRepository> {
    pub accounts: A,
    pub sessions: S,
    pub jwt_secret: String,
    /// Policy for replayed refresh tokens: when true, a reuse revokes the
    /// account's entire session set instead of only rejecting the request.
    pub revoke_all_on_reuse: bool,
}

impl<A: AccountRepository, S: SessionRepository> RefreshTokenUseCase<A, S> {
    pub async fn execute(
        &self,
        refresh_token_value: &str,
    ) -> Result<RefreshTokenOutput, AuthServiceError> {
        let presented_hash = hash_token(refresh_token_value);

        let session = self
            .sessions
            .find_by_token_hash(&presented_hash)
            .await?
            .ok_or(AuthServiceError::InvalidRefreshToken)?;

        if session.revoked_at.is_some() {
            // This token was already redeemed or revoked — possible theft.
            self.handle_reuse(&session).await?;
            return Err(AuthServiceError::InvalidRefreshToken);
        }

        if session.expires_at <= Utc::now() {
            return Err(AuthServiceError::InvalidRefreshToken);
        }

        let account = self
            .accounts
            .find_by_id(session.account_id)
            .await?
            .ok_or(AuthServiceError::InvalidRefreshToken)?;

        let issued = issue_session(&account, &self.jwt_secret)?;

        // Rotation: revoke-old + insert-new is one transaction with a CAS on
        // the old row, so a refresh token is redeemable exactly once even
        // under concurrent redemption across server instances.
        if !self.sessions.rotate(session.id, &issued.session).await? {
            self.handle_reuse(&session).await?;
            return Err(AuthServiceError::InvalidRefreshToken);
        }

        Ok(RefreshTokenOutput {
            account,
            tokens: issued,
        })
    }

    async fn handle_reuse(&self, session: &Session) -> Result<(), AuthServiceError> {
        tracing::warn!(
            account_id = %session.account_id,
            session_id = %session.id,
            "refresh token replay detected"
        );
        if self.revoke_all_on_reuse {
            let revoked = self
                .sessions
                .revoke_all_for_account(session.account_id)
                .await?;
            tracing::warn!(
                account_id = %session.account_id,
                revoked,
                "revoked all sessions after refresh token reuse"
            );
        }
        Ok(())
    }
}

// ── Logout ───────────────────────────────────────────────────────────────────

pub struct LogoutUseCase<S: SessionRepository> {
    pub sessions: S,
}

impl<S: SessionRepository> LogoutUseCase<S> {
    /// Revoke the session backing the caller's access token. Idempotent.
    pub async fn execute(
        &self,
        account_id: Uuid,
        session_id: Uuid,
    ) -> Result<(), AuthServiceError> {
        self.sessions.revoke(session_id, account_id).await
    }
}
