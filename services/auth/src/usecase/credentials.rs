use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{AccountRepository, PasswordHasher, SessionRepository};
use crate::domain::types::{Account, normalize_email};
use crate::error::AuthServiceError;
use crate::usecase::session::{IssuedSession, issue_session};

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct RegisterOutput {
    pub account: Account,
    pub tokens: IssuedSession,
}

pub struct RegisterUseCase<A, S, H>
where
    A: AccountRepository,
    S: SessionRepository,
    H: PasswordHasher,
{
    pub accounts: A,
    pub sessions: S,
    pub hasher: H,
    pub jwt_secret: String,
}

impl<A, S, H> RegisterUseCase<A, S, H>
where
    A: AccountRepository,
    S: SessionRepository,
    H: PasswordHasher,
{
    pub async fn execute(&self, input: RegisterInput) -> Result<RegisterOutput, AuthServiceError> {
        let email = normalize_email(&input.email);

        if self.accounts.find_by_email(&email).await?.is_some() {
            return Err(AuthServiceError::EmailTaken);
        }

        let password_hash = self.hasher.hash(&input.password)?;
        let now = Utc::now();
        let account = Account {
            id: Uuid::now_v7(),
            email,
            password_hash: Some(password_hash),
            created_at: now,
            updated_at: now,
        };
        // The unique constraint backs this up for concurrent registers with
        // the same email — the repository maps that violation to EmailTaken.
        self.accounts.create(&account).await?;

        let tokens = issue_session(&account, &self.jwt_secret)?;
        self.sessions.create(&tokens.session).await?;

        Ok(RegisterOutput { account, tokens })
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub account: Account,
    pub tokens: IssuedSession,
}

pub struct LoginUseCase<A, S, H>
where
    A: AccountRepository,
    S: SessionRepository,
    H: PasswordHasher,
{
    pub accounts: A,
    pub sessions: S,
    pub hasher: H,
    pub jwt_secret: String,
}

impl<A, S, H> LoginUseCase<A, S, H>
where
    A: AccountRepository,
    S: SessionRepository,
    H: PasswordHasher,
{
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, AuthServiceError> {
        let email = normalize_email(&input.email);

        // Unknown email, social-only account, and wrong password all collapse
        // into the same error so responses don't reveal which emails exist.
        let account = self
            .accounts
            .find_by_email(&email)
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        let password_hash = account
            .password_hash
            .as_deref()
            .ok_or(AuthServiceError::InvalidCredentials)?;

        if !self.hasher.verify(&input.password, password_hash)? {
            return Err(AuthServiceError::InvalidCredentials);
        }

        let tokens = issue_session(&account, &self.jwt_secret)?;
        self.sessions.create(&tokens.session).await?;

        Ok(LoginOutput { account, tokens })
    }
}
