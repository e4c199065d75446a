use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::domain::repository::{AccountRepository, PasswordHasher, ResetTicketRepository};
use crate::domain::types::{
    OutboxEvent, PasswordResetTicket, RESET_TICKET_TTL_SECS, normalize_email,
};
use crate::error::AuthServiceError;
use crate::usecase::session::{generate_opaque_token, hash_token};

// ── ForgotPassword ───────────────────────────────────────────────────────────

pub struct ForgotPasswordInput {
    pub email: String,
}

pub struct ForgotPasswordUseCase<A, R>
where
    A: AccountRepository,
    R: ResetTicketRepository,
{
    pub accounts: A,
    pub tickets: R,
}

impl<A, R> ForgotPasswordUseCase<A, R>
where
    A: AccountRepository,
    R: ResetTicketRepository,
{
    /// Succeeds whether or not the email is registered; a ticket and its
    /// notification event are written only when the account exists.
    pub async fn execute(&self, input: ForgotPasswordInput) -> Result<(), AuthServiceError> {
        let email = normalize_email(&input.email);

        let Some(account) = self.accounts.find_by_email(&email).await? else {
            return Ok(());
        };

        let token = generate_opaque_token();
        let now = Utc::now();
        let ticket = PasswordResetTicket {
            id: Uuid::now_v7(),
            account_id: account.id,
            token_hash: hash_token(&token),
            expires_at: now + Duration::seconds(RESET_TICKET_TTL_SECS),
            consumed_at: None,
            created_at: now,
        };

        // The plaintext token travels only inside the outbox payload, for the
        // notification relay to embed in the reset link. It is never stored
        // on the ticket itself.
        let event = OutboxEvent {
            id: Uuid::new_v4(),
            kind: "password_reset_requested".to_owned(),
            payload: json!({ "email": email, "token": token }),
            idempotency_key: format!("password_reset_requested:{}", ticket.id),
        };

        self.tickets.create_with_outbox(&ticket, &event).await?;
        Ok(())
    }
}

// ── ResetPassword ────────────────────────────────────────────────────────────

pub struct ResetPasswordInput {
    pub ticket_token: String,
    pub new_password: String,
}

pub struct ResetPasswordUseCase<R, H>
where
    R: ResetTicketRepository,
    H: PasswordHasher,
{
    pub tickets: R,
    pub hasher: H,
}

impl<R, H> ResetPasswordUseCase<R, H>
where
    R: ResetTicketRepository,
    H: PasswordHasher,
{
    pub async fn execute(&self, input: ResetPasswordInput) -> Result<(), AuthServiceError> {
        let ticket = self
            .tickets
            .find_valid(&hash_token(&input.ticket_token))
            .await?
            .ok_or(AuthServiceError::InvalidResetTicket)?;

        let new_password_hash = self.hasher.hash(&input.new_password)?;

        // Consume-ticket + set-password + revoke-all-sessions is a single
        // transaction with a CAS on the ticket, so a ticket changes exactly
        // one password no matter how many requests race on it.
        let consumed = self
            .tickets
            .consume_and_reset_password(ticket.id, ticket.account_id, &new_password_hash)
            .await?;
        if !consumed {
            return Err(AuthServiceError::InvalidResetTicket);
        }

        tracing::info!(account_id = %ticket.account_id, "password reset completed");
        Ok(())
    }
}
