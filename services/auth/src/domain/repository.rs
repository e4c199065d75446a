#![allow(async_fn_in_trait)]

use uuid::Uuid;

use crate::domain::types::{
    Account, LinkedIdentity, OutboxEvent, PasswordResetTicket, Provider, Session,
    VerifiedIdentity,
};
use crate::error::AuthServiceError;

/// Repository for user accounts.
pub trait AccountRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AuthServiceError>;

    /// Insert a new account. Fails with `EmailTaken` when the email is
    /// already registered (unique constraint, covers concurrent registers).
    async fn create(&self, account: &Account) -> Result<(), AuthServiceError>;
}

/// Repository for provider-subject bindings.
pub trait IdentityRepository: Send + Sync {
    async fn find_by_subject(
        &self,
        provider: Provider,
        subject: &str,
    ) -> Result<Option<LinkedIdentity>, AuthServiceError>;

    /// Bind a provider subject to an existing account.
    async fn link_to_account(&self, identity: &LinkedIdentity) -> Result<(), AuthServiceError>;

    /// Create a fresh account and its first linked identity in one transaction.
    async fn create_account_with_identity(
        &self,
        account: &Account,
        identity: &LinkedIdentity,
    ) -> Result<(), AuthServiceError>;
}

/// Repository for refresh-token sessions.
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &Session) -> Result<(), AuthServiceError>;

    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<Session>, AuthServiceError>;

    /// Atomically revoke `old_id` and insert `replacement` (token rotation).
    /// The revoke is a compare-and-swap on `revoked_at IS NULL`; returns
    /// `false` without inserting when another rotation already won.
    async fn rotate(&self, old_id: Uuid, replacement: &Session)
    -> Result<bool, AuthServiceError>;

    /// Revoke one session. Idempotent: revoking an already-revoked or
    /// unknown session is a no-op.
    async fn revoke(&self, session_id: Uuid, account_id: Uuid) -> Result<(), AuthServiceError>;

    /// Revoke every active session of an account. Returns the revoked count.
    async fn revoke_all_for_account(&self, account_id: Uuid) -> Result<u64, AuthServiceError>;
}

/// Repository for password-reset tickets.
pub trait ResetTicketRepository: Send + Sync {
    /// Insert a new ticket and its notification outbox event atomically
    /// (same transaction).
    async fn create_with_outbox(
        &self,
        ticket: &PasswordResetTicket,
        event: &OutboxEvent,
    ) -> Result<(), AuthServiceError>;

    /// Find an unconsumed, unexpired ticket by token digest.
    async fn find_valid(
        &self,
        token_hash: &str,
    ) -> Result<Option<PasswordResetTicket>, AuthServiceError>;

    /// Atomically consume the ticket, set the account's password hash, and
    /// revoke all of the account's active sessions. Returns `false` when the
    /// ticket was already consumed or expired meanwhile.
    async fn consume_and_reset_password(
        &self,
        ticket_id: Uuid,
        account_id: Uuid,
        new_password_hash: &str,
    ) -> Result<bool, AuthServiceError>;
}

/// Opaque password-hashing primitive.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, AuthServiceError>;

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthServiceError>;
}

/// Verifies provider-issued identity tokens. One method per provider so new
/// providers are added by extending the capability, not the callers.
pub trait ProviderVerifier: Send + Sync {
    async fn verify_google(&self, id_token: &str) -> Result<VerifiedIdentity, AuthServiceError>;

    async fn verify_apple(
        &self,
        identity_token: &str,
    ) -> Result<VerifiedIdentity, AuthServiceError>;
}
