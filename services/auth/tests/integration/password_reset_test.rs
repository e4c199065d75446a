use chrono::{Duration, Utc};

use nutrack_auth::domain::repository::SessionRepository as _;
use nutrack_auth::error::AuthServiceError;
use nutrack_auth::usecase::password_reset::{
    ForgotPasswordInput, ForgotPasswordUseCase, ResetPasswordInput, ResetPasswordUseCase,
};
use nutrack_auth::usecase::session::{RefreshTokenUseCase, hash_token, issue_session};

use crate::helpers::{
    MockAccountRepo, MockPasswordHasher, MockResetTicketRepo, MockSessionRepo, TEST_JWT_SECRET,
    test_account,
};

struct ResetHarness {
    accounts: MockAccountRepo,
    sessions: MockSessionRepo,
    tickets: MockResetTicketRepo,
}

impl ResetHarness {
    fn new(existing_accounts: Vec<nutrack_auth::domain::types::Account>) -> Self {
        let accounts = MockAccountRepo::with(existing_accounts);
        let sessions = MockSessionRepo::new();
        let tickets = MockResetTicketRepo::new(accounts.handle(), sessions.handle());
        Self {
            accounts,
            sessions,
            tickets,
        }
    }

    fn forgot(&self) -> ForgotPasswordUseCase<MockAccountRepo, MockResetTicketRepo> {
        ForgotPasswordUseCase {
            accounts: self.accounts.clone(),
            tickets: self.tickets.clone(),
        }
    }

    fn reset(&self) -> ResetPasswordUseCase<MockResetTicketRepo, MockPasswordHasher> {
        ResetPasswordUseCase {
            tickets: self.tickets.clone(),
            hasher: MockPasswordHasher,
        }
    }

    /// Pull the plaintext reset token out of the outbox payload, the way the
    /// notification relay would.
    fn dispatched_token(&self) -> String {
        let outbox = self.tickets.outbox_handle();
        let events = outbox.lock().unwrap();
        events
            .last()
            .expect("no outbox event dispatched")
            .payload["token"]
            .as_str()
            .unwrap()
            .to_owned()
    }
}

// ── ForgotPassword ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_succeed_without_ticket_for_unknown_email() {
    let harness = ResetHarness::new(vec![]);

    harness
        .forgot()
        .execute(ForgotPasswordInput {
            email: "nobody@x.com".to_owned(),
        })
        .await
        .unwrap();

    // Anti-enumeration: success, but nothing written for a missing account.
    assert!(harness.tickets.tickets_handle().lock().unwrap().is_empty());
    assert!(harness.tickets.outbox_handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_create_ticket_and_outbox_event_for_known_email() {
    let account = test_account("a@x.com");
    let harness = ResetHarness::new(vec![account.clone()]);

    harness
        .forgot()
        .execute(ForgotPasswordInput {
            email: "A@x.com".to_owned(),
        })
        .await
        .unwrap();

    let token = harness.dispatched_token();
    let tickets = harness.tickets.tickets_handle();
    let tickets = tickets.lock().unwrap();
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].account_id, account.id);
    // Only the digest is stored; the dispatched value hashes to it.
    assert_ne!(tickets[0].token_hash, token);
    assert_eq!(tickets[0].token_hash, hash_token(&token));
    assert!(tickets[0].is_valid());
}

// ── ResetPassword ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reset_password_and_revoke_all_sessions() {
    let account = test_account("a@x.com");
    let harness = ResetHarness::new(vec![account.clone()]);

    // Two live sessions that must die with the reset.
    for _ in 0..2 {
        let issued = issue_session(&account, TEST_JWT_SECRET).unwrap();
        harness.sessions.create(&issued.session).await.unwrap();
    }

    harness
        .forgot()
        .execute(ForgotPasswordInput {
            email: "a@x.com".to_owned(),
        })
        .await
        .unwrap();
    let token = harness.dispatched_token();

    harness
        .reset()
        .execute(ResetPasswordInput {
            ticket_token: token,
            new_password: "new-password".to_owned(),
        })
        .await
        .unwrap();

    let accounts = harness.accounts.handle();
    let accounts = accounts.lock().unwrap();
    assert_eq!(
        accounts[0].password_hash.as_deref(),
        Some("hashed:new-password")
    );

    let sessions = harness.sessions.handle();
    assert!(
        sessions
            .lock()
            .unwrap()
            .iter()
            .all(|s| s.revoked_at.is_some()),
        "every pre-reset session must be revoked"
    );
}

#[tokio::test]
async fn should_reject_previously_issued_refresh_tokens_after_reset() {
    let account = test_account("a@x.com");
    let harness = ResetHarness::new(vec![account.clone()]);

    let issued = issue_session(&account, TEST_JWT_SECRET).unwrap();
    harness.sessions.create(&issued.session).await.unwrap();

    harness
        .forgot()
        .execute(ForgotPasswordInput {
            email: "a@x.com".to_owned(),
        })
        .await
        .unwrap();
    let token = harness.dispatched_token();
    harness
        .reset()
        .execute(ResetPasswordInput {
            ticket_token: token,
            new_password: "new-password".to_owned(),
        })
        .await
        .unwrap();

    let result = RefreshTokenUseCase {
        accounts: harness.accounts.clone(),
        sessions: harness.sessions.clone(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        revoke_all_on_reuse: false,
    }
    .execute(&issued.refresh_token)
    .await;

    assert!(
        matches!(result, Err(AuthServiceError::InvalidRefreshToken)),
        "expected InvalidRefreshToken, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_second_use_of_same_ticket() {
    let account = test_account("a@x.com");
    let harness = ResetHarness::new(vec![account]);

    harness
        .forgot()
        .execute(ForgotPasswordInput {
            email: "a@x.com".to_owned(),
        })
        .await
        .unwrap();
    let token = harness.dispatched_token();

    harness
        .reset()
        .execute(ResetPasswordInput {
            ticket_token: token.clone(),
            new_password: "first".to_owned(),
        })
        .await
        .unwrap();

    let result = harness
        .reset()
        .execute(ResetPasswordInput {
            ticket_token: token,
            new_password: "second".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::InvalidResetTicket)),
        "expected InvalidResetTicket, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_expired_ticket() {
    let account = test_account("a@x.com");
    let harness = ResetHarness::new(vec![account]);

    harness
        .forgot()
        .execute(ForgotPasswordInput {
            email: "a@x.com".to_owned(),
        })
        .await
        .unwrap();
    let token = harness.dispatched_token();

    {
        let tickets = harness.tickets.tickets_handle();
        let mut tickets = tickets.lock().unwrap();
        tickets[0].expires_at = Utc::now() - Duration::seconds(1);
    }

    let result = harness
        .reset()
        .execute(ResetPasswordInput {
            ticket_token: token,
            new_password: "new-password".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::InvalidResetTicket)),
        "expected InvalidResetTicket, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_unknown_ticket_token() {
    let harness = ResetHarness::new(vec![]);

    let result = harness
        .reset()
        .execute(ResetPasswordInput {
            ticket_token: "no-such-token".to_owned(),
            new_password: "new-password".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::InvalidResetTicket)),
        "expected InvalidResetTicket, got {result:?}"
    );
}
