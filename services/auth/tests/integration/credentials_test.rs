use nutrack_auth::error::AuthServiceError;
use nutrack_auth::usecase::credentials::{
    LoginInput, LoginUseCase, RegisterInput, RegisterUseCase,
};
use nutrack_auth::usecase::session::hash_token;

use nutrack_auth_types::token::validate_access_token;

use crate::helpers::{
    MockAccountRepo, MockPasswordHasher, MockSessionRepo, TEST_JWT_SECRET, test_account,
};

fn register_usecase(
    accounts: MockAccountRepo,
    sessions: MockSessionRepo,
) -> RegisterUseCase<MockAccountRepo, MockSessionRepo, MockPasswordHasher> {
    RegisterUseCase {
        accounts,
        sessions,
        hasher: MockPasswordHasher,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    }
}

fn login_usecase(
    accounts: MockAccountRepo,
    sessions: MockSessionRepo,
) -> LoginUseCase<MockAccountRepo, MockSessionRepo, MockPasswordHasher> {
    LoginUseCase {
        accounts,
        sessions,
        hasher: MockPasswordHasher,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    }
}

// ── Register ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_register_account_and_issue_session() {
    let accounts = MockAccountRepo::new();
    let sessions = MockSessionRepo::new();
    let accounts_handle = accounts.handle();
    let sessions_handle = sessions.handle();

    let out = register_usecase(accounts, sessions)
        .execute(RegisterInput {
            email: "a@x.com".to_owned(),
            password: "pw1".to_owned(),
        })
        .await
        .unwrap();

    assert_eq!(out.account.email, "a@x.com");
    assert!(!out.tokens.access_token.is_empty());
    assert!(!out.tokens.refresh_token.is_empty());

    // Account persisted with a derived hash, never the plaintext.
    let accounts = accounts_handle.lock().unwrap();
    assert_eq!(accounts.len(), 1);
    let stored_hash = accounts[0].password_hash.as_deref().unwrap();
    assert_ne!(stored_hash, "pw1");

    // Session persisted under the refresh-token digest, not the value.
    let sessions = sessions_handle.lock().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(
        sessions[0].refresh_token_hash,
        hash_token(&out.tokens.refresh_token)
    );
    assert!(sessions[0].is_active());

    // Access token names the account and the backing session.
    let info = validate_access_token(&out.tokens.access_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.account_id, out.account.id);
    assert_eq!(info.session_id, sessions[0].id);
    assert_eq!(info.email, "a@x.com");
}

#[tokio::test]
async fn should_normalize_email_on_registration() {
    let accounts = MockAccountRepo::new();
    let accounts_handle = accounts.handle();

    register_usecase(accounts, MockSessionRepo::new())
        .execute(RegisterInput {
            email: "  User@Example.COM ".to_owned(),
            password: "pw1".to_owned(),
        })
        .await
        .unwrap();

    let accounts = accounts_handle.lock().unwrap();
    assert_eq!(accounts[0].email, "user@example.com");
}

#[tokio::test]
async fn should_reject_second_registration_with_same_normalized_email() {
    let accounts = MockAccountRepo::new();
    let sessions = MockSessionRepo::new();

    register_usecase(accounts.clone(), sessions.clone())
        .execute(RegisterInput {
            email: "a@x.com".to_owned(),
            password: "pw1".to_owned(),
        })
        .await
        .unwrap();

    let result = register_usecase(accounts, sessions)
        .execute(RegisterInput {
            email: "A@X.com".to_owned(),
            password: "other".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::EmailTaken)),
        "expected EmailTaken, got {result:?}"
    );
}

// ── Login ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_login_with_correct_password() {
    let accounts = MockAccountRepo::with(vec![test_account("a@x.com")]);
    let sessions = MockSessionRepo::new();
    let sessions_handle = sessions.handle();

    let out = login_usecase(accounts, sessions)
        .execute(LoginInput {
            email: "a@x.com".to_owned(),
            password: "pw1".to_owned(),
        })
        .await
        .unwrap();

    assert_eq!(out.account.email, "a@x.com");
    assert_eq!(sessions_handle.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_return_identical_error_for_unknown_email_and_wrong_password() {
    let accounts = MockAccountRepo::with(vec![test_account("a@x.com")]);

    let wrong_password = login_usecase(accounts.clone(), MockSessionRepo::new())
        .execute(LoginInput {
            email: "a@x.com".to_owned(),
            password: "wrong".to_owned(),
        })
        .await
        .unwrap_err();

    let unknown_email = login_usecase(accounts, MockSessionRepo::new())
        .execute(LoginInput {
            email: "nobody@x.com".to_owned(),
            password: "pw1".to_owned(),
        })
        .await
        .unwrap_err();

    // Same kind and same message — responses must not reveal which part failed.
    assert_eq!(wrong_password.kind(), unknown_email.kind());
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    assert!(matches!(wrong_password, AuthServiceError::InvalidCredentials));
}

#[tokio::test]
async fn should_reject_password_login_for_social_only_account() {
    let mut account = test_account("social@x.com");
    account.password_hash = None;
    let accounts = MockAccountRepo::with(vec![account]);

    let result = login_usecase(accounts, MockSessionRepo::new())
        .execute(LoginInput {
            email: "social@x.com".to_owned(),
            password: "anything".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::InvalidCredentials)),
        "expected InvalidCredentials, got {result:?}"
    );
}
