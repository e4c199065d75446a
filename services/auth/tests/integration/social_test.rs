use nutrack_auth::domain::types::{Provider, VerifiedIdentity};
use nutrack_auth::error::AuthServiceError;
use nutrack_auth::usecase::social::{SocialLoginInput, SocialLoginUseCase};

use crate::helpers::{
    MockAccountRepo, MockIdentityRepo, MockProviderVerifier, MockSessionRepo, TEST_JWT_SECRET,
    test_account, verified_google_identity,
};

struct SocialHarness {
    accounts: MockAccountRepo,
    identities: MockIdentityRepo,
    sessions: MockSessionRepo,
}

impl SocialHarness {
    fn new(existing_accounts: Vec<nutrack_auth::domain::types::Account>) -> Self {
        let accounts = MockAccountRepo::with(existing_accounts);
        let identities = MockIdentityRepo::new(accounts.handle());
        let sessions = MockSessionRepo::new();
        Self {
            accounts,
            identities,
            sessions,
        }
    }

    fn usecase(
        &self,
        verifier: MockProviderVerifier,
    ) -> SocialLoginUseCase<MockProviderVerifier, MockAccountRepo, MockIdentityRepo, MockSessionRepo>
    {
        SocialLoginUseCase {
            verifier,
            accounts: self.accounts.clone(),
            identities: self.identities.clone(),
            sessions: self.sessions.clone(),
            jwt_secret: TEST_JWT_SECRET.to_owned(),
        }
    }
}

fn google_input(token: &str) -> SocialLoginInput {
    SocialLoginInput {
        provider: Provider::Google,
        provider_token: token.to_owned(),
        fallback_email: None,
        fallback_display_name: None,
    }
}

#[tokio::test]
async fn should_enroll_new_account_for_unknown_subject_and_email() {
    let harness = SocialHarness::new(vec![]);
    let verifier =
        MockProviderVerifier::with("tok-1", verified_google_identity("sub-1", "new@x.com"));

    let out = harness.usecase(verifier).execute(google_input("tok-1")).await.unwrap();

    assert!(out.is_new_user);
    assert_eq!(out.account.email, "new@x.com");
    // Social-only enrollment carries no password hash.
    assert!(out.account.password_hash.is_none());
    assert_eq!(out.identity.subject, "sub-1");
    assert_eq!(out.identity.account_id, out.account.id);

    assert_eq!(harness.accounts.handle().lock().unwrap().len(), 1);
    assert_eq!(harness.identities.handle().lock().unwrap().len(), 1);
    assert_eq!(harness.sessions.handle().lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_link_identity_to_existing_account_with_matching_email() {
    let existing = test_account("existing@x.com");
    let harness = SocialHarness::new(vec![existing.clone()]);
    let verifier =
        MockProviderVerifier::with("tok-1", verified_google_identity("sub-1", "existing@x.com"));

    let out = harness.usecase(verifier).execute(google_input("tok-1")).await.unwrap();

    assert!(!out.is_new_user);
    assert_eq!(out.account.id, existing.id);
    assert_eq!(out.identity.account_id, existing.id);

    // Linked, not duplicated.
    assert_eq!(harness.accounts.handle().lock().unwrap().len(), 1);
    assert_eq!(harness.identities.handle().lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_resolve_known_subject_to_same_account_on_repeat_login() {
    let harness = SocialHarness::new(vec![]);
    let verifier =
        MockProviderVerifier::with("tok-1", verified_google_identity("sub-1", "new@x.com"));

    let first = harness
        .usecase(verifier.clone())
        .execute(google_input("tok-1"))
        .await
        .unwrap();
    assert!(first.is_new_user);

    let second = harness.usecase(verifier).execute(google_input("tok-1")).await.unwrap();

    assert!(!second.is_new_user);
    assert_eq!(second.account.id, first.account.id);
    assert_eq!(harness.accounts.handle().lock().unwrap().len(), 1);
    assert_eq!(harness.identities.handle().lock().unwrap().len(), 1);
    // One session per login.
    assert_eq!(harness.sessions.handle().lock().unwrap().len(), 2);
}

#[tokio::test]
async fn should_reject_unverifiable_provider_token() {
    let harness = SocialHarness::new(vec![]);
    let verifier =
        MockProviderVerifier::with("tok-1", verified_google_identity("sub-1", "new@x.com"));

    let result = harness
        .usecase(verifier)
        .execute(google_input("forged-token"))
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::InvalidProviderToken)),
        "expected InvalidProviderToken, got {result:?}"
    );
    assert!(harness.accounts.handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_use_fallback_email_when_provider_withholds_it() {
    let harness = SocialHarness::new(vec![]);
    let verifier = MockProviderVerifier::with(
        "apple-tok",
        VerifiedIdentity {
            provider: Provider::Apple,
            subject: "apple-sub".to_owned(),
            email: None,
            display_name: None,
            photo_url: None,
        },
    );

    let out = harness
        .usecase(verifier)
        .execute(SocialLoginInput {
            provider: Provider::Apple,
            provider_token: "apple-tok".to_owned(),
            fallback_email: Some("From-Apple@X.com".to_owned()),
            fallback_display_name: Some("Apple User".to_owned()),
        })
        .await
        .unwrap();

    assert!(out.is_new_user);
    assert_eq!(out.account.email, "from-apple@x.com");
    assert_eq!(out.identity.display_name.as_deref(), Some("Apple User"));
}

#[tokio::test]
async fn should_reject_login_without_any_email() {
    let harness = SocialHarness::new(vec![]);
    let verifier = MockProviderVerifier::with(
        "apple-tok",
        VerifiedIdentity {
            provider: Provider::Apple,
            subject: "apple-sub".to_owned(),
            email: None,
            display_name: None,
            photo_url: None,
        },
    );

    let result = harness
        .usecase(verifier)
        .execute(SocialLoginInput {
            provider: Provider::Apple,
            provider_token: "apple-tok".to_owned(),
            fallback_email: None,
            fallback_display_name: None,
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::InvalidProviderToken)),
        "expected InvalidProviderToken, got {result:?}"
    );
}
