use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{
    AccountRepository, IdentityRepository, ProviderVerifier, SessionRepository,
};
use crate::domain::types::{Account, LinkedIdentity, Provider, normalize_email};
use crate::error::AuthServiceError;
use crate::usecase::session::{IssuedSession, issue_session};

pub struct SocialLoginInput {
    pub provider: Provider,
    pub provider_token: String,
    /// Client-supplied fallbacks for fields Apple only discloses on the
    /// first authorization.
    pub fallback_email: Option<String>,
    pub fallback_display_name: Option<String>,
}

#[derive(Debug)]
pub struct SocialLoginOutput {
    pub account: Account,
    pub identity: LinkedIdentity,
    pub tokens: IssuedSession,
    pub is_new_user: bool,
}

pub struct SocialLoginUseCase<V, A, I, S>
where
    V: ProviderVerifier,
    A: AccountRepository,
    I: IdentityRepository,
    S: SessionRepository,
{
    pub verifier: V,
    pub accounts: A,
    pub identities: I,
    pub sessions: S,
    pub jwt_secret: String,
}

impl<V, A, I, S> SocialLoginUseCase<V, A, I, S>
where
    V: ProviderVerifier,
    A: AccountRepository,
    I: IdentityRepository,
    S: SessionRepository,
{
    pub async fn execute(
        &self,
        input: SocialLoginInput,
    ) -> Result<SocialLoginOutput, AuthServiceError> {
        let verified = match input.provider {
            Provider::Google => self.verifier.verify_google(&input.provider_token).await?,
            Provider::Apple => self.verifier.verify_apple(&input.provider_token).await?,
        };

        // A verified subject without any email cannot be linked or enrolled.
        let email = verified
            .email
            .clone()
            .or(input.fallback_email)
            .map(|e| normalize_email(&e))
            .ok_or(AuthServiceError::InvalidProviderToken)?;
        let display_name = verified.display_name.clone().or(input.fallback_display_name);

        // 1. Known subject → resolve to its account.
        if let Some(identity) = self
            .identities
            .find_by_subject(input.provider, &verified.subject)
            .await?
        {
            let account = self
                .accounts
                .find_by_id(identity.account_id)
                .await?
                .ok_or_else(|| {
                    AuthServiceError::Internal(anyhow::anyhow!(
                        "linked identity {} points at missing account",
                        identity.id
                    ))
                })?;
            let tokens = issue_session(&account, &self.jwt_secret)?;
            self.sessions.create(&tokens.session).await?;
            return Ok(SocialLoginOutput {
                account,
                identity,
                tokens,
                is_new_user: false,
            });
        }

        let now = Utc::now();
        let identity = LinkedIdentity {
            id: Uuid::now_v7(),
            account_id: Uuid::nil(), // bound below
            provider: input.provider,
            subject: verified.subject.clone(),
            email: email.clone(),
            display_name,
            photo_url: verified.photo_url.clone(),
            created_at: now,
        };

        // 2. New subject, known email → link the identity to that account.
        if let Some(account) = self.accounts.find_by_email(&email).await? {
            let identity = LinkedIdentity {
                account_id: account.id,
                ..identity
            };
            self.identities.link_to_account(&identity).await?;
            let tokens = issue_session(&account, &self.jwt_secret)?;
            self.sessions.create(&tokens.session).await?;
            return Ok(SocialLoginOutput {
                account,
                identity,
                tokens,
                is_new_user: false,
            });
        }

        // 3. Neither exists → enroll a fresh social-only account.
        let account = Account {
            id: Uuid::now_v7(),
            email,
            password_hash: None,
            created_at: now,
            updated_at: now,
        };
        let identity = LinkedIdentity {
            account_id: account.id,
            ..identity
        };
        self.identities
            .create_account_with_identity(&account, &identity)
            .await?;

        let tokens = issue_session(&account, &self.jwt_secret)?;
        self.sessions.create(&tokens.session).await?;

        Ok(SocialLoginOutput {
            account,
            identity,
            tokens,
            is_new_user: true,
        })
    }
}
