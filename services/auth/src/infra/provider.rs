use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;

use crate::domain::repository::ProviderVerifier;
use crate::domain::types::{Provider, VerifiedIdentity};
use crate::error::AuthServiceError;

const GOOGLE_JWKS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";
const GOOGLE_ISSUERS: [&str; 2] = ["https://accounts.google.com", "accounts.google.com"];

const APPLE_JWKS_URL: &str = "https://appleid.apple.com/auth/keys";
const APPLE_ISSUER: &str = "https://appleid.apple.com";

#[derive(Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

#[derive(Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

#[derive(Deserialize)]
struct GoogleClaims {
    sub: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

#[derive(Deserialize)]
struct AppleClaims {
    sub: String,
    /// Present on first authorization only; later logins rely on the
    /// client-supplied fallback.
    email: Option<String>,
}

/// Verifies provider identity tokens against the provider's published JWKS.
///
/// Network and key-set failures are internal (5xx) errors; signature,
/// audience, issuer, and expiry failures are `InvalidProviderToken`.
#[derive(Clone)]
pub struct HttpProviderVerifier {
    pub http: reqwest::Client,
    pub google_client_id: String,
    pub apple_client_id: String,
}

impl HttpProviderVerifier {
    async fn decoding_key_for(
        &self,
        jwks_url: &str,
        token: &str,
    ) -> Result<DecodingKey, AuthServiceError> {
        let header = decode_header(token).map_err(|_| AuthServiceError::InvalidProviderToken)?;
        let kid = header
            .kid
            .ok_or(AuthServiceError::InvalidProviderToken)?;

        let jwks: JwkSet = self
            .http
            .get(jwks_url)
            .send()
            .await
            .map_err(|e| AuthServiceError::Internal(anyhow::anyhow!("fetch JWKS: {e}")))?
            .error_for_status()
            .map_err(|e| AuthServiceError::Internal(anyhow::anyhow!("fetch JWKS: {e}")))?
            .json()
            .await
            .map_err(|e| AuthServiceError::Internal(anyhow::anyhow!("parse JWKS: {e}")))?;

        let jwk = jwks
            .keys
            .into_iter()
            .find(|k| k.kid == kid)
            .ok_or(AuthServiceError::InvalidProviderToken)?;

        DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
            .map_err(|e| AuthServiceError::Internal(anyhow::anyhow!("bad JWK {kid}: {e}")))
    }
}

impl ProviderVerifier for HttpProviderVerifier {
    async fn verify_google(&self, id_token: &str) -> Result<VerifiedIdentity, AuthServiceError> {
        let key = self.decoding_key_for(GOOGLE_JWKS_URL, id_token).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.google_client_id.as_str()]);
        validation.set_issuer(&GOOGLE_ISSUERS);

        let data = decode::<GoogleClaims>(id_token, &key, &validation)
            .map_err(|_| AuthServiceError::InvalidProviderToken)?;

        Ok(VerifiedIdentity {
            provider: Provider::Google,
            subject: data.claims.sub,
            email: data.claims.email,
            display_name: data.claims.name,
            photo_url: data.claims.picture,
        })
    }

    async fn verify_apple(
        &self,
        identity_token: &str,
    ) -> Result<VerifiedIdentity, AuthServiceError> {
        let key = self.decoding_key_for(APPLE_JWKS_URL, identity_token).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.apple_client_id.as_str()]);
        validation.set_issuer(&[APPLE_ISSUER]);

        let data = decode::<AppleClaims>(identity_token, &key, &validation)
            .map_err(|_| AuthServiceError::InvalidProviderToken)?;

        Ok(VerifiedIdentity {
            provider: Provider::Apple,
            subject: data.claims.sub,
            email: data.claims.email,
            // Apple never puts these in the identity token.
            display_name: None,
            photo_url: None,
        })
    }
}
