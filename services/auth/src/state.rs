use sea_orm::DatabaseConnection;

use crate::infra::db::{
    DbAccountRepository, DbIdentityRepository, DbResetTicketRepository, DbSessionRepository,
};
use crate::infra::password::Argon2PasswordHasher;
use crate::infra::provider::HttpProviderVerifier;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub http: reqwest::Client,
    pub jwt_secret: String,
    pub google_client_id: String,
    pub apple_client_id: String,
    pub revoke_all_on_token_reuse: bool,
}

impl AppState {
    pub fn account_repo(&self) -> DbAccountRepository {
        DbAccountRepository {
            db: self.db.clone(),
        }
    }

    pub fn identity_repo(&self) -> DbIdentityRepository {
        DbIdentityRepository {
            db: self.db.clone(),
        }
    }

    pub fn session_repo(&self) -> DbSessionRepository {
        DbSessionRepository {
            db: self.db.clone(),
        }
    }

    pub fn reset_ticket_repo(&self) -> DbResetTicketRepository {
        DbResetTicketRepository {
            db: self.db.clone(),
        }
    }

    pub fn password_hasher(&self) -> Argon2PasswordHasher {
        Argon2PasswordHasher
    }

    pub fn provider_verifier(&self) -> HttpProviderVerifier {
        HttpProviderVerifier {
            http: self.http.clone(),
            google_client_id: self.google_client_id.clone(),
            apple_client_id: self.apple_client_id.clone(),
        }
    }
}
