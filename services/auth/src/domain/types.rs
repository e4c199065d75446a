use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registered user identity. `password_hash` is `None` for accounts created
/// through social login that never set a password.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// External identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Google,
    Apple,
}

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Apple => "apple",
        }
    }

    /// Parse the stored string form. Returns `None` for unknown values.
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "google" => Some(Self::Google),
            "apple" => Some(Self::Apple),
            _ => None,
        }
    }
}

/// Binding between a provider subject and a local account.
#[derive(Debug, Clone)]
pub struct LinkedIdentity {
    pub id: Uuid,
    pub account_id: Uuid,
    pub provider: Provider,
    pub subject: String,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Server-side record backing one refresh-token lineage. Holds only the
/// SHA-256 digest of the refresh token, never the value itself.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub account_id: Uuid,
    pub refresh_token_hash: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn is_active(&self) -> bool {
        self.revoked_at.is_none() && self.expires_at > Utc::now()
    }
}

/// One-time password-reset authorization. Single-use: `consumed_at` is set
/// atomically with the password change.
#[derive(Debug, Clone)]
pub struct PasswordResetTicket {
    pub id: Uuid,
    pub account_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub consumed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl PasswordResetTicket {
    pub fn is_valid(&self) -> bool {
        self.consumed_at.is_none() && self.expires_at > Utc::now()
    }
}

/// Identity asserted by a provider token after verification.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    pub provider: Provider,
    pub subject: String,
    /// Absent when the provider withholds it (Apple after first login).
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

/// Outbox event for async delivery (e.g. password-reset email).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub kind: String,
    pub payload: serde_json::Value,
    pub idempotency_key: String,
}

/// Canonical form for stored and looked-up emails.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Length of opaque refresh-token and reset-ticket values in characters.
pub const OPAQUE_TOKEN_LEN: usize = 64;

/// Password-reset ticket time-to-live in seconds (30 minutes).
pub const RESET_TICKET_TTL_SECS: i64 = 1800;
