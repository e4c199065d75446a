use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, SqlErr, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use nutrack_auth_schema::{
    accounts, linked_identities, outbox_events, password_reset_tickets, sessions,
};

use crate::domain::repository::{
    AccountRepository, IdentityRepository, ResetTicketRepository, SessionRepository,
};
use crate::domain::types::{
    Account, LinkedIdentity, OutboxEvent, PasswordResetTicket, Provider, Session,
};
use crate::error::AuthServiceError;

// ── Account repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAccountRepository {
    pub db: DatabaseConnection,
}

impl AccountRepository for DbAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthServiceError> {
        let model = accounts::Entity::find()
            .filter(accounts::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find account by email")?;
        Ok(model.map(account_from_model))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AuthServiceError> {
        let model = accounts::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find account by id")?;
        Ok(model.map(account_from_model))
    }

    async fn create(&self, account: &Account) -> Result<(), AuthServiceError> {
        let result = accounts::ActiveModel {
            id: Set(account.id),
            email: Set(account.email.clone()),
            password_hash: Set(account.password_hash.clone()),
            created_at: Set(account.created_at),
            updated_at: Set(account.updated_at),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            // Concurrent register with the same email loses to the unique index.
            Err(ref e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(AuthServiceError::EmailTaken)
            }
            Err(e) => Err(anyhow::Error::new(e).context("create account").into()),
        }
    }
}

fn account_from_model(model: accounts::Model) -> Account {
    Account {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── LinkedIdentity repository ─────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbIdentityRepository {
    pub db: DatabaseConnection,
}

impl IdentityRepository for DbIdentityRepository {
    async fn find_by_subject(
        &self,
        provider: Provider,
        subject: &str,
    ) -> Result<Option<LinkedIdentity>, AuthServiceError> {
        let model = linked_identities::Entity::find()
            .filter(linked_identities::Column::Provider.eq(provider.as_str()))
            .filter(linked_identities::Column::Subject.eq(subject))
            .one(&self.db)
            .await
            .context("find linked identity by subject")?;
        model.map(identity_from_model).transpose()
    }

    async fn link_to_account(&self, identity: &LinkedIdentity) -> Result<(), AuthServiceError> {
        identity_active_model(identity)
            .insert(&self.db)
            .await
            .context("link identity to account")?;
        Ok(())
    }

    async fn create_account_with_identity(
        &self,
        account: &Account,
        identity: &LinkedIdentity,
    ) -> Result<(), AuthServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let account = account.clone();
                let identity = identity.clone();
                Box::pin(async move {
                    accounts::ActiveModel {
                        id: Set(account.id),
                        email: Set(account.email.clone()),
                        password_hash: Set(account.password_hash.clone()),
                        created_at: Set(account.created_at),
                        updated_at: Set(account.updated_at),
                    }
                    .insert(txn)
                    .await?;
                    identity_active_model(&identity).insert(txn).await?;
                    Ok(())
                })
            })
            .await
            .context("create account with identity")?;
        Ok(())
    }
}

fn identity_active_model(identity: &LinkedIdentity) -> linked_identities::ActiveModel {
    linked_identities::ActiveModel {
        id: Set(identity.id),
        account_id: Set(identity.account_id),
        provider: Set(identity.provider.as_str().to_owned()),
        subject: Set(identity.subject.clone()),
        email: Set(identity.email.clone()),
        display_name: Set(identity.display_name.clone()),
        photo_url: Set(identity.photo_url.clone()),
        created_at: Set(identity.created_at),
    }
}

fn identity_from_model(
    model: linked_identities::Model,
) -> Result<LinkedIdentity, AuthServiceError> {
    let provider = Provider::from_str_opt(&model.provider).ok_or_else(|| {
        AuthServiceError::Internal(anyhow::anyhow!(
            "unknown provider {:?} on linked identity {}",
            model.provider,
            model.id
        ))
    })?;
    Ok(LinkedIdentity {
        id: model.id,
        account_id: model.account_id,
        provider,
        subject: model.subject,
        email: model.email,
        display_name: model.display_name,
        photo_url: model.photo_url,
        created_at: model.created_at,
    })
}

// ── Session repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSessionRepository {
    pub db: DatabaseConnection,
}

impl SessionRepository for DbSessionRepository {
    async fn create(&self, session: &Session) -> Result<(), AuthServiceError> {
        session_active_model(session)
            .insert(&self.db)
            .await
            .context("create session")?;
        Ok(())
    }

    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<Session>, AuthServiceError> {
        let model = sessions::Entity::find()
            .filter(sessions::Column::RefreshTokenHash.eq(token_hash))
            .one(&self.db)
            .await
            .context("find session by token hash")?;
        Ok(model.map(session_from_model))
    }

    async fn rotate(
        &self,
        old_id: Uuid,
        replacement: &Session,
    ) -> Result<bool, AuthServiceError> {
        // The CAS on `revoked_at IS NULL` is what makes a refresh token
        // single-use across concurrent redemptions and server instances.
        let rotated = self
            .db
            .transaction::<_, bool, sea_orm::DbErr>(|txn| {
                let replacement = replacement.clone();
                Box::pin(async move {
                    let now = Utc::now();
                    let result = sessions::Entity::update_many()
                        .col_expr(sessions::Column::RevokedAt, Expr::value(now))
                        .filter(sessions::Column::Id.eq(old_id))
                        .filter(sessions::Column::RevokedAt.is_null())
                        .exec(txn)
                        .await?;
                    if result.rows_affected == 0 {
                        return Ok(false);
                    }
                    session_active_model(&replacement).insert(txn).await?;
                    Ok(true)
                })
            })
            .await
            .context("rotate session")?;
        Ok(rotated)
    }

    async fn revoke(&self, session_id: Uuid, account_id: Uuid) -> Result<(), AuthServiceError> {
        let now = Utc::now();
        sessions::Entity::update_many()
            .col_expr(sessions::Column::RevokedAt, Expr::value(now))
            .filter(sessions::Column::Id.eq(session_id))
            .filter(sessions::Column::AccountId.eq(account_id))
            .filter(sessions::Column::RevokedAt.is_null())
            .exec(&self.db)
            .await
            .context("revoke session")?;
        Ok(())
    }

    async fn revoke_all_for_account(&self, account_id: Uuid) -> Result<u64, AuthServiceError> {
        let now = Utc::now();
        let result = sessions::Entity::update_many()
            .col_expr(sessions::Column::RevokedAt, Expr::value(now))
            .filter(sessions::Column::AccountId.eq(account_id))
            .filter(sessions::Column::RevokedAt.is_null())
            .exec(&self.db)
            .await
            .context("revoke all sessions for account")?;
        Ok(result.rows_affected)
    }
}

fn session_active_model(session: &Session) -> sessions::ActiveModel {
    sessions::ActiveModel {
        id: Set(session.id),
        account_id: Set(session.account_id),
        refresh_token_hash: Set(session.refresh_token_hash.clone()),
        issued_at: Set(session.issued_at),
        expires_at: Set(session.expires_at),
        revoked_at: Set(session.revoked_at),
    }
}

fn session_from_model(model: sessions::Model) -> Session {
    Session {
        id: model.id,
        account_id: model.account_id,
        refresh_token_hash: model.refresh_token_hash,
        issued_at: model.issued_at,
        expires_at: model.expires_at,
        revoked_at: model.revoked_at,
    }
}

// ── PasswordResetTicket repository ────────────────────────────────────────────

#[derive(Clone)]
pub struct DbResetTicketRepository {
    pub db: DatabaseConnection,
}

impl ResetTicketRepository for DbResetTicketRepository {
    async fn create_with_outbox(
        &self,
        ticket: &PasswordResetTicket,
        event: &OutboxEvent,
    ) -> Result<(), AuthServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let ticket = ticket.clone();
                let event = event.clone();
                Box::pin(async move {
                    insert_reset_ticket(txn, &ticket).await?;
                    insert_outbox_event(txn, &event).await?;
                    Ok(())
                })
            })
            .await
            .context("create reset ticket with outbox")?;
        Ok(())
    }

    async fn find_valid(
        &self,
        token_hash: &str,
    ) -> Result<Option<PasswordResetTicket>, AuthServiceError> {
        let now = Utc::now();
        let model = password_reset_tickets::Entity::find()
            .filter(password_reset_tickets::Column::TokenHash.eq(token_hash))
            .filter(password_reset_tickets::Column::ConsumedAt.is_null())
            .filter(password_reset_tickets::Column::ExpiresAt.gt(now))
            .one(&self.db)
            .await
            .context("find valid reset ticket")?;
        Ok(model.map(ticket_from_model))
    }

    async fn consume_and_reset_password(
        &self,
        ticket_id: Uuid,
        account_id: Uuid,
        new_password_hash: &str,
    ) -> Result<bool, AuthServiceError> {
        let new_password_hash = new_password_hash.to_owned();
        let consumed = self
            .db
            .transaction::<_, bool, sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    let now = Utc::now();
                    // CAS on the ticket: the first request wins, any racer
                    // sees rows_affected == 0 and rolls back.
                    let result = password_reset_tickets::Entity::update_many()
                        .col_expr(password_reset_tickets::Column::ConsumedAt, Expr::value(now))
                        .filter(password_reset_tickets::Column::Id.eq(ticket_id))
                        .filter(password_reset_tickets::Column::ConsumedAt.is_null())
                        .filter(password_reset_tickets::Column::ExpiresAt.gt(now))
                        .exec(txn)
                        .await?;
                    if result.rows_affected == 0 {
                        return Ok(false);
                    }

                    accounts::ActiveModel {
                        id: Set(account_id),
                        password_hash: Set(Some(new_password_hash)),
                        updated_at: Set(now),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;

                    // Force re-authentication everywhere.
                    sessions::Entity::update_many()
                        .col_expr(sessions::Column::RevokedAt, Expr::value(now))
                        .filter(sessions::Column::AccountId.eq(account_id))
                        .filter(sessions::Column::RevokedAt.is_null())
                        .exec(txn)
                        .await?;

                    Ok(true)
                })
            })
            .await
            .context("consume reset ticket and reset password")?;
        Ok(consumed)
    }
}

async fn insert_reset_ticket(
    txn: &DatabaseTransaction,
    ticket: &PasswordResetTicket,
) -> Result<(), sea_orm::DbErr> {
    password_reset_tickets::ActiveModel {
        id: Set(ticket.id),
        account_id: Set(ticket.account_id),
        token_hash: Set(ticket.token_hash.clone()),
        expires_at: Set(ticket.expires_at),
        consumed_at: Set(None),
        created_at: Set(ticket.created_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

async fn insert_outbox_event(
    txn: &DatabaseTransaction,
    event: &OutboxEvent,
) -> Result<(), sea_orm::DbErr> {
    let now = Utc::now();
    outbox_events::ActiveModel {
        id: Set(event.id),
        kind: Set(event.kind.clone()),
        payload: Set(event.payload.clone()),
        idempotency_key: Set(event.idempotency_key.clone()),
        attempts: Set(0),
        last_error: Set(None),
        created_at: Set(now),
        next_attempt_at: Set(now),
        processed_at: Set(None),
        failed_at: Set(None),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn ticket_from_model(model: password_reset_tickets::Model) -> PasswordResetTicket {
    PasswordResetTicket {
        id: model.id,
        account_id: model.account_id,
        token_hash: model.token_hash,
        expires_at: model.expires_at,
        consumed_at: model.consumed_at,
        created_at: model.created_at,
    }
}
