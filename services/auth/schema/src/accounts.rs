use sea_orm::entity::prelude::*;

/// Registered user account. `password_hash` is null for social-only accounts.
/// Email is stored normalized (trimmed, lowercased) and unique.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::linked_identities::Entity")]
    LinkedIdentities,
    #[sea_orm(has_many = "super::sessions::Entity")]
    Sessions,
    #[sea_orm(has_many = "super::password_reset_tickets::Entity")]
    PasswordResetTickets,
}

impl Related<super::linked_identities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LinkedIdentities.def()
    }
}

impl Related<super::sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl Related<super::password_reset_tickets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PasswordResetTickets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
