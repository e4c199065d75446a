use sea_orm_migration::prelude::*;

mod m20260801_000001_create_accounts;
mod m20260801_000002_create_linked_identities;
mod m20260801_000003_create_sessions;
mod m20260801_000004_create_password_reset_tickets;
mod m20260801_000005_create_outbox_events;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260801_000001_create_accounts::Migration),
            Box::new(m20260801_000002_create_linked_identities::Migration),
            Box::new(m20260801_000003_create_sessions::Migration),
            Box::new(m20260801_000004_create_password_reset_tickets::Migration),
            Box::new(m20260801_000005_create_outbox_events::Migration),
        ]
    }
}
