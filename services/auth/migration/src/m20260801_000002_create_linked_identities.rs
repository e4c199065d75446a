use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LinkedIdentities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LinkedIdentities::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LinkedIdentities::AccountId).uuid().not_null())
                    .col(
                        ColumnDef::new(LinkedIdentities::Provider)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LinkedIdentities::Subject).string().not_null())
                    .col(ColumnDef::new(LinkedIdentities::Email).string().not_null())
                    .col(ColumnDef::new(LinkedIdentities::DisplayName).string())
                    .col(ColumnDef::new(LinkedIdentities::PhotoUrl).string())
                    .col(
                        ColumnDef::new(LinkedIdentities::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(LinkedIdentities::Table, LinkedIdentities::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One identity per (provider, subject) across all accounts.
        manager
            .create_index(
                Index::create()
                    .table(LinkedIdentities::Table)
                    .col(LinkedIdentities::Provider)
                    .col(LinkedIdentities::Subject)
                    .unique()
                    .name("idx_linked_identities_provider_subject")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(LinkedIdentities::Table)
                    .col(LinkedIdentities::AccountId)
                    .name("idx_linked_identities_account_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LinkedIdentities::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum LinkedIdentities {
    Table,
    Id,
    AccountId,
    Provider,
    Subject,
    Email,
    DisplayName,
    PhotoUrl,
    CreatedAt,
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
}
