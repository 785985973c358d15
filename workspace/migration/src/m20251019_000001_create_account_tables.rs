use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create credentials table
        manager
            .create_table(
                Table::create()
                    .table(Credentials::Table)
                    .if_not_exists()
                    .col(string(Credentials::Id).primary_key())
                    .col(string(Credentials::Email).unique_key())
                    .col(string(Credentials::PasswordHash))
                    .col(timestamp_with_time_zone(Credentials::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // Create users_profile table
        manager
            .create_table(
                Table::create()
                    .table(UsersProfile::Table)
                    .if_not_exists()
                    .col(string(UsersProfile::Id).primary_key())
                    .col(string(UsersProfile::Fullname))
                    .col(string_len(UsersProfile::Role, 20).default("CASHIER"))
                    .col(string_null(UsersProfile::CreatedBy))
                    .col(timestamp_with_time_zone(UsersProfile::CreatedAt))
                    .col(boolean(UsersProfile::IsActive).default(true))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_profile_credential")
                            .from(UsersProfile::Table, UsersProfile::Id)
                            .to(Credentials::Table, Credentials::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_profile_created_by")
                            .from(UsersProfile::Table, UsersProfile::CreatedBy)
                            .to(UsersProfile::Table, UsersProfile::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UsersProfile::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Credentials::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Credentials {
    Table,
    Id,
    Email,
    PasswordHash,
    CreatedAt,
}

#[derive(DeriveIden)]
enum UsersProfile {
    Table,
    Id,
    Fullname,
    Role,
    CreatedBy,
    CreatedAt,
    IsActive,
}
