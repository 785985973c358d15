use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Admin listings filter on (role, created_by) and sort on created_at.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_users_profile_role_created_by")
                    .table(Alias::new("users_profile"))
                    .col(Alias::new("role"))
                    .col(Alias::new("created_by"))
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_profile_created_at")
                    .table(Alias::new("users_profile"))
                    .col(Alias::new("created_at"))
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_users_profile_created_at")
                    .table(Alias::new("users_profile"))
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_users_profile_role_created_by")
                    .table(Alias::new("users_profile"))
                    .to_owned(),
            )
            .await
    }
}
