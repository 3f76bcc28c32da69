use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Restaurant: owner lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_restaurant_user")
                    .table(Restaurant::Table)
                    .col(Restaurant::UserId)
                    .to_owned(),
            )
            .await?;

        // Soft-delete filters
        manager
            .create_index(
                Index::create()
                    .name("idx_restaurant_deleted_at")
                    .table(Restaurant::Table)
                    .col(Restaurant::DeletedAt)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_user_deleted_at")
                    .table(User::Table)
                    .col(User::DeletedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_restaurant_user").table(Restaurant::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_restaurant_deleted_at").table(Restaurant::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_user_deleted_at").table(User::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum User { Table, DeletedAt }

#[derive(DeriveIden)]
enum Restaurant { Table, UserId, DeletedAt }
