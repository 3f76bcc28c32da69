//! Create `restaurant` table with FK to `user`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Restaurant::Table)
                    .if_not_exists()
                    .col(pk_auto(Restaurant::Id))
                    .col(string_len(Restaurant::Name, 100))
                    .col(string_len(Restaurant::Description, 1000).default(""))
                    .col(string_len(Restaurant::Address, 200))
                    .col(string_len(Restaurant::Phone, 20).default(""))
                    .col(integer(Restaurant::UserId))
                    .col(timestamp_with_time_zone(Restaurant::CreatedAt))
                    .col(timestamp_with_time_zone(Restaurant::UpdatedAt))
                    .col(
                        ColumnDef::new(Restaurant::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_restaurant_user")
                            .from(Restaurant::Table, Restaurant::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Restaurant::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Restaurant { Table, Id, Name, Description, Address, Phone, UserId, CreatedAt, UpdatedAt, DeletedAt }

#[derive(DeriveIden)]
enum User { Table, Id }
