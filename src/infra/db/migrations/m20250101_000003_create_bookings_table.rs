//! Migration: Create bookings table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Bookings::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Bookings::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(Bookings::TotalAmount)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::Address).text().not_null())
                    .col(ColumnDef::new(Bookings::Date).string_len(32).not_null())
                    .col(ColumnDef::new(Bookings::Time).string_len(32).not_null())
                    .col(ColumnDef::new(Bookings::Mobile).string_len(10).not_null())
                    .col(
                        ColumnDef::new(Bookings::Instructions)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Bookings::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Bookings::PaymentStatus)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Bookings::Rating).small_integer().null())
                    .col(ColumnDef::new(Bookings::Review).text().null())
                    .col(
                        ColumnDef::new(Bookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_user")
                            .from(Bookings::Table, Bookings::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // "My bookings" lists by owner, newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_user_created")
                    .table(Bookings::Table)
                    .col(Bookings::UserId)
                    .col(Bookings::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Bookings {
    Table,
    Id,
    UserId,
    TotalAmount,
    Address,
    Date,
    Time,
    Mobile,
    Instructions,
    Status,
    PaymentStatus,
    Rating,
    Review,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
