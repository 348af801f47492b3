//! Migration: Create booking_items table.
//!
//! `service_id` deliberately has no foreign key: removing a catalog entry
//! must not touch existing bookings.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BookingItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BookingItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BookingItems::BookingId).uuid().not_null())
                    .col(ColumnDef::new(BookingItems::Position).integer().not_null())
                    .col(ColumnDef::new(BookingItems::ServiceId).uuid().not_null())
                    .col(ColumnDef::new(BookingItems::Quantity).integer().not_null())
                    .col(
                        ColumnDef::new(BookingItems::Price)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_items_booking")
                            .from(BookingItems::Table, BookingItems::BookingId)
                            .to(Bookings::Table, Bookings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_booking_items_booking_position")
                    .table(BookingItems::Table)
                    .col(BookingItems::BookingId)
                    .col(BookingItems::Position)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BookingItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BookingItems {
    Table,
    Id,
    BookingId,
    Position,
    ServiceId,
    Quantity,
    Price,
}

#[derive(DeriveIden)]
enum Bookings {
    Table,
    Id,
}
