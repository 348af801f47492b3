//! Migration: Create services (catalog) table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Services::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Services::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Services::Name).string().not_null())
                    .col(ColumnDef::new(Services::Description).text().not_null())
                    .col(ColumnDef::new(Services::Price).decimal_len(12, 2).not_null())
                    .col(ColumnDef::new(Services::ServiceType).string_len(32).not_null())
                    .col(ColumnDef::new(Services::Provider).string().not_null())
                    .col(ColumnDef::new(Services::Duration).integer().not_null())
                    .col(ColumnDef::new(Services::Image).string().not_null())
                    .col(
                        ColumnDef::new(Services::Rating)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Services::ReviewCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Services::Available)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Services::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Services::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Listing always filters on availability and usually on category
        manager
            .create_index(
                Index::create()
                    .name("idx_services_available_type")
                    .table(Services::Table)
                    .col(Services::Available)
                    .col(Services::ServiceType)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Services::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Services {
    Table,
    Id,
    Name,
    Description,
    Price,
    ServiceType,
    Provider,
    Duration,
    Image,
    Rating,
    ReviewCount,
    Available,
    CreatedAt,
    UpdatedAt,
}
