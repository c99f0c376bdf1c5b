//! Create spots table
//!
//! Status is stored as its integer code (1 AVAILABLE .. 4 UNAVAILABLE).
//! The coordinate index backs the bounding-rectangle lookup.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_lots::Lots;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Spots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Spots::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Spots::LotId).integer().not_null())
                    .col(ColumnDef::new(Spots::Latitude).double().not_null())
                    .col(ColumnDef::new(Spots::Longitude).double().not_null())
                    .col(
                        ColumnDef::new(Spots::Status)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Spots::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Spots::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_spots_lot")
                            .from(Spots::Table, Spots::LotId)
                            .to(Lots::Table, Lots::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_spots_lot")
                    .table(Spots::Table)
                    .col(Spots::LotId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_spots_coordinates")
                    .table(Spots::Table)
                    .col(Spots::Latitude)
                    .col(Spots::Longitude)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Spots::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Spots {
    Table,
    Id,
    LotId,
    Latitude,
    Longitude,
    Status,
    CreatedAt,
    UpdatedAt,
}
