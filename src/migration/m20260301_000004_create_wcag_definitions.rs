//! Migration: Create wcag_definitions table.
//!
//! Reference data maintained by administrators; rows are never deleted.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WcagDefinitions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WcagDefinitions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WcagDefinitions::TestType).string_len(10).not_null())
                    .col(
                        ColumnDef::new(WcagDefinitions::SubType)
                            .string_len(20)
                            .not_null()
                            .default("other"),
                    )
                    .col(ColumnDef::new(WcagDefinitions::Name).string().not_null())
                    .col(
                        ColumnDef::new(WcagDefinitions::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(WcagDefinitions::Url).string().not_null().default(""))
                    .col(ColumnDef::new(WcagDefinitions::DateStart).date())
                    .col(ColumnDef::new(WcagDefinitions::DateEnd).date())
                    .col(
                        ColumnDef::new(WcagDefinitions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WcagDefinitions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(super) enum WcagDefinitions {
    Table,
    Id,
    TestType,
    SubType,
    Name,
    Description,
    Url,
    DateStart,
    DateEnd,
    CreatedAt,
}
