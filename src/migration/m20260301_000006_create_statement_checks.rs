//! Migration: Create statement_checks table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StatementChecks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StatementChecks::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StatementChecks::CheckType).string_len(20).not_null())
                    .col(ColumnDef::new(StatementChecks::Label).string().not_null())
                    .col(
                        ColumnDef::new(StatementChecks::SuccessCriteria)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(StatementChecks::ReportText)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(StatementChecks::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(StatementChecks::DateStart).date())
                    .col(ColumnDef::new(StatementChecks::DateEnd).date())
                    .col(
                        ColumnDef::new(StatementChecks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StatementChecks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(super) enum StatementChecks {
    Table,
    Id,
    CheckType,
    Label,
    SuccessCriteria,
    ReportText,
    Position,
    DateStart,
    DateEnd,
    CreatedAt,
}
