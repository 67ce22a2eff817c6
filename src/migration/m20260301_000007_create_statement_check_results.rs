//! Migration: Create statement_check_results table.
//!
//! Custom issues carry a NULL statement_check_id, which the unique index
//! treats as distinct.

use sea_orm_migration::prelude::*;

use super::m20260301_000002_create_audits::Audits;
use super::m20260301_000006_create_statement_checks::StatementChecks;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StatementCheckResults::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StatementCheckResults::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StatementCheckResults::AuditId).uuid().not_null())
                    .col(ColumnDef::new(StatementCheckResults::StatementCheckId).uuid())
                    .col(
                        ColumnDef::new(StatementCheckResults::CheckType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StatementCheckResults::State)
                            .string_len(20)
                            .not_null()
                            .default("not-tested"),
                    )
                    .col(
                        ColumnDef::new(StatementCheckResults::ReportComment)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(StatementCheckResults::Version)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(StatementCheckResults::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StatementCheckResults::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StatementCheckResults::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_statement_check_results_audit_id")
                            .from(StatementCheckResults::Table, StatementCheckResults::AuditId)
                            .to(Audits::Table, Audits::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_statement_check_results_statement_check_id")
                            .from(
                                StatementCheckResults::Table,
                                StatementCheckResults::StatementCheckId,
                            )
                            .to(StatementChecks::Table, StatementChecks::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_statement_check_results_audit_check")
                    .table(StatementCheckResults::Table)
                    .col(StatementCheckResults::AuditId)
                    .col(StatementCheckResults::StatementCheckId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StatementCheckResults::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(super) enum StatementCheckResults {
    Table,
    Id,
    AuditId,
    StatementCheckId,
    CheckType,
    State,
    ReportComment,
    Version,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
