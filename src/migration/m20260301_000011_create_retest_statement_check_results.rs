//! Migration: Create retest_statement_check_results table.

use sea_orm_migration::prelude::*;

use super::m20260301_000007_create_statement_check_results::StatementCheckResults;
use super::m20260301_000008_create_retests::Retests;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RetestStatementCheckResults::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RetestStatementCheckResults::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RetestStatementCheckResults::RetestId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RetestStatementCheckResults::StatementCheckResultId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RetestStatementCheckResults::StatementCheckId).uuid())
                    .col(
                        ColumnDef::new(RetestStatementCheckResults::CheckType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RetestStatementCheckResults::Comment)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(RetestStatementCheckResults::Outcome)
                            .string_len(20)
                            .not_null()
                            .default("not-retested"),
                    )
                    .col(
                        ColumnDef::new(RetestStatementCheckResults::RetestComment)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(RetestStatementCheckResults::Version)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(RetestStatementCheckResults::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RetestStatementCheckResults::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RetestStatementCheckResults::DeletedAt)
                            .timestamp_with_time_zone(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_retest_statement_check_results_retest_id")
                            .from(
                                RetestStatementCheckResults::Table,
                                RetestStatementCheckResults::RetestId,
                            )
                            .to(Retests::Table, Retests::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_retest_statement_check_results_result_id")
                            .from(
                                RetestStatementCheckResults::Table,
                                RetestStatementCheckResults::StatementCheckResultId,
                            )
                            .to(StatementCheckResults::Table, StatementCheckResults::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(RetestStatementCheckResults::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum RetestStatementCheckResults {
    Table,
    Id,
    RetestId,
    StatementCheckResultId,
    StatementCheckId,
    CheckType,
    Comment,
    Outcome,
    RetestComment,
    Version,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
