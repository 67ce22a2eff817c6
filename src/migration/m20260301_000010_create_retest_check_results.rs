//! Migration: Create retest_check_results table.

use sea_orm_migration::prelude::*;

use super::m20260301_000005_create_check_results::CheckResults;
use super::m20260301_000008_create_retests::Retests;
use super::m20260301_000009_create_retest_pages::RetestPages;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RetestCheckResults::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RetestCheckResults::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RetestCheckResults::RetestId).uuid().not_null())
                    .col(ColumnDef::new(RetestCheckResults::RetestPageId).uuid().not_null())
                    .col(ColumnDef::new(RetestCheckResults::CheckResultId).uuid().not_null())
                    .col(ColumnDef::new(RetestCheckResults::WcagDefinitionId).uuid().not_null())
                    .col(ColumnDef::new(RetestCheckResults::TestType).string_len(10).not_null())
                    .col(
                        ColumnDef::new(RetestCheckResults::Outcome)
                            .string_len(20)
                            .not_null()
                            .default("not-retested"),
                    )
                    .col(
                        ColumnDef::new(RetestCheckResults::RetestNotes)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(RetestCheckResults::Version)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(RetestCheckResults::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RetestCheckResults::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RetestCheckResults::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_retest_check_results_retest_id")
                            .from(RetestCheckResults::Table, RetestCheckResults::RetestId)
                            .to(Retests::Table, Retests::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_retest_check_results_retest_page_id")
                            .from(RetestCheckResults::Table, RetestCheckResults::RetestPageId)
                            .to(RetestPages::Table, RetestPages::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_retest_check_results_check_result_id")
                            .from(RetestCheckResults::Table, RetestCheckResults::CheckResultId)
                            .to(CheckResults::Table, CheckResults::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_retest_check_results_retest_check")
                    .table(RetestCheckResults::Table)
                    .col(RetestCheckResults::RetestId)
                    .col(RetestCheckResults::CheckResultId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RetestCheckResults::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(super) enum RetestCheckResults {
    Table,
    Id,
    RetestId,
    RetestPageId,
    CheckResultId,
    WcagDefinitionId,
    TestType,
    Outcome,
    RetestNotes,
    Version,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
