//! Migration: Create check_results table.
//!
//! The (page_id, wcag_definition_id) unique index backs the synchronizer's
//! no-duplicates guarantee; soft-deleted rows still occupy their slot.

use sea_orm_migration::prelude::*;

use super::m20260301_000002_create_audits::Audits;
use super::m20260301_000003_create_pages::Pages;
use super::m20260301_000004_create_wcag_definitions::WcagDefinitions;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CheckResults::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CheckResults::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(CheckResults::AuditId).uuid().not_null())
                    .col(ColumnDef::new(CheckResults::PageId).uuid().not_null())
                    .col(ColumnDef::new(CheckResults::WcagDefinitionId).uuid().not_null())
                    .col(ColumnDef::new(CheckResults::TestType).string_len(10).not_null())
                    .col(ColumnDef::new(CheckResults::Failed).boolean().not_null().default(false))
                    .col(ColumnDef::new(CheckResults::Notes).text().not_null().default(""))
                    .col(ColumnDef::new(CheckResults::Version).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(CheckResults::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CheckResults::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CheckResults::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_check_results_audit_id")
                            .from(CheckResults::Table, CheckResults::AuditId)
                            .to(Audits::Table, Audits::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_check_results_page_id")
                            .from(CheckResults::Table, CheckResults::PageId)
                            .to(Pages::Table, Pages::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_check_results_wcag_definition_id")
                            .from(CheckResults::Table, CheckResults::WcagDefinitionId)
                            .to(WcagDefinitions::Table, WcagDefinitions::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_check_results_page_definition")
                    .table(CheckResults::Table)
                    .col(CheckResults::PageId)
                    .col(CheckResults::WcagDefinitionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_check_results_audit_id")
                    .table(CheckResults::Table)
                    .col(CheckResults::AuditId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CheckResults::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(super) enum CheckResults {
    Table,
    Id,
    AuditId,
    PageId,
    WcagDefinitionId,
    TestType,
    Failed,
    Notes,
    Version,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
