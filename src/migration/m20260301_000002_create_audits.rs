//! Migration: Create audits table.
//!
//! A partial unique index keeps at most one live audit per case.

use sea_orm_migration::prelude::*;

use super::m20260301_000001_create_cases::Cases;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Audits::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Audits::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Audits::CaseId).uuid().not_null())
                    .col(ColumnDef::new(Audits::DateOfTest).date())
                    .col(
                        ColumnDef::new(Audits::ScreenSize)
                            .string_len(10)
                            .not_null()
                            .default("15in"),
                    )
                    .col(
                        ColumnDef::new(Audits::Exemptions)
                            .string_len(10)
                            .not_null()
                            .default("unknown"),
                    )
                    .col(ColumnDef::new(Audits::Description).text().not_null().default(""))
                    .col(ColumnDef::new(Audits::Notes).text().not_null().default(""))
                    .col(
                        ColumnDef::new(Audits::DisproportionateBurden)
                            .string_len(30)
                            .not_null()
                            .default("not-checked"),
                    )
                    .col(
                        ColumnDef::new(Audits::DisproportionateBurdenNotes)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Audits::StatementCompliance)
                            .string_len(30)
                            .not_null()
                            .default("unknown"),
                    )
                    .col(
                        ColumnDef::new(Audits::StatementComplianceNotes)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Audits::NextPageId).uuid())
                    .col(ColumnDef::new(Audits::CompletedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Audits::Version).integer().not_null().default(0))
                    .col(ColumnDef::new(Audits::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Audits::UpdatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Audits::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_audits_case_id")
                            .from(Audits::Table, Audits::CaseId)
                            .to(Cases::Table, Cases::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_audits_case_id")
                    .table(Audits::Table)
                    .col(Audits::CaseId)
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_audits_live_case \
                 ON audits (case_id) WHERE deleted_at IS NULL",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Audits::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(super) enum Audits {
    Table,
    Id,
    CaseId,
    DateOfTest,
    ScreenSize,
    Exemptions,
    Description,
    Notes,
    DisproportionateBurden,
    DisproportionateBurdenNotes,
    StatementCompliance,
    StatementComplianceNotes,
    NextPageId,
    CompletedAt,
    Version,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
