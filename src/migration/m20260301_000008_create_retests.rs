//! Migration: Create retests table.

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
                    .table(Retests::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Retests::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Retests::CaseId).uuid().not_null())
                    .col(ColumnDef::new(Retests::Sequence).integer().not_null())
                    .col(ColumnDef::new(Retests::DateOfRetest).date())
                    .col(
                        ColumnDef::new(Retests::StatementCompliance)
                            .string_len(30)
                            .not_null()
                            .default("unknown"),
                    )
                    .col(
                        ColumnDef::new(Retests::DisproportionateBurden)
                            .string_len(30)
                            .not_null()
                            .default("not-checked"),
                    )
                    .col(ColumnDef::new(Retests::Notes).text().not_null().default(""))
                    .col(ColumnDef::new(Retests::Version).integer().not_null().default(0))
                    .col(ColumnDef::new(Retests::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Retests::UpdatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Retests::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_retests_case_id")
                            .from(Retests::Table, Retests::CaseId)
                            .to(Cases::Table, Cases::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_retests_case_sequence")
                    .table(Retests::Table)
                    .col(Retests::CaseId)
                    .col(Retests::Sequence)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_retests_live_case \
                 ON retests (case_id) WHERE deleted_at IS NULL",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Retests::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(super) enum Retests {
    Table,
    Id,
    CaseId,
    Sequence,
    DateOfRetest,
    StatementCompliance,
    DisproportionateBurden,
    Notes,
    Version,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
