//! Migration: Create pages table.

use sea_orm_migration::prelude::*;

use super::m20260301_000002_create_audits::Audits;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Pages::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Pages::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Pages::AuditId).uuid().not_null())
                    .col(ColumnDef::new(Pages::PageType).string_len(20).not_null())
                    .col(ColumnDef::new(Pages::Name).string().not_null().default(""))
                    .col(ColumnDef::new(Pages::Url).string_len(2048).not_null().default(""))
                    .col(ColumnDef::new(Pages::NotFound).boolean().not_null().default(false))
                    .col(ColumnDef::new(Pages::CompleteDate).date())
                    .col(ColumnDef::new(Pages::Version).integer().not_null().default(0))
                    .col(ColumnDef::new(Pages::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Pages::UpdatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Pages::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pages_audit_id")
                            .from(Pages::Table, Pages::AuditId)
                            .to(Audits::Table, Audits::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pages_audit_id")
                    .table(Pages::Table)
                    .col(Pages::AuditId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Pages::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(super) enum Pages {
    Table,
    Id,
    AuditId,
    PageType,
    Name,
    Url,
    NotFound,
    CompleteDate,
    Version,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
