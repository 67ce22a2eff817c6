//! Migration: Create retest_pages table.

use sea_orm_migration::prelude::*;

use super::m20260301_000003_create_pages::Pages;
use super::m20260301_000008_create_retests::Retests;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RetestPages::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RetestPages::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(RetestPages::RetestId).uuid().not_null())
                    .col(ColumnDef::new(RetestPages::PageId).uuid().not_null())
                    .col(ColumnDef::new(RetestPages::PageType).string_len(20).not_null())
                    .col(ColumnDef::new(RetestPages::Name).string().not_null().default(""))
                    .col(ColumnDef::new(RetestPages::Url).string_len(2048).not_null().default(""))
                    .col(ColumnDef::new(RetestPages::MissingDate).date())
                    .col(
                        ColumnDef::new(RetestPages::AdditionalIssuesNotes)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(RetestPages::Version).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(RetestPages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RetestPages::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RetestPages::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_retest_pages_retest_id")
                            .from(RetestPages::Table, RetestPages::RetestId)
                            .to(Retests::Table, Retests::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_retest_pages_page_id")
                            .from(RetestPages::Table, RetestPages::PageId)
                            .to(Pages::Table, Pages::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_retest_pages_retest_page")
                    .table(RetestPages::Table)
                    .col(RetestPages::RetestId)
                    .col(RetestPages::PageId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RetestPages::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(super) enum RetestPages {
    Table,
    Id,
    RetestId,
    PageId,
    PageType,
    Name,
    Url,
    MissingDate,
    AdditionalIssuesNotes,
    Version,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
