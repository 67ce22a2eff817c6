//! Migration: Create cases table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cases::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cases::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Cases::OrganisationName).string().not_null())
                    .col(ColumnDef::new(Cases::HomePageUrl).string().not_null())
                    .col(ColumnDef::new(Cases::Domain).string().not_null())
                    .col(
                        ColumnDef::new(Cases::Status)
                            .string_len(40)
                            .not_null()
                            .default("new-case"),
                    )
                    .col(ColumnDef::new(Cases::Auditor).string())
                    .col(ColumnDef::new(Cases::Reviewer).string())
                    .col(
                        ColumnDef::new(Cases::WebsiteCompliance)
                            .string_len(30)
                            .not_null()
                            .default("unknown"),
                    )
                    .col(
                        ColumnDef::new(Cases::StatementCompliance)
                            .string_len(30)
                            .not_null()
                            .default("unknown"),
                    )
                    .col(ColumnDef::new(Cases::ComplianceNotes).text().not_null().default(""))
                    .col(ColumnDef::new(Cases::Version).integer().not_null().default(0))
                    .col(ColumnDef::new(Cases::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Cases::UpdatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Cases::DeletedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cases::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(super) enum Cases {
    Table,
    Id,
    OrganisationName,
    HomePageUrl,
    Domain,
    Status,
    Auditor,
    Reviewer,
    WebsiteCompliance,
    StatementCompliance,
    ComplianceNotes,
    Version,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
