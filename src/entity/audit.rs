//! Audit entity for SeaORM.
//!
//! One round of accessibility testing against a case.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "audits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub case_id: Uuid,
    pub date_of_test: Option<Date>,
    /// 15in or 13in
    pub screen_size: String,
    /// yes, no, unknown
    pub exemptions: String,
    pub description: String,
    pub notes: String,
    /// no-assessment, assessment, no-claim, not-checked
    pub disproportionate_burden: String,
    pub disproportionate_burden_notes: String,
    /// compliant, not-compliant, unknown
    pub statement_compliance: String,
    pub statement_compliance_notes: String,
    /// Wizard cursor. Not covered by `version`.
    pub next_page_id: Option<Uuid>,
    pub completed_at: Option<DateTimeUtc>,
    pub version: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::case::Entity",
        from = "Column::CaseId",
        to = "super::case::Column::Id",
        on_delete = "Restrict"
    )]
    Case,
    #[sea_orm(has_many = "super::page::Entity")]
    Pages,
    #[sea_orm(has_many = "super::check_result::Entity")]
    CheckResults,
    #[sea_orm(has_many = "super::statement_check_result::Entity")]
    StatementCheckResults,
}

impl Related<super::case::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Case.def()
    }
}

impl Related<super::page::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pages.def()
    }
}

impl Related<super::check_result::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CheckResults.def()
    }
}

impl Related<super::statement_check_result::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StatementCheckResults.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
