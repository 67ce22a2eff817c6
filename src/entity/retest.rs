//! Retest entity for SeaORM.
//!
//! A snapshot of an audit's failing results, taken to track remediation.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "retests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub case_id: Uuid,
    /// 1-based position among every retest created for the case
    pub sequence: i32,
    pub date_of_retest: Option<Date>,
    /// compliant, not-compliant, unknown
    pub statement_compliance: String,
    /// no-assessment, assessment, no-claim, not-checked
    pub disproportionate_burden: String,
    pub notes: String,
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
    #[sea_orm(has_many = "super::retest_page::Entity")]
    RetestPages,
    #[sea_orm(has_many = "super::retest_check_result::Entity")]
    RetestCheckResults,
    #[sea_orm(has_many = "super::retest_statement_check_result::Entity")]
    RetestStatementCheckResults,
}

impl Related<super::case::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Case.def()
    }
}

impl Related<super::retest_page::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RetestPages.def()
    }
}

impl Related<super::retest_check_result::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RetestCheckResults.def()
    }
}

impl Related<super::retest_statement_check_result::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RetestStatementCheckResults.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
