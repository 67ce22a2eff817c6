//! StatementCheck entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "statement_checks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// overview, website, compliance, non-accessible, preparation, feedback, custom
    pub check_type: String,
    pub label: String,
    pub success_criteria: String,
    pub report_text: String,
    pub position: i32,
    pub date_start: Option<Date>,
    pub date_end: Option<Date>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::statement_check_result::Entity")]
    StatementCheckResults,
}

impl Related<super::statement_check_result::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StatementCheckResults.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
