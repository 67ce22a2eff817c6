//! RetestStatementCheckResult entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "retest_statement_check_results")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub retest_id: Uuid,
    pub statement_check_result_id: Uuid,
    pub statement_check_id: Option<Uuid>,
    pub check_type: String,
    /// Comment copied from the initial test result
    pub comment: String,
    /// not-retested, fixed, not-fixed
    pub outcome: String,
    pub retest_comment: String,
    pub version: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::retest::Entity",
        from = "Column::RetestId",
        to = "super::retest::Column::Id",
        on_delete = "Restrict"
    )]
    Retest,
    #[sea_orm(
        belongs_to = "super::statement_check_result::Entity",
        from = "Column::StatementCheckResultId",
        to = "super::statement_check_result::Column::Id",
        on_delete = "Restrict"
    )]
    StatementCheckResult,
}

impl Related<super::retest::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Retest.def()
    }
}

impl Related<super::statement_check_result::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StatementCheckResult.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
