//! RetestCheckResult entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "retest_check_results")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub retest_id: Uuid,
    pub retest_page_id: Uuid,
    pub check_result_id: Uuid,
    pub wcag_definition_id: Uuid,
    pub test_type: String,
    /// not-retested, fixed, not-fixed
    pub outcome: String,
    pub retest_notes: String,
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
        belongs_to = "super::retest_page::Entity",
        from = "Column::RetestPageId",
        to = "super::retest_page::Column::Id",
        on_delete = "Restrict"
    )]
    RetestPage,
    #[sea_orm(
        belongs_to = "super::check_result::Entity",
        from = "Column::CheckResultId",
        to = "super::check_result::Column::Id",
        on_delete = "Restrict"
    )]
    CheckResult,
}

impl Related<super::retest::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Retest.def()
    }
}

impl Related<super::retest_page::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RetestPage.def()
    }
}

impl Related<super::check_result::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CheckResult.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
