//! WcagDefinition entity for SeaORM.
//!
//! Reference data shared by every audit. Rows are edited in place, never deleted.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "wcag_definitions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// axe, manual, pdf
    pub test_type: String,
    pub sub_type: String,
    pub name: String,
    pub description: String,
    pub url: String,
    pub date_start: Option<Date>,
    pub date_end: Option<Date>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::check_result::Entity")]
    CheckResults,
}

impl Related<super::check_result::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CheckResults.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
