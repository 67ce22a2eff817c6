//! RetestPage entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "retest_pages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub retest_id: Uuid,
    pub page_id: Uuid,
    pub page_type: String,
    pub name: String,
    pub url: String,
    /// Set once the page can no longer be found on the website
    pub missing_date: Option<Date>,
    pub additional_issues_notes: String,
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
        belongs_to = "super::page::Entity",
        from = "Column::PageId",
        to = "super::page::Column::Id",
        on_delete = "Restrict"
    )]
    Page,
    #[sea_orm(has_many = "super::retest_check_result::Entity")]
    RetestCheckResults,
}

impl Related<super::retest::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Retest.def()
    }
}

impl Related<super::page::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Page.def()
    }
}

impl Related<super::retest_check_result::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RetestCheckResults.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
