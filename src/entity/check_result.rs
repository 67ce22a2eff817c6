//! CheckResult entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "check_results")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub audit_id: Uuid,
    pub page_id: Uuid,
    pub wcag_definition_id: Uuid,
    /// Copy of the definition's test type, used for filtering without a join
    pub test_type: String,
    pub failed: bool,
    pub notes: String,
    pub version: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::audit::Entity",
        from = "Column::AuditId",
        to = "super::audit::Column::Id",
        on_delete = "Restrict"
    )]
    Audit,
    #[sea_orm(
        belongs_to = "super::page::Entity",
        from = "Column::PageId",
        to = "super::page::Column::Id",
        on_delete = "Restrict"
    )]
    Page,
    #[sea_orm(
        belongs_to = "super::wcag_definition::Entity",
        from = "Column::WcagDefinitionId",
        to = "super::wcag_definition::Column::Id",
        on_delete = "Restrict"
    )]
    WcagDefinition,
}

impl Related<super::audit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Audit.def()
    }
}

impl Related<super::page::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Page.def()
    }
}

impl Related<super::wcag_definition::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WcagDefinition.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
