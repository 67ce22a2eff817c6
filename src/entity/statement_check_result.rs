//! StatementCheckResult entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "statement_check_results")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub audit_id: Uuid,
    /// NULL for custom statement issues
    pub statement_check_id: Option<Uuid>,
    pub check_type: String,
    /// yes, no, not-tested
    pub state: String,
    pub report_comment: String,
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
        belongs_to = "super::statement_check::Entity",
        from = "Column::StatementCheckId",
        to = "super::statement_check::Column::Id",
        on_delete = "Restrict"
    )]
    StatementCheck,
}

impl Related<super::audit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Audit.def()
    }
}

impl Related<super::statement_check::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StatementCheck.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
