//! Case entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cases")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organisation_name: String,
    pub home_page_url: String,
    pub domain: String,
    /// Workflow stage, see `models::CaseStatus`
    pub status: String,
    pub auditor: Option<String>,
    pub reviewer: Option<String>,
    /// compliant, partially-compliant, not-compliant, unknown
    pub website_compliance: String,
    /// compliant, not-compliant, unknown
    pub statement_compliance: String,
    pub compliance_notes: String,
    pub version: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::audit::Entity")]
    Audits,
    #[sea_orm(has_many = "super::retest::Entity")]
    Retests,
}

impl Related<super::audit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Audits.def()
    }
}

impl Related<super::retest::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Retests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
