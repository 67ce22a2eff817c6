//! Database queries for audits.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entity::audit::{self, ActiveModel, Entity as Audit};
use crate::error::{AppError, AppResult, PreconditionFailure};
use crate::models::{
    AuditDecisionRequest, AuditMetadata, DisproportionateBurden, StatementCompliance,
};

use super::{check_swapped, is_unique_violation, next_version};

/// Insert a new audit for a case.
///
/// A second live audit for the case trips the partial unique index and is
/// reported as `AuditAlreadyExists`.
pub async fn insert_audit<C: ConnectionTrait>(
    conn: &C,
    case_id: Uuid,
    metadata: &AuditMetadata,
) -> AppResult<audit::Model> {
    let now = Utc::now();

    let model = ActiveModel {
        id: Set(Uuid::now_v7()),
        case_id: Set(case_id),
        date_of_test: Set(metadata.date_of_test),
        screen_size: Set(metadata.screen_size.as_str().to_string()),
        exemptions: Set(metadata.exemptions.as_str().to_string()),
        description: Set(metadata.description.clone()),
        notes: Set(metadata.notes.clone()),
        disproportionate_burden: Set(DisproportionateBurden::NotChecked.as_str().to_string()),
        disproportionate_burden_notes: Set(String::new()),
        statement_compliance: Set(StatementCompliance::Unknown.as_str().to_string()),
        statement_compliance_notes: Set(String::new()),
        next_page_id: Set(None),
        completed_at: Set(None),
        version: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    };

    model.insert(conn).await.map_err(|err| -> AppError {
        if is_unique_violation(&err) {
            tracing::warn!(case_id = %case_id, "Rejected second active audit");
            PreconditionFailure::AuditAlreadyExists(case_id).into()
        } else {
            err.into()
        }
    })
}

/// Get an audit by ID, whatever its lifecycle.
pub async fn find_audit<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<Option<audit::Model>> {
    Ok(Audit::find_by_id(id).one(conn).await?)
}

/// Get an active audit or fail with `NotFound`.
pub async fn get_active_audit<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<audit::Model> {
    find_audit(conn, id)
        .await?
        .filter(|a| a.deleted_at.is_none())
        .ok_or_else(|| AppError::NotFound(format!("Audit {}", id)))
}

/// The live audit of a case, if any.
pub async fn find_active_audit_for_case<C: ConnectionTrait>(
    conn: &C,
    case_id: Uuid,
) -> AppResult<Option<audit::Model>> {
    Ok(Audit::find()
        .filter(audit::Column::CaseId.eq(case_id))
        .filter(audit::Column::DeletedAt.is_null())
        .order_by_desc(audit::Column::CreatedAt)
        .one(conn)
        .await?)
}

/// Count live audits of a case.
pub async fn count_active_audits_for_case<C: ConnectionTrait>(
    conn: &C,
    case_id: Uuid,
) -> AppResult<u64> {
    Ok(Audit::find()
        .filter(audit::Column::CaseId.eq(case_id))
        .filter(audit::Column::DeletedAt.is_null())
        .count(conn)
        .await?)
}

/// Replace the test metadata if `expected_version` is still current.
pub async fn update_metadata<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    expected_version: i32,
    metadata: &AuditMetadata,
) -> AppResult<audit::Model> {
    get_active_audit(conn, id).await?;

    let result = Audit::update_many()
        .col_expr(audit::Column::DateOfTest, Expr::value(metadata.date_of_test))
        .col_expr(
            audit::Column::ScreenSize,
            Expr::value(metadata.screen_size.as_str()),
        )
        .col_expr(
            audit::Column::Exemptions,
            Expr::value(metadata.exemptions.as_str()),
        )
        .col_expr(
            audit::Column::Description,
            Expr::value(metadata.description.clone()),
        )
        .col_expr(audit::Column::Notes, Expr::value(metadata.notes.clone()))
        .col_expr(audit::Column::Version, Expr::value(next_version(expected_version)?))
        .col_expr(audit::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(audit::Column::Id.eq(id))
        .filter(audit::Column::Version.eq(expected_version))
        .filter(audit::Column::DeletedAt.is_null())
        .exec(conn)
        .await?;
    check_swapped(result.rows_affected, || format!("Audit {}", id))?;

    get_active_audit(conn, id).await
}

/// Record the initial statement decisions if `expected_version` is still current.
pub async fn update_decision<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    expected_version: i32,
    decision: &AuditDecisionRequest,
) -> AppResult<audit::Model> {
    get_active_audit(conn, id).await?;

    let mut update = Audit::update_many()
        .col_expr(audit::Column::Version, Expr::value(next_version(expected_version)?))
        .col_expr(audit::Column::UpdatedAt, Expr::value(Utc::now()));
    if let Some(burden) = decision.disproportionate_burden {
        update = update.col_expr(
            audit::Column::DisproportionateBurden,
            Expr::value(burden.as_str()),
        );
    }
    if let Some(notes) = &decision.disproportionate_burden_notes {
        update = update.col_expr(
            audit::Column::DisproportionateBurdenNotes,
            Expr::value(notes.clone()),
        );
    }
    if let Some(compliance) = decision.statement_compliance {
        update = update.col_expr(
            audit::Column::StatementCompliance,
            Expr::value(compliance.as_str()),
        );
    }
    if let Some(notes) = &decision.statement_compliance_notes {
        update = update.col_expr(
            audit::Column::StatementComplianceNotes,
            Expr::value(notes.clone()),
        );
    }

    let result = update
        .filter(audit::Column::Id.eq(id))
        .filter(audit::Column::Version.eq(expected_version))
        .filter(audit::Column::DeletedAt.is_null())
        .exec(conn)
        .await?;
    check_swapped(result.rows_affected, || format!("Audit {}", id))?;

    get_active_audit(conn, id).await
}

/// Stamp the audit as completed if `expected_version` is still current.
pub async fn mark_completed<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    expected_version: i32,
    completed_at: DateTime<Utc>,
) -> AppResult<audit::Model> {
    get_active_audit(conn, id).await?;

    let result = Audit::update_many()
        .col_expr(audit::Column::CompletedAt, Expr::value(Some(completed_at)))
        .col_expr(audit::Column::Version, Expr::value(next_version(expected_version)?))
        .col_expr(audit::Column::UpdatedAt, Expr::value(completed_at))
        .filter(audit::Column::Id.eq(id))
        .filter(audit::Column::Version.eq(expected_version))
        .filter(audit::Column::DeletedAt.is_null())
        .exec(conn)
        .await?;
    check_swapped(result.rows_affected, || format!("Audit {}", id))?;

    get_active_audit(conn, id).await
}

/// Soft-delete an audit if `expected_version` is still current.
pub async fn soft_delete_audit<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    expected_version: i32,
) -> AppResult<()> {
    let now = Utc::now();
    let result = Audit::update_many()
        .col_expr(audit::Column::DeletedAt, Expr::value(Some(now)))
        .col_expr(audit::Column::Version, Expr::value(next_version(expected_version)?))
        .col_expr(audit::Column::UpdatedAt, Expr::value(now))
        .filter(audit::Column::Id.eq(id))
        .filter(audit::Column::Version.eq(expected_version))
        .filter(audit::Column::DeletedAt.is_null())
        .exec(conn)
        .await?;
    check_swapped(result.rows_affected, || format!("Audit {}", id))
}

/// Point the wizard cursor at a page, or clear it.
///
/// Leaves `version` and `updated_at` alone so an open metadata form stays valid.
pub async fn set_next_page<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    page_id: Option<Uuid>,
) -> AppResult<()> {
    let result = Audit::update_many()
        .col_expr(audit::Column::NextPageId, Expr::value(page_id))
        .filter(audit::Column::Id.eq(id))
        .filter(audit::Column::DeletedAt.is_null())
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!("Audit {}", id)));
    }
    Ok(())
}
