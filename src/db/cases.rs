//! Database queries for cases.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entity::case::{self, ActiveModel, Entity as Case};
use crate::error::{AppError, AppResult};
use crate::models::{CaseStatus, StatementCompliance, UpdateCaseRequest, WebsiteCompliance};

use super::{check_swapped, next_version};

/// Insert a new case in the `new-case` stage.
pub async fn insert_case<C: ConnectionTrait>(
    conn: &C,
    organisation_name: &str,
    home_page_url: &str,
    domain: &str,
    auditor: Option<String>,
) -> AppResult<case::Model> {
    let now = Utc::now();

    let model = ActiveModel {
        id: Set(Uuid::now_v7()),
        organisation_name: Set(organisation_name.to_string()),
        home_page_url: Set(home_page_url.to_string()),
        domain: Set(domain.to_string()),
        status: Set(CaseStatus::NewCase.as_str().to_string()),
        auditor: Set(auditor),
        reviewer: Set(None),
        website_compliance: Set(WebsiteCompliance::Unknown.as_str().to_string()),
        statement_compliance: Set(StatementCompliance::Unknown.as_str().to_string()),
        compliance_notes: Set(String::new()),
        version: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    };

    Ok(model.insert(conn).await?)
}

/// Get a case by ID, whatever its lifecycle.
pub async fn find_case<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<Option<case::Model>> {
    Ok(Case::find_by_id(id).one(conn).await?)
}

/// Get an active case or fail with `NotFound`.
pub async fn get_active_case<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<case::Model> {
    find_case(conn, id)
        .await?
        .filter(|c| c.deleted_at.is_none())
        .ok_or_else(|| AppError::NotFound(format!("Case {}", id)))
}

/// List active cases, newest first.
pub async fn list_active_cases<C: ConnectionTrait>(conn: &C) -> AppResult<Vec<case::Model>> {
    Ok(Case::find()
        .filter(case::Column::DeletedAt.is_null())
        .order_by_desc(case::Column::CreatedAt)
        .all(conn)
        .await?)
}

/// Apply user edits to a case if `expected_version` is still current.
pub async fn update_case<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    expected_version: i32,
    changes: &UpdateCaseRequest,
) -> AppResult<case::Model> {
    get_active_case(conn, id).await?;

    let mut update = Case::update_many()
        .col_expr(case::Column::Version, Expr::value(next_version(expected_version)?))
        .col_expr(case::Column::UpdatedAt, Expr::value(Utc::now()));
    if let Some(name) = &changes.organisation_name {
        update = update.col_expr(case::Column::OrganisationName, Expr::value(name.clone()));
    }
    if let Some(status) = changes.status {
        update = update.col_expr(case::Column::Status, Expr::value(status.as_str()));
    }
    if let Some(auditor) = &changes.auditor {
        update = update.col_expr(case::Column::Auditor, Expr::value(auditor.clone()));
    }
    if let Some(reviewer) = &changes.reviewer {
        update = update.col_expr(case::Column::Reviewer, Expr::value(reviewer.clone()));
    }
    if let Some(compliance) = changes.website_compliance {
        update = update.col_expr(
            case::Column::WebsiteCompliance,
            Expr::value(compliance.as_str()),
        );
    }
    if let Some(compliance) = changes.statement_compliance {
        update = update.col_expr(
            case::Column::StatementCompliance,
            Expr::value(compliance.as_str()),
        );
    }
    if let Some(notes) = &changes.compliance_notes {
        update = update.col_expr(case::Column::ComplianceNotes, Expr::value(notes.clone()));
    }

    let result = update
        .filter(case::Column::Id.eq(id))
        .filter(case::Column::Version.eq(expected_version))
        .filter(case::Column::DeletedAt.is_null())
        .exec(conn)
        .await?;
    check_swapped(result.rows_affected, || format!("Case {}", id))?;

    get_active_case(conn, id).await
}

/// Move a case to `status` as a side effect of another operation.
///
/// Compares against the version the caller just read.
pub async fn set_status<C: ConnectionTrait>(
    conn: &C,
    current: &case::Model,
    status: CaseStatus,
) -> AppResult<()> {
    let result = Case::update_many()
        .col_expr(case::Column::Status, Expr::value(status.as_str()))
        .col_expr(case::Column::Version, Expr::value(next_version(current.version)?))
        .col_expr(case::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(case::Column::Id.eq(current.id))
        .filter(case::Column::Version.eq(current.version))
        .filter(case::Column::DeletedAt.is_null())
        .exec(conn)
        .await?;
    check_swapped(result.rows_affected, || format!("Case {}", current.id))
}

/// Soft-delete a case if `expected_version` is still current.
pub async fn soft_delete_case<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    expected_version: i32,
) -> AppResult<()> {
    get_active_case(conn, id).await?;

    let now = Utc::now();
    let result = Case::update_many()
        .col_expr(case::Column::DeletedAt, Expr::value(Some(now)))
        .col_expr(case::Column::Version, Expr::value(next_version(expected_version)?))
        .col_expr(case::Column::UpdatedAt, Expr::value(now))
        .filter(case::Column::Id.eq(id))
        .filter(case::Column::Version.eq(expected_version))
        .filter(case::Column::DeletedAt.is_null())
        .exec(conn)
        .await?;
    check_swapped(result.rows_affected, || format!("Case {}", id))
}
