//! Database queries for check results.
//!
//! Lookups are keyed by (audit_id, page_id) and (page_id, wcag_definition_id),
//! both of which are indexed.

use std::collections::HashSet;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::entity::check_result::{self, ActiveModel, Entity as CheckResult};
use crate::entity::{page, wcag_definition};
use crate::error::{AppError, AppResult};
use crate::models::CheckResultChanges;

use super::{check_swapped, next_version};

/// Insert a passing check result for a (page, definition) pair.
pub async fn insert_check_result<C: ConnectionTrait>(
    conn: &C,
    page: &page::Model,
    definition: &wcag_definition::Model,
) -> AppResult<check_result::Model> {
    let now = Utc::now();

    let model = ActiveModel {
        id: Set(Uuid::now_v7()),
        audit_id: Set(page.audit_id),
        page_id: Set(page.id),
        wcag_definition_id: Set(definition.id),
        test_type: Set(definition.test_type.clone()),
        failed: Set(false),
        notes: Set(String::new()),
        version: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    };

    Ok(model.insert(conn).await?)
}

/// Definition ids that already have a row on `page_id`, deleted rows included.
pub async fn definition_ids_for_page<C: ConnectionTrait>(
    conn: &C,
    page_id: Uuid,
) -> AppResult<HashSet<Uuid>> {
    let ids: Vec<Uuid> = CheckResult::find()
        .select_only()
        .column(check_result::Column::WcagDefinitionId)
        .filter(check_result::Column::PageId.eq(page_id))
        .into_tuple()
        .all(conn)
        .await?;
    Ok(ids.into_iter().collect())
}

/// Get a check result by ID, whatever its lifecycle.
pub async fn find_check_result<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> AppResult<Option<check_result::Model>> {
    Ok(CheckResult::find_by_id(id).one(conn).await?)
}

/// Get an active check result or fail with `NotFound`.
pub async fn get_active_check_result<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> AppResult<check_result::Model> {
    find_check_result(conn, id)
        .await?
        .filter(|r| r.deleted_at.is_none())
        .ok_or_else(|| AppError::NotFound(format!("Check result {}", id)))
}

/// Active check results of one page.
pub async fn find_check_results<C: ConnectionTrait>(
    conn: &C,
    audit_id: Uuid,
    page_id: Uuid,
) -> AppResult<Vec<check_result::Model>> {
    Ok(CheckResult::find()
        .filter(check_result::Column::AuditId.eq(audit_id))
        .filter(check_result::Column::PageId.eq(page_id))
        .filter(check_result::Column::DeletedAt.is_null())
        .order_by_asc(check_result::Column::CreatedAt)
        .order_by_asc(check_result::Column::Id)
        .all(conn)
        .await?)
}

/// Active check results of an audit, across every page.
pub async fn list_for_audit<C: ConnectionTrait>(
    conn: &C,
    audit_id: Uuid,
) -> AppResult<Vec<check_result::Model>> {
    Ok(CheckResult::find()
        .filter(check_result::Column::AuditId.eq(audit_id))
        .filter(check_result::Column::DeletedAt.is_null())
        .order_by_asc(check_result::Column::CreatedAt)
        .order_by_asc(check_result::Column::Id)
        .all(conn)
        .await?)
}

/// Active failed check results of an audit, across every page.
pub async fn list_failed_for_audit<C: ConnectionTrait>(
    conn: &C,
    audit_id: Uuid,
) -> AppResult<Vec<check_result::Model>> {
    Ok(CheckResult::find()
        .filter(check_result::Column::AuditId.eq(audit_id))
        .filter(check_result::Column::Failed.eq(true))
        .filter(check_result::Column::DeletedAt.is_null())
        .order_by_asc(check_result::Column::CreatedAt)
        .order_by_asc(check_result::Column::Id)
        .all(conn)
        .await?)
}

/// Active results for one definition on any of `page_ids`.
pub async fn list_for_definition_on_pages<C: ConnectionTrait>(
    conn: &C,
    wcag_definition_id: Uuid,
    page_ids: &[Uuid],
) -> AppResult<Vec<check_result::Model>> {
    if page_ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(CheckResult::find()
        .filter(check_result::Column::WcagDefinitionId.eq(wcag_definition_id))
        .filter(check_result::Column::PageId.is_in(page_ids.iter().copied()))
        .filter(check_result::Column::DeletedAt.is_null())
        .all(conn)
        .await?)
}

/// Write `changes` if `expected_version` is still current.
pub async fn update_check_result<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    expected_version: i32,
    changes: &CheckResultChanges,
) -> AppResult<check_result::Model> {
    get_active_check_result(conn, id).await?;

    let mut update = CheckResult::update_many()
        .col_expr(
            check_result::Column::Version,
            Expr::value(next_version(expected_version)?),
        )
        .col_expr(check_result::Column::UpdatedAt, Expr::value(Utc::now()));
    if let Some(failed) = changes.failed {
        update = update.col_expr(check_result::Column::Failed, Expr::value(failed));
    }
    if let Some(notes) = &changes.notes {
        update = update.col_expr(check_result::Column::Notes, Expr::value(notes.clone()));
    }

    let result = update
        .filter(check_result::Column::Id.eq(id))
        .filter(check_result::Column::Version.eq(expected_version))
        .filter(check_result::Column::DeletedAt.is_null())
        .exec(conn)
        .await?;
    check_swapped(result.rows_affected, || format!("Check result {}", id))?;

    get_active_check_result(conn, id).await
}
