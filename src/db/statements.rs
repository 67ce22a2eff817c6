//! Database queries for statement checks and statement check results.

use std::collections::HashSet;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::entity::statement_check::{self, Entity as StatementCheck};
use crate::entity::statement_check_result::{self, Entity as StatementCheckResult};
use crate::error::{AppError, AppResult};
use crate::models::{
    NewStatementCheck, StatementCheckType, StatementResultState, UpdateStatementCheckRequest,
};

use super::{check_swapped, next_version};

/// Append a question to the statement check reference list.
pub async fn insert_statement_check<C: ConnectionTrait>(
    conn: &C,
    check: &NewStatementCheck,
) -> AppResult<statement_check::Model> {
    let model = statement_check::ActiveModel {
        id: Set(Uuid::now_v7()),
        check_type: Set(check.check_type.as_str().to_string()),
        label: Set(check.label.clone()),
        success_criteria: Set(check.success_criteria.clone()),
        report_text: Set(check.report_text.clone()),
        position: Set(check.position),
        date_start: Set(check.date_start),
        date_end: Set(check.date_end),
        created_at: Set(Utc::now()),
    };

    Ok(model.insert(conn).await?)
}

/// Statement checks in assessment order.
pub async fn list_statement_checks<C: ConnectionTrait>(
    conn: &C,
) -> AppResult<Vec<statement_check::Model>> {
    Ok(StatementCheck::find()
        .order_by_asc(statement_check::Column::Position)
        .order_by_asc(statement_check::Column::CreatedAt)
        .all(conn)
        .await?)
}

/// Get a statement check or fail with `NotFound`.
pub async fn get_statement_check<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> AppResult<statement_check::Model> {
    StatementCheck::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Statement check {}", id)))
}

/// Overwrite the editable fields of a statement check.
pub async fn update_statement_check<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    changes: &UpdateStatementCheckRequest,
) -> AppResult<statement_check::Model> {
    let mut model: statement_check::ActiveModel = get_statement_check(conn, id).await?.into();
    model.label = Set(changes.label.clone());
    model.success_criteria = Set(changes.success_criteria.clone());
    model.report_text = Set(changes.report_text.clone());
    model.position = Set(changes.position);
    model.date_start = Set(changes.date_start);
    model.date_end = Set(changes.date_end);

    Ok(model.update(conn).await?)
}

/// Insert the result row for a reference question or a custom issue.
pub async fn insert_result<C: ConnectionTrait>(
    conn: &C,
    audit_id: Uuid,
    statement_check_id: Option<Uuid>,
    check_type: StatementCheckType,
    state: StatementResultState,
    report_comment: &str,
) -> AppResult<statement_check_result::Model> {
    let now = Utc::now();

    let model = statement_check_result::ActiveModel {
        id: Set(Uuid::now_v7()),
        audit_id: Set(audit_id),
        statement_check_id: Set(statement_check_id),
        check_type: Set(check_type.as_str().to_string()),
        state: Set(state.as_str().to_string()),
        report_comment: Set(report_comment.to_string()),
        version: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    };

    Ok(model.insert(conn).await?)
}

/// Statement check ids already answered on the audit.
pub async fn answered_check_ids<C: ConnectionTrait>(
    conn: &C,
    audit_id: Uuid,
) -> AppResult<HashSet<Uuid>> {
    let ids: Vec<Option<Uuid>> = StatementCheckResult::find()
        .select_only()
        .column(statement_check_result::Column::StatementCheckId)
        .filter(statement_check_result::Column::AuditId.eq(audit_id))
        .into_tuple()
        .all(conn)
        .await?;
    Ok(ids.into_iter().flatten().collect())
}

/// Active statement results of an audit, custom issues included.
pub async fn list_results_for_audit<C: ConnectionTrait>(
    conn: &C,
    audit_id: Uuid,
) -> AppResult<Vec<statement_check_result::Model>> {
    Ok(StatementCheckResult::find()
        .filter(statement_check_result::Column::AuditId.eq(audit_id))
        .filter(statement_check_result::Column::DeletedAt.is_null())
        .order_by_asc(statement_check_result::Column::CreatedAt)
        .order_by_asc(statement_check_result::Column::Id)
        .all(conn)
        .await?)
}

/// Get an active statement result or fail with `NotFound`.
pub async fn get_active_result<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> AppResult<statement_check_result::Model> {
    StatementCheckResult::find_by_id(id)
        .one(conn)
        .await?
        .filter(|r| r.deleted_at.is_none())
        .ok_or_else(|| AppError::NotFound(format!("Statement check result {}", id)))
}

/// Record an answer if `expected_version` is still current.
pub async fn update_result<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    expected_version: i32,
    state: StatementResultState,
    report_comment: Option<&str>,
) -> AppResult<statement_check_result::Model> {
    get_active_result(conn, id).await?;

    let mut update = StatementCheckResult::update_many()
        .col_expr(
            statement_check_result::Column::State,
            Expr::value(state.as_str()),
        )
        .col_expr(
            statement_check_result::Column::Version,
            Expr::value(next_version(expected_version)?),
        )
        .col_expr(statement_check_result::Column::UpdatedAt, Expr::value(Utc::now()));
    if let Some(comment) = report_comment {
        update = update.col_expr(
            statement_check_result::Column::ReportComment,
            Expr::value(comment.to_string()),
        );
    }

    let result = update
        .filter(statement_check_result::Column::Id.eq(id))
        .filter(statement_check_result::Column::Version.eq(expected_version))
        .filter(statement_check_result::Column::DeletedAt.is_null())
        .exec(conn)
        .await?;
    check_swapped(result.rows_affected, || format!("Statement check result {}", id))?;

    get_active_result(conn, id).await
}

/// Soft-delete a statement result if `expected_version` is still current.
pub async fn soft_delete_result<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    expected_version: i32,
) -> AppResult<()> {
    let now = Utc::now();
    let result = StatementCheckResult::update_many()
        .col_expr(statement_check_result::Column::DeletedAt, Expr::value(Some(now)))
        .col_expr(
            statement_check_result::Column::Version,
            Expr::value(next_version(expected_version)?),
        )
        .col_expr(statement_check_result::Column::UpdatedAt, Expr::value(now))
        .filter(statement_check_result::Column::Id.eq(id))
        .filter(statement_check_result::Column::Version.eq(expected_version))
        .filter(statement_check_result::Column::DeletedAt.is_null())
        .exec(conn)
        .await?;
    check_swapped(result.rows_affected, || format!("Statement check result {}", id))
}
