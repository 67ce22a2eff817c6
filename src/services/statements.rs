//! Accessibility statement assessment.

use std::collections::HashMap;

use sea_orm::ConnectionTrait;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::{self, DbPool};
use crate::entity::{audit, statement_check_result};
use crate::error::{AppError, AppResult, PreconditionFailure};
use crate::models::{
    AddCustomIssueRequest, StatementCheckType, StatementResultState,
    UpdateStatementCheckResultRequest, decode,
};

/// Create a not-tested answer for every statement check valid on the test date.
///
/// Checks already answered are skipped, so repeated calls create nothing.
pub(crate) async fn ensure_statement_check_results_in<C: ConnectionTrait>(
    conn: &C,
    audit: &audit::Model,
) -> AppResult<Vec<statement_check_result::Model>> {
    let date = audit.reference_date();
    let mut answered = db::statements::answered_check_ids(conn, audit.id).await?;
    let mut created = Vec::new();

    for check in db::statements::list_statement_checks(conn).await? {
        let check_type = decode(
            &check.check_type,
            StatementCheckType::parse,
            "statement_checks.check_type",
        )?;
        if check_type == StatementCheckType::Custom || !check.is_valid_on(date) {
            continue;
        }
        if !answered.insert(check.id) {
            continue;
        }
        created.push(
            db::statements::insert_result(
                conn,
                audit.id,
                Some(check.id),
                check_type,
                StatementResultState::NotTested,
                "",
            )
            .await?,
        );
    }

    if !created.is_empty() {
        debug!(audit_id = %audit.id, created = created.len(), "Created statement check results");
    }
    Ok(created)
}

/// Idempotently create the audit's statement check results.
pub async fn ensure_statement_check_results(
    pool: &DbPool,
    audit_id: Uuid,
) -> AppResult<Vec<statement_check_result::Model>> {
    let txn = pool.begin().await?;
    let audit = db::audits::get_active_audit(&txn, audit_id).await?;
    let created = ensure_statement_check_results_in(&txn, &audit).await?;
    txn.commit().await?;

    info!(audit_id = %audit_id, created = created.len(), "Statement check results synced");
    Ok(created)
}

/// Active statement results of an audit, answers first in check order, then custom issues.
pub async fn list_statement_check_results(
    pool: &DbPool,
    audit_id: Uuid,
) -> AppResult<Vec<statement_check_result::Model>> {
    let conn = pool.connection();
    db::audits::get_active_audit(conn, audit_id).await?;

    let positions: HashMap<Uuid, i32> =
        db::statements::list_statement_checks(conn)
            .await?
            .into_iter()
            .map(|c| (c.id, c.position))
            .collect();

    let mut results = db::statements::list_results_for_audit(conn, audit_id).await?;
    results.sort_by_key(|r| {
        (
            r.statement_check_id
                .and_then(|id| positions.get(&id).copied())
                .unwrap_or(i32::MAX),
            r.created_at,
        )
    });
    Ok(results)
}

/// Record an answer. Custom issues are always failures and must stay `no`.
pub async fn update_statement_check_result(
    pool: &DbPool,
    id: Uuid,
    request: &UpdateStatementCheckResultRequest,
) -> AppResult<statement_check_result::Model> {
    let conn = pool.connection();
    let current = db::statements::get_active_result(conn, id).await?;
    if current.is_custom() && request.state != StatementResultState::No {
        return Err(AppError::Validation(
            "A custom issue is always a failure; remove it instead".to_string(),
        ));
    }

    let updated = db::statements::update_result(
        conn,
        id,
        request.version,
        request.state,
        request.report_comment.as_deref(),
    )
    .await?;

    info!(
        statement_check_result_id = %id,
        state = request.state.as_str(),
        "Statement check result updated"
    );
    Ok(updated)
}

/// Record a statement problem that no reference question covers.
pub async fn add_custom_statement_issue(
    pool: &DbPool,
    audit_id: Uuid,
    request: &AddCustomIssueRequest,
) -> AppResult<statement_check_result::Model> {
    let comment = request.report_comment.trim();
    if comment.is_empty() {
        return Err(AppError::Validation(
            "A custom issue needs a comment".to_string(),
        ));
    }

    let conn = pool.connection();
    db::audits::get_active_audit(conn, audit_id).await?;
    let issue = db::statements::insert_result(
        conn,
        audit_id,
        None,
        StatementCheckType::Custom,
        StatementResultState::No,
        comment,
    )
    .await?;

    info!(audit_id = %audit_id, statement_check_result_id = %issue.id, "Custom statement issue added");
    Ok(issue)
}

/// Remove a custom issue. Answers to reference questions cannot be removed.
pub async fn remove_custom_statement_issue(
    pool: &DbPool,
    id: Uuid,
    expected_version: i32,
) -> AppResult<()> {
    let conn = pool.connection();
    let current = db::statements::get_active_result(conn, id).await?;
    if !current.is_custom() {
        return Err(PreconditionFailure::InvalidState(format!(
            "Statement check result {} answers a reference question and cannot be removed",
            id
        ))
        .into());
    }

    db::statements::soft_delete_result(conn, id, expected_version).await?;
    info!(statement_check_result_id = %id, "Custom statement issue removed");
    Ok(())
}
