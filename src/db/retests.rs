//! Database queries for retests and the records they own.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entity::retest::{self, Entity as Retest};
use crate::entity::retest_check_result::{self, Entity as RetestCheckResult};
use crate::entity::retest_page::{self, Entity as RetestPage};
use crate::entity::retest_statement_check_result::{self, Entity as RetestStatementCheckResult};
use crate::entity::{check_result, page, statement_check_result};
use crate::error::{AppError, AppResult, PreconditionFailure};
use crate::models::{
    DisproportionateBurden, RetestDecisionRequest, RetestOutcome, StatementCompliance,
    UpdateRetestPageRequest,
};

use super::{check_swapped, is_unique_violation, next_version};

/// Number of retests ever created for a case, deleted ones included.
pub async fn count_retests_for_case<C: ConnectionTrait>(conn: &C, case_id: Uuid) -> AppResult<u64> {
    Ok(Retest::find()
        .filter(retest::Column::CaseId.eq(case_id))
        .count(conn)
        .await?)
}

/// Active retests of a case, most recent first.
pub async fn list_active_retests_for_case<C: ConnectionTrait>(
    conn: &C,
    case_id: Uuid,
) -> AppResult<Vec<retest::Model>> {
    Ok(Retest::find()
        .filter(retest::Column::CaseId.eq(case_id))
        .filter(retest::Column::DeletedAt.is_null())
        .order_by_desc(retest::Column::Sequence)
        .all(conn)
        .await?)
}

/// The live retest of a case, if any.
pub async fn find_active_retest_for_case<C: ConnectionTrait>(
    conn: &C,
    case_id: Uuid,
) -> AppResult<Option<retest::Model>> {
    Ok(list_active_retests_for_case(conn, case_id)
        .await?
        .into_iter()
        .next())
}

/// Get a retest by ID, whatever its lifecycle.
pub async fn find_retest<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<Option<retest::Model>> {
    Ok(Retest::find_by_id(id).one(conn).await?)
}

/// Get an active retest or fail with `NotFound`.
pub async fn get_active_retest<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<retest::Model> {
    find_retest(conn, id)
        .await?
        .filter(|r| r.deleted_at.is_none())
        .ok_or_else(|| AppError::NotFound(format!("Retest {}", id)))
}

/// Insert a retest with unset decision fields.
///
/// Losing a race for the sequence number or for the case's single live
/// retest is reported as `RetestAlreadyExists`.
pub async fn insert_retest<C: ConnectionTrait>(
    conn: &C,
    case_id: Uuid,
    sequence: i32,
    now: DateTime<Utc>,
) -> AppResult<retest::Model> {
    let model = retest::ActiveModel {
        id: Set(Uuid::now_v7()),
        case_id: Set(case_id),
        sequence: Set(sequence),
        date_of_retest: Set(None),
        statement_compliance: Set(StatementCompliance::Unknown.as_str().to_string()),
        disproportionate_burden: Set(DisproportionateBurden::NotChecked.as_str().to_string()),
        notes: Set(String::new()),
        version: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    };

    model.insert(conn).await.map_err(|err| -> AppError {
        if is_unique_violation(&err) {
            tracing::warn!(case_id = %case_id, sequence, "Rejected concurrent retest");
            PreconditionFailure::RetestAlreadyExists(case_id).into()
        } else {
            err.into()
        }
    })
}

/// Insert a retest page copying the identity of `page`.
pub async fn insert_retest_page<C: ConnectionTrait>(
    conn: &C,
    retest_id: Uuid,
    page: &page::Model,
    now: DateTime<Utc>,
) -> AppResult<retest_page::Model> {
    let model = retest_page::ActiveModel {
        id: Set(Uuid::now_v7()),
        retest_id: Set(retest_id),
        page_id: Set(page.id),
        page_type: Set(page.page_type.clone()),
        name: Set(page.name.clone()),
        url: Set(page.url.clone()),
        missing_date: Set(None),
        additional_issues_notes: Set(String::new()),
        version: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    };

    Ok(model.insert(conn).await?)
}

/// Insert a not-retested copy of a failed check result.
pub async fn insert_retest_check_result<C: ConnectionTrait>(
    conn: &C,
    retest_id: Uuid,
    retest_page_id: Uuid,
    check_result: &check_result::Model,
    now: DateTime<Utc>,
) -> AppResult<retest_check_result::Model> {
    let model = retest_check_result::ActiveModel {
        id: Set(Uuid::now_v7()),
        retest_id: Set(retest_id),
        retest_page_id: Set(retest_page_id),
        check_result_id: Set(check_result.id),
        wcag_definition_id: Set(check_result.wcag_definition_id),
        test_type: Set(check_result.test_type.clone()),
        outcome: Set(RetestOutcome::NotRetested.as_str().to_string()),
        retest_notes: Set(String::new()),
        version: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    };

    Ok(model.insert(conn).await?)
}

/// Insert a not-retested copy of a failing statement result.
pub async fn insert_retest_statement_check_result<C: ConnectionTrait>(
    conn: &C,
    retest_id: Uuid,
    result: &statement_check_result::Model,
    now: DateTime<Utc>,
) -> AppResult<retest_statement_check_result::Model> {
    let model = retest_statement_check_result::ActiveModel {
        id: Set(Uuid::now_v7()),
        retest_id: Set(retest_id),
        statement_check_result_id: Set(result.id),
        statement_check_id: Set(result.statement_check_id),
        check_type: Set(result.check_type.clone()),
        comment: Set(result.report_comment.clone()),
        outcome: Set(RetestOutcome::NotRetested.as_str().to_string()),
        retest_comment: Set(String::new()),
        version: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    };

    Ok(model.insert(conn).await?)
}

/// Pages of a retest in creation order.
pub async fn list_pages<C: ConnectionTrait>(
    conn: &C,
    retest_id: Uuid,
) -> AppResult<Vec<retest_page::Model>> {
    Ok(RetestPage::find()
        .filter(retest_page::Column::RetestId.eq(retest_id))
        .filter(retest_page::Column::DeletedAt.is_null())
        .order_by_asc(retest_page::Column::CreatedAt)
        .order_by_asc(retest_page::Column::Id)
        .all(conn)
        .await?)
}

/// Check results carried by any of `retest_ids`.
pub async fn list_check_results<C: ConnectionTrait>(
    conn: &C,
    retest_ids: &[Uuid],
) -> AppResult<Vec<retest_check_result::Model>> {
    if retest_ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(RetestCheckResult::find()
        .filter(retest_check_result::Column::RetestId.is_in(retest_ids.iter().copied()))
        .filter(retest_check_result::Column::DeletedAt.is_null())
        .order_by_asc(retest_check_result::Column::CreatedAt)
        .order_by_asc(retest_check_result::Column::Id)
        .all(conn)
        .await?)
}

/// Statement results carried by any of `retest_ids`.
pub async fn list_statement_check_results<C: ConnectionTrait>(
    conn: &C,
    retest_ids: &[Uuid],
) -> AppResult<Vec<retest_statement_check_result::Model>> {
    if retest_ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(RetestStatementCheckResult::find()
        .filter(
            retest_statement_check_result::Column::RetestId.is_in(retest_ids.iter().copied()),
        )
        .filter(retest_statement_check_result::Column::DeletedAt.is_null())
        .order_by_asc(retest_statement_check_result::Column::CreatedAt)
        .order_by_asc(retest_statement_check_result::Column::Id)
        .all(conn)
        .await?)
}

/// Record the retest decisions if `expected_version` is still current.
pub async fn update_decision<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    expected_version: i32,
    decision: &RetestDecisionRequest,
) -> AppResult<retest::Model> {
    get_active_retest(conn, id).await?;

    let mut update = Retest::update_many()
        .col_expr(retest::Column::Version, Expr::value(next_version(expected_version)?))
        .col_expr(retest::Column::UpdatedAt, Expr::value(Utc::now()));
    if let Some(date) = decision.date_of_retest {
        update = update.col_expr(retest::Column::DateOfRetest, Expr::value(Some(date)));
    }
    if let Some(compliance) = decision.statement_compliance {
        update = update.col_expr(
            retest::Column::StatementCompliance,
            Expr::value(compliance.as_str()),
        );
    }
    if let Some(burden) = decision.disproportionate_burden {
        update = update.col_expr(
            retest::Column::DisproportionateBurden,
            Expr::value(burden.as_str()),
        );
    }
    if let Some(notes) = &decision.notes {
        update = update.col_expr(retest::Column::Notes, Expr::value(notes.clone()));
    }

    let result = update
        .filter(retest::Column::Id.eq(id))
        .filter(retest::Column::Version.eq(expected_version))
        .filter(retest::Column::DeletedAt.is_null())
        .exec(conn)
        .await?;
    check_swapped(result.rows_affected, || format!("Retest {}", id))?;

    get_active_retest(conn, id).await
}

/// Soft-delete a retest if `expected_version` is still current.
///
/// Owned records stay in place; they are reached only through the retest.
pub async fn soft_delete_retest<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    expected_version: i32,
) -> AppResult<()> {
    get_active_retest(conn, id).await?;

    let now = Utc::now();
    let result = Retest::update_many()
        .col_expr(retest::Column::DeletedAt, Expr::value(Some(now)))
        .col_expr(retest::Column::Version, Expr::value(next_version(expected_version)?))
        .col_expr(retest::Column::UpdatedAt, Expr::value(now))
        .filter(retest::Column::Id.eq(id))
        .filter(retest::Column::Version.eq(expected_version))
        .filter(retest::Column::DeletedAt.is_null())
        .exec(conn)
        .await?;
    check_swapped(result.rows_affected, || format!("Retest {}", id))
}

/// Bring a soft-deleted retest back if `expected_version` is still current.
pub async fn restore_retest<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    expected_version: i32,
) -> AppResult<retest::Model> {
    let retest = find_retest(conn, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Retest {}", id)))?;
    if retest.deleted_at.is_none() {
        return Err(
            PreconditionFailure::InvalidState(format!("Retest {} is not deleted", id)).into(),
        );
    }

    let result = Retest::update_many()
        .col_expr(
            retest::Column::DeletedAt,
            Expr::value(Option::<DateTime<Utc>>::None),
        )
        .col_expr(retest::Column::Version, Expr::value(next_version(expected_version)?))
        .col_expr(retest::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(retest::Column::Id.eq(id))
        .filter(retest::Column::Version.eq(expected_version))
        .filter(retest::Column::DeletedAt.is_not_null())
        .exec(conn)
        .await
        .map_err(|err| -> AppError {
            if is_unique_violation(&err) {
                PreconditionFailure::RetestAlreadyExists(retest.case_id).into()
            } else {
                err.into()
            }
        })?;
    check_swapped(result.rows_affected, || format!("Retest {}", id))?;

    get_active_retest(conn, id).await
}

/// Get a retest page or fail with `NotFound`.
pub async fn get_retest_page<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> AppResult<retest_page::Model> {
    RetestPage::find_by_id(id)
        .one(conn)
        .await?
        .filter(|p| p.deleted_at.is_none())
        .ok_or_else(|| AppError::NotFound(format!("Retest page {}", id)))
}

/// Update a retest page if `expected_version` is still current.
///
/// `missing_date` is always written so a page can be marked present again.
pub async fn update_retest_page<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    expected_version: i32,
    changes: &UpdateRetestPageRequest,
) -> AppResult<retest_page::Model> {
    get_retest_page(conn, id).await?;

    let mut update = RetestPage::update_many()
        .col_expr(
            retest_page::Column::MissingDate,
            Expr::value(changes.missing_date),
        )
        .col_expr(
            retest_page::Column::Version,
            Expr::value(next_version(expected_version)?),
        )
        .col_expr(retest_page::Column::UpdatedAt, Expr::value(Utc::now()));
    if let Some(notes) = &changes.additional_issues_notes {
        update = update.col_expr(
            retest_page::Column::AdditionalIssuesNotes,
            Expr::value(notes.clone()),
        );
    }

    let result = update
        .filter(retest_page::Column::Id.eq(id))
        .filter(retest_page::Column::Version.eq(expected_version))
        .filter(retest_page::Column::DeletedAt.is_null())
        .exec(conn)
        .await?;
    check_swapped(result.rows_affected, || format!("Retest page {}", id))?;

    get_retest_page(conn, id).await
}

/// Get a retest check result or fail with `NotFound`.
pub async fn get_retest_check_result<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> AppResult<retest_check_result::Model> {
    RetestCheckResult::find_by_id(id)
        .one(conn)
        .await?
        .filter(|r| r.deleted_at.is_none())
        .ok_or_else(|| AppError::NotFound(format!("Retest check result {}", id)))
}

/// Record a retest outcome if `expected_version` is still current.
pub async fn update_check_result_outcome<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    expected_version: i32,
    outcome: RetestOutcome,
    retest_notes: Option<&str>,
) -> AppResult<retest_check_result::Model> {
    get_retest_check_result(conn, id).await?;

    let mut update = RetestCheckResult::update_many()
        .col_expr(
            retest_check_result::Column::Outcome,
            Expr::value(outcome.as_str()),
        )
        .col_expr(
            retest_check_result::Column::Version,
            Expr::value(next_version(expected_version)?),
        )
        .col_expr(retest_check_result::Column::UpdatedAt, Expr::value(Utc::now()));
    if let Some(notes) = retest_notes {
        update = update.col_expr(
            retest_check_result::Column::RetestNotes,
            Expr::value(notes.to_string()),
        );
    }

    let result = update
        .filter(retest_check_result::Column::Id.eq(id))
        .filter(retest_check_result::Column::Version.eq(expected_version))
        .filter(retest_check_result::Column::DeletedAt.is_null())
        .exec(conn)
        .await?;
    check_swapped(result.rows_affected, || format!("Retest check result {}", id))?;

    get_retest_check_result(conn, id).await
}

/// Get a retest statement check result or fail with `NotFound`.
pub async fn get_retest_statement_check_result<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> AppResult<retest_statement_check_result::Model> {
    RetestStatementCheckResult::find_by_id(id)
        .one(conn)
        .await?
        .filter(|r| r.deleted_at.is_none())
        .ok_or_else(|| AppError::NotFound(format!("Retest statement check result {}", id)))
}

/// Record a statement retest outcome if `expected_version` is still current.
pub async fn update_statement_result_outcome<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    expected_version: i32,
    outcome: RetestOutcome,
    retest_comment: Option<&str>,
) -> AppResult<retest_statement_check_result::Model> {
    get_retest_statement_check_result(conn, id).await?;

    let mut update = RetestStatementCheckResult::update_many()
        .col_expr(
            retest_statement_check_result::Column::Outcome,
            Expr::value(outcome.as_str()),
        )
        .col_expr(
            retest_statement_check_result::Column::Version,
            Expr::value(next_version(expected_version)?),
        )
        .col_expr(
            retest_statement_check_result::Column::UpdatedAt,
            Expr::value(Utc::now()),
        );
    if let Some(comment) = retest_comment {
        update = update.col_expr(
            retest_statement_check_result::Column::RetestComment,
            Expr::value(comment.to_string()),
        );
    }

    let result = update
        .filter(retest_statement_check_result::Column::Id.eq(id))
        .filter(retest_statement_check_result::Column::Version.eq(expected_version))
        .filter(retest_statement_check_result::Column::DeletedAt.is_null())
        .exec(conn)
        .await?;
    check_swapped(result.rows_affected, || {
        format!("Retest statement check result {}", id)
    })?;

    get_retest_statement_check_result(conn, id).await
}
