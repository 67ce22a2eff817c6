//! Retest builder and retest editing.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::ConnectionTrait;
use tracing::info;
use uuid::Uuid;

use crate::db::{self, DbPool};
use crate::entity::{
    retest, retest_check_result, retest_page, retest_statement_check_result,
};
use crate::error::{AppError, AppResult, PreconditionFailure};
use crate::models::{
    RetestCheckResultResponse, RetestDecisionRequest, RetestDetailResponse, RetestPageResponse,
    RetestResponse, RetestStatementCheckResultResponse, UpdateRetestCheckResultRequest,
    UpdateRetestPageRequest, UpdateRetestStatementCheckResultRequest,
};

/// A retest with every record it owns.
#[derive(Debug, Clone)]
pub struct RetestSnapshot {
    pub retest: retest::Model,
    pub pages: Vec<retest_page::Model>,
    pub check_results: Vec<retest_check_result::Model>,
    pub statement_check_results: Vec<retest_statement_check_result::Model>,
}

impl RetestSnapshot {
    pub fn into_response(self) -> AppResult<RetestDetailResponse> {
        Ok(RetestDetailResponse {
            retest: RetestResponse::from_model(self.retest)?,
            pages: self
                .pages
                .into_iter()
                .map(RetestPageResponse::from_model)
                .collect::<AppResult<_>>()?,
            check_results: self
                .check_results
                .into_iter()
                .map(RetestCheckResultResponse::from_model)
                .collect::<AppResult<_>>()?,
            statement_check_results: self
                .statement_check_results
                .into_iter()
                .map(RetestStatementCheckResultResponse::from_model)
                .collect::<AppResult<_>>()?,
        })
    }
}

/// Snapshot the outstanding issues of a case's completed audit into a new retest.
///
/// Every testable page gets a retest page, whether or not it has failures.
/// Failed check results on those pages and failing statement results are
/// copied with outcome not-retested. Nothing is written unless every copy
/// succeeds.
pub async fn start_retest(pool: &DbPool, case_id: Uuid) -> AppResult<RetestSnapshot> {
    let txn = pool.begin().await?;

    db::cases::get_active_case(&txn, case_id).await?;
    let audit = db::audits::find_active_audit_for_case(&txn, case_id)
        .await?
        .filter(|a| a.is_completed())
        .ok_or(PreconditionFailure::NoCompletedAudit(case_id))?;
    if db::retests::find_active_retest_for_case(&txn, case_id)
        .await?
        .is_some()
    {
        return Err(PreconditionFailure::RetestAlreadyExists(case_id).into());
    }

    let created = db::retests::count_retests_for_case(&txn, case_id).await?;
    let sequence = i32::try_from(created + 1).map_err(|_| {
        AppError::Integrity(format!("case {} has too many retests", case_id))
    })?;

    let now = Utc::now();
    let retest = db::retests::insert_retest(&txn, case_id, sequence, now).await?;

    let mut pages = Vec::new();
    let mut retest_page_for: HashMap<Uuid, Uuid> = HashMap::new();
    for page in db::pages::list_active_pages(&txn, audit.id).await? {
        if !page.is_testable() {
            continue;
        }
        let retest_page = db::retests::insert_retest_page(&txn, retest.id, &page, now).await?;
        retest_page_for.insert(page.id, retest_page.id);
        pages.push(retest_page);
    }

    let mut check_results = Vec::new();
    for result in db::check_results::list_failed_for_audit(&txn, audit.id).await? {
        let Some(&retest_page_id) = retest_page_for.get(&result.page_id) else {
            continue;
        };
        check_results.push(
            db::retests::insert_retest_check_result(&txn, retest.id, retest_page_id, &result, now)
                .await?,
        );
    }

    let mut statement_check_results = Vec::new();
    for result in db::statements::list_results_for_audit(&txn, audit.id).await? {
        if !result.is_issue() {
            continue;
        }
        statement_check_results.push(
            db::retests::insert_retest_statement_check_result(&txn, retest.id, &result, now)
                .await?,
        );
    }

    txn.commit().await?;

    info!(
        case_id = %case_id,
        retest_id = %retest.id,
        sequence,
        pages = pages.len(),
        check_results = check_results.len(),
        statement_check_results = statement_check_results.len(),
        "Retest started"
    );

    Ok(RetestSnapshot {
        retest,
        pages,
        check_results,
        statement_check_results,
    })
}

async fn load_snapshot<C: ConnectionTrait>(
    conn: &C,
    retest: retest::Model,
) -> AppResult<RetestSnapshot> {
    let ids = [retest.id];
    Ok(RetestSnapshot {
        pages: db::retests::list_pages(conn, retest.id).await?,
        check_results: db::retests::list_check_results(conn, &ids).await?,
        statement_check_results: db::retests::list_statement_check_results(conn, &ids).await?,
        retest,
    })
}

/// A retest and its records, deleted or not.
pub async fn get_retest_detail(pool: &DbPool, id: Uuid) -> AppResult<RetestSnapshot> {
    let conn = pool.connection();
    let retest = db::retests::find_retest(conn, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Retest {}", id)))?;
    load_snapshot(conn, retest).await
}

/// Mark a retest deleted. Its records drop out of every aggregate with it.
pub async fn delete_retest(pool: &DbPool, id: Uuid, expected_version: i32) -> AppResult<()> {
    db::retests::soft_delete_retest(pool.connection(), id, expected_version).await?;
    info!(retest_id = %id, "Retest deleted");
    Ok(())
}

/// Bring a deleted retest back unless the case has started another one.
pub async fn restore_retest(
    pool: &DbPool,
    id: Uuid,
    expected_version: i32,
) -> AppResult<retest::Model> {
    let txn = pool.begin().await?;
    let current = db::retests::find_retest(&txn, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Retest {}", id)))?;
    if db::retests::find_active_retest_for_case(&txn, current.case_id)
        .await?
        .is_some_and(|other| other.id != id)
    {
        return Err(PreconditionFailure::RetestAlreadyExists(current.case_id).into());
    }

    let retest = db::retests::restore_retest(&txn, id, expected_version).await?;
    txn.commit().await?;

    info!(retest_id = %id, case_id = %retest.case_id, "Retest restored");
    Ok(retest)
}

/// Record the retest-level decisions.
pub async fn update_retest_decision(
    pool: &DbPool,
    id: Uuid,
    request: &RetestDecisionRequest,
) -> AppResult<retest::Model> {
    let retest =
        db::retests::update_decision(pool.connection(), id, request.version, request).await?;
    info!(retest_id = %id, version = retest.version, "Retest decision updated");
    Ok(retest)
}

/// Mark a retest page missing or present and note extra issues.
pub async fn update_retest_page(
    pool: &DbPool,
    id: Uuid,
    request: &UpdateRetestPageRequest,
) -> AppResult<retest_page::Model> {
    let conn = pool.connection();
    let current = db::retests::get_retest_page(conn, id).await?;
    db::retests::get_active_retest(conn, current.retest_id).await?;

    db::retests::update_retest_page(conn, id, request.version, request).await
}

/// Record whether a failed check result is now fixed.
pub async fn update_retest_check_result(
    pool: &DbPool,
    id: Uuid,
    request: &UpdateRetestCheckResultRequest,
) -> AppResult<retest_check_result::Model> {
    let conn = pool.connection();
    let current = db::retests::get_retest_check_result(conn, id).await?;
    db::retests::get_active_retest(conn, current.retest_id).await?;

    let updated = db::retests::update_check_result_outcome(
        conn,
        id,
        request.version,
        request.outcome,
        request.retest_notes.as_deref(),
    )
    .await?;

    info!(
        retest_check_result_id = %id,
        outcome = request.outcome.as_str(),
        "Retest check result updated"
    );
    Ok(updated)
}

/// Record whether a statement issue is now fixed.
pub async fn update_retest_statement_check_result(
    pool: &DbPool,
    id: Uuid,
    request: &UpdateRetestStatementCheckResultRequest,
) -> AppResult<retest_statement_check_result::Model> {
    let conn = pool.connection();
    let current = db::retests::get_retest_statement_check_result(conn, id).await?;
    db::retests::get_active_retest(conn, current.retest_id).await?;

    let updated = db::retests::update_statement_result_outcome(
        conn,
        id,
        request.version,
        request.outcome,
        request.retest_comment.as_deref(),
    )
    .await?;

    info!(
        retest_statement_check_result_id = %id,
        outcome = request.outcome.as_str(),
        "Retest statement check result updated"
    );
    Ok(updated)
}
