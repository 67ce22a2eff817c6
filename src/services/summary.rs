//! Aggregation layer: figures derived from the store on every request.

use std::collections::{HashMap, HashSet};

use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::db::{self, DbPool};
use crate::entity::{
    audit, check_result, page, retest, retest_check_result, retest_statement_check_result,
    statement_check_result, wcag_definition,
};
use crate::error::AppResult;
use crate::models::{
    AuditSummary, GroupBy, IssueGroup, OutstandingIssuesResponse, RetestOutcome,
    StatementCheckType, StatementResultState, decode,
};

/// `round(100 * fixed / total)` with halves rounded up; 100 when `total` is 0.
pub fn percentage(fixed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let fixed = fixed.min(total) as u128;
    let total = total as u128;
    ((200 * fixed + total) / (2 * total)) as u8
}

/// Latest outcome per originating record across the active retests.
///
/// When several retests hold a copy of the same record, the one with the
/// highest sequence wins.
fn latest_outcomes<'a>(
    retests: &[retest::Model],
    copies: impl Iterator<Item = (Uuid, Uuid, &'a str)>,
) -> AppResult<HashMap<Uuid, RetestOutcome>> {
    let sequence: HashMap<Uuid, i32> = retests.iter().map(|r| (r.id, r.sequence)).collect();
    let mut latest: HashMap<Uuid, (i32, RetestOutcome)> = HashMap::new();

    for (retest_id, origin_id, outcome) in copies {
        let Some(&seq) = sequence.get(&retest_id) else {
            continue;
        };
        let outcome = decode(outcome, RetestOutcome::parse, "retest outcome")?;
        match latest.get(&origin_id) {
            Some((held, _)) if *held >= seq => {}
            _ => {
                latest.insert(origin_id, (seq, outcome));
            }
        }
    }

    Ok(latest.into_iter().map(|(id, (_, o))| (id, o)).collect())
}

fn check_result_outcomes(
    retests: &[retest::Model],
    copies: &[retest_check_result::Model],
) -> AppResult<HashMap<Uuid, RetestOutcome>> {
    latest_outcomes(
        retests,
        copies
            .iter()
            .map(|c| (c.retest_id, c.check_result_id, c.outcome.as_str())),
    )
}

fn statement_outcomes(
    retests: &[retest::Model],
    copies: &[retest_statement_check_result::Model],
) -> AppResult<HashMap<Uuid, RetestOutcome>> {
    latest_outcomes(
        retests,
        copies
            .iter()
            .map(|c| (c.retest_id, c.statement_check_result_id, c.outcome.as_str())),
    )
}

fn is_unfixed(outcomes: &HashMap<Uuid, RetestOutcome>, id: Uuid) -> bool {
    outcomes.get(&id).is_none_or(|outcome| outcome.is_outstanding())
}

/// Group `results` by page, in the order pages are given.
pub fn group_by_page(results: &[check_result::Model], pages: &[page::Model]) -> Vec<IssueGroup> {
    let mut groups = Vec::new();
    for page in pages {
        let ids: Vec<Uuid> = results
            .iter()
            .filter(|r| r.page_id == page.id)
            .map(|r| r.id)
            .collect();
        if !ids.is_empty() {
            groups.push(IssueGroup {
                key: page.id,
                label: page.display_name(),
                count: ids.len(),
                check_result_ids: ids,
            });
        }
    }
    groups
}

/// Group `results` by WCAG definition, in the order definitions are given.
pub fn group_by_wcag(
    results: &[check_result::Model],
    definitions: &[wcag_definition::Model],
) -> Vec<IssueGroup> {
    let mut groups = Vec::new();
    for definition in definitions {
        let ids: Vec<Uuid> = results
            .iter()
            .filter(|r| r.wcag_definition_id == definition.id)
            .map(|r| r.id)
            .collect();
        if !ids.is_empty() {
            groups.push(IssueGroup {
                key: definition.id,
                label: definition.name.clone(),
                count: ids.len(),
                check_result_ids: ids,
            });
        }
    }
    groups
}

/// Testable pages of the audit, in creation order.
async fn testable_pages<C: ConnectionTrait>(conn: &C, audit_id: Uuid) -> AppResult<Vec<page::Model>> {
    Ok(db::pages::list_active_pages(conn, audit_id)
        .await?
        .into_iter()
        .filter(page::Model::is_testable)
        .collect())
}

/// Failed, active check results on testable pages.
///
/// The "all pages" page, removed pages and pages marked not found never count.
pub async fn failed_check_results<C: ConnectionTrait>(
    conn: &C,
    audit_id: Uuid,
) -> AppResult<Vec<check_result::Model>> {
    let testable: HashSet<Uuid> = testable_pages(conn, audit_id)
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();
    Ok(db::check_results::list_failed_for_audit(conn, audit_id)
        .await?
        .into_iter()
        .filter(|r| testable.contains(&r.page_id))
        .collect())
}

/// Failed results whose latest retest outcome is anything but fixed.
pub async fn unfixed_check_results<C: ConnectionTrait>(
    conn: &C,
    audit: &audit::Model,
) -> AppResult<Vec<check_result::Model>> {
    let failed = failed_check_results(conn, audit.id).await?;
    let retests = db::retests::list_active_retests_for_case(conn, audit.case_id).await?;
    let retest_ids: Vec<Uuid> = retests.iter().map(|r| r.id).collect();
    let copies = db::retests::list_check_results(conn, &retest_ids).await?;
    let outcomes = check_result_outcomes(&retests, &copies)?;

    Ok(failed
        .into_iter()
        .filter(|r| is_unfixed(&outcomes, r.id))
        .collect())
}

/// Share of failed check results fixed at the latest retest.
pub async fn percentage_fixed<C: ConnectionTrait>(conn: &C, audit: &audit::Model) -> AppResult<u8> {
    let total = failed_check_results(conn, audit.id).await?.len();
    let unfixed = unfixed_check_results(conn, audit).await?.len();
    Ok(percentage(total - unfixed, total))
}

/// Failing statement answers and custom statement issues.
pub async fn failed_statement_check_results<C: ConnectionTrait>(
    conn: &C,
    audit_id: Uuid,
) -> AppResult<Vec<statement_check_result::Model>> {
    Ok(db::statements::list_results_for_audit(conn, audit_id)
        .await?
        .into_iter()
        .filter(statement_check_result::Model::is_issue)
        .collect())
}

/// Share of statement issues fixed at the latest retest.
pub async fn statement_errors_fixed_percentage<C: ConnectionTrait>(
    conn: &C,
    audit: &audit::Model,
) -> AppResult<u8> {
    let failed = failed_statement_check_results(conn, audit.id).await?;
    let retests = db::retests::list_active_retests_for_case(conn, audit.case_id).await?;
    let retest_ids: Vec<Uuid> = retests.iter().map(|r| r.id).collect();
    let copies = db::retests::list_statement_check_results(conn, &retest_ids).await?;
    let outcomes = statement_outcomes(&retests, &copies)?;

    let fixed = failed
        .iter()
        .filter(|r| !is_unfixed(&outcomes, r.id))
        .count();
    Ok(percentage(fixed, failed.len()))
}

/// True when the audit has overview answers and every one of them is yes.
pub async fn all_overview_statement_checks_passed<C: ConnectionTrait>(
    conn: &C,
    audit_id: Uuid,
) -> AppResult<bool> {
    let overview: Vec<statement_check_result::Model> =
        db::statements::list_results_for_audit(conn, audit_id)
            .await?
            .into_iter()
            .filter(|r| r.check_type == StatementCheckType::Overview.as_str())
            .collect();

    Ok(!overview.is_empty()
        && overview
            .iter()
            .all(|r| r.state == StatementResultState::Yes.as_str()))
}

/// Outstanding issues grouped by page or by definition.
pub async fn outstanding_issues(
    pool: &DbPool,
    audit_id: Uuid,
    group_by: GroupBy,
) -> AppResult<OutstandingIssuesResponse> {
    let conn = pool.connection();
    let audit = db::audits::get_active_audit(conn, audit_id).await?;
    let unfixed = unfixed_check_results(conn, &audit).await?;

    let groups = match group_by {
        GroupBy::Page => group_by_page(&unfixed, &testable_pages(conn, audit_id).await?),
        GroupBy::Wcag => {
            group_by_wcag(&unfixed, &db::wcag_definitions::list_definitions(conn).await?)
        }
    };

    Ok(OutstandingIssuesResponse {
        audit_id,
        group_by,
        total: unfixed.len(),
        groups,
    })
}

/// Headline figures for an audit.
pub async fn audit_summary(pool: &DbPool, audit_id: Uuid) -> AppResult<AuditSummary> {
    let conn = pool.connection();
    let audit = db::audits::get_active_audit(conn, audit_id).await?;

    let failed = failed_check_results(conn, audit_id).await?;
    let unfixed = unfixed_check_results(conn, &audit).await?;
    let pages = testable_pages(conn, audit_id).await?;
    let definitions = db::wcag_definitions::list_definitions(conn).await?;

    Ok(AuditSummary {
        audit_id,
        failed_check_results: failed.len(),
        unfixed_check_results: unfixed.len(),
        fixed_check_results: failed.len() - unfixed.len(),
        percentage_fixed: percentage(failed.len() - unfixed.len(), failed.len()),
        failed_statement_checks: failed_statement_check_results(conn, audit_id).await?.len(),
        statement_errors_fixed_percentage: statement_errors_fixed_percentage(conn, &audit)
            .await?,
        all_overview_statement_checks_passed: all_overview_statement_checks_passed(
            conn, audit_id,
        )
        .await?,
        failures_by_page: group_by_page(&failed, &pages),
        failures_by_wcag: group_by_wcag(&failed, &definitions),
    })
}
