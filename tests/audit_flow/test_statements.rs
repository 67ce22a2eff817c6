//! Accessibility statement answers and custom issues.

use amp_server_lib::db::DbPool;
use amp_server_lib::entity::statement_check;
use amp_server_lib::error::{AppError, PreconditionFailure};
use amp_server_lib::models::{
    AddCustomIssueRequest, NewStatementCheck, SaveAction, StatementCheckType,
    StatementResultState, UpdateStatementCheckResultRequest, WizardStep,
};
use amp_server_lib::services;
use chrono::NaiveDate;

use super::test_helpers::*;

async fn seed_check(
    pool: &DbPool,
    check_type: StatementCheckType,
    label: &str,
    position: i32,
) -> statement_check::Model {
    services::reference::add_statement_check(
        pool,
        &NewStatementCheck {
            check_type,
            label: label.to_string(),
            success_criteria: String::new(),
            report_text: String::new(),
            position,
            date_start: None,
            date_end: None,
        },
    )
    .await
    .expect("Failed to seed statement check")
}

async fn seed_overview(pool: &DbPool) -> Vec<statement_check::Model> {
    vec![
        seed_check(pool, StatementCheckType::Overview, "Statement exists", 1).await,
        seed_check(pool, StatementCheckType::Overview, "Statement is in the correct format", 2)
            .await,
        seed_check(pool, StatementCheckType::Website, "Scope covers the website", 3).await,
    ]
}

async fn answer(
    pool: &DbPool,
    audit_id: uuid::Uuid,
    check_id: uuid::Uuid,
    state: StatementResultState,
) {
    let result = services::statements::list_statement_check_results(pool, audit_id)
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.statement_check_id == Some(check_id))
        .unwrap();
    services::statements::update_statement_check_result(
        pool,
        result.id,
        &UpdateStatementCheckResultRequest {
            version: result.version,
            state,
            report_comment: None,
        },
    )
    .await
    .unwrap();
}

#[actix_rt::test]
async fn test_results_created_once_per_check() {
    let pool = create_test_pool().await;
    let checks = seed_overview(&pool).await;
    services::reference::add_statement_check(
        &pool,
        &NewStatementCheck {
            check_type: StatementCheckType::Feedback,
            label: "Retired question".to_string(),
            success_criteria: String::new(),
            report_text: String::new(),
            position: 4,
            date_start: None,
            date_end: NaiveDate::from_ymd_opt(2000, 1, 1),
        },
    )
    .await
    .unwrap();

    let (_, audit, _) = audit_with_home_page(&pool).await;
    let results = services::statements::list_statement_check_results(&pool, audit.id)
        .await
        .unwrap();
    assert_eq!(results.len(), checks.len());
    assert!(
        results
            .iter()
            .all(|r| r.state == StatementResultState::NotTested.as_str())
    );

    let created = services::statements::ensure_statement_check_results(&pool, audit.id)
        .await
        .unwrap();
    assert!(created.is_empty());
}

#[actix_rt::test]
async fn test_custom_issues_stay_failures() {
    let pool = create_test_pool().await;
    seed_overview(&pool).await;
    let (_, audit, _) = audit_with_home_page(&pool).await;

    let err = services::statements::add_custom_statement_issue(
        &pool,
        audit.id,
        &AddCustomIssueRequest {
            report_comment: "   ".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let issue = services::statements::add_custom_statement_issue(
        &pool,
        audit.id,
        &AddCustomIssueRequest {
            report_comment: "Contact details are out of date".to_string(),
        },
    )
    .await
    .unwrap();
    assert_eq!(issue.state, StatementResultState::No.as_str());
    assert!(issue.is_custom());

    let err = services::statements::update_statement_check_result(
        &pool,
        issue.id,
        &UpdateStatementCheckResultRequest {
            version: issue.version,
            state: StatementResultState::Yes,
            report_comment: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let results = services::statements::list_statement_check_results(&pool, audit.id)
        .await
        .unwrap();
    assert_eq!(results.last().map(|r| r.id), Some(issue.id));

    let failed = services::summary::failed_statement_check_results(pool.connection(), audit.id)
        .await
        .unwrap();
    assert_eq!(failed.len(), 1);
}

#[actix_rt::test]
async fn test_only_custom_issues_can_be_removed() {
    let pool = create_test_pool().await;
    seed_overview(&pool).await;
    let (_, audit, _) = audit_with_home_page(&pool).await;
    let answer = services::statements::list_statement_check_results(&pool, audit.id)
        .await
        .unwrap()
        .remove(0);

    let err =
        services::statements::remove_custom_statement_issue(&pool, answer.id, answer.version)
            .await
            .unwrap_err();
    assert!(matches!(
        err,
        AppError::Precondition(PreconditionFailure::InvalidState(_))
    ));

    let issue = services::statements::add_custom_statement_issue(
        &pool,
        audit.id,
        &AddCustomIssueRequest {
            report_comment: "No date of last review".to_string(),
        },
    )
    .await
    .unwrap();
    services::statements::remove_custom_statement_issue(&pool, issue.id, issue.version)
        .await
        .unwrap();

    let remaining = services::statements::list_statement_check_results(&pool, audit.id)
        .await
        .unwrap();
    assert!(remaining.iter().all(|r| r.id != issue.id));
}

/// Statement sections past the overview are only offered when every overview answer is yes.
#[actix_rt::test]
async fn test_overview_gates_the_statement_wizard() {
    let pool = create_test_pool().await;
    let checks = seed_overview(&pool).await;
    let (_, audit, _) = audit_with_home_page(&pool).await;
    let conn = pool.connection();

    assert!(
        !services::summary::all_overview_statement_checks_passed(conn, audit.id)
            .await
            .unwrap()
    );

    answer(&pool, audit.id, checks[0].id, StatementResultState::Yes).await;
    answer(&pool, audit.id, checks[1].id, StatementResultState::No).await;
    assert!(
        !services::summary::all_overview_statement_checks_passed(conn, audit.id)
            .await
            .unwrap()
    );
    let next = services::wizard::advance_section(
        &pool,
        audit.id,
        WizardStep::StatementOverview,
        SaveAction::SaveContinue,
    )
    .await
    .unwrap();
    assert_eq!(next, WizardStep::Summary);

    answer(&pool, audit.id, checks[1].id, StatementResultState::Yes).await;
    assert!(
        services::summary::all_overview_statement_checks_passed(conn, audit.id)
            .await
            .unwrap()
    );
    let next = services::wizard::advance_section(
        &pool,
        audit.id,
        WizardStep::StatementOverview,
        SaveAction::SaveContinue,
    )
    .await
    .unwrap();
    assert_eq!(next, WizardStep::StatementWebsite);
}

#[actix_rt::test]
async fn test_failing_answer_counts_as_issue() {
    let pool = create_test_pool().await;
    let checks = seed_overview(&pool).await;
    let (_, audit, _) = audit_with_home_page(&pool).await;

    answer(&pool, audit.id, checks[2].id, StatementResultState::No).await;
    let failed = services::summary::failed_statement_check_results(pool.connection(), audit.id)
        .await
        .unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].statement_check_id, Some(checks[2].id));
}
