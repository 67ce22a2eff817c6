//! Retest builder: snapshotting a completed audit and recording outcomes.

use amp_server_lib::db;
use amp_server_lib::entity::{retest_check_result, retest_page};
use amp_server_lib::error::{AppError, PreconditionFailure};
use amp_server_lib::models::{
    AddCustomIssueRequest, PageType, RetestOutcome, UpdatePageRequest,
    UpdateRetestCheckResultRequest, UpdateRetestStatementCheckResultRequest,
};
use amp_server_lib::services;
use chrono::Utc;
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait};

use super::test_helpers::*;

#[actix_rt::test]
async fn test_retest_snapshots_failed_results() {
    let pool = create_test_pool().await;
    seed_html_definitions(&pool).await;
    let (case, audit, home) = audit_with_home_page(&pool).await;
    fail_all(&pool, &home).await;
    let audit = complete(&pool, audit.id).await;

    let snapshot = services::retests::start_retest(&pool, case.id).await.unwrap();

    assert_eq!(snapshot.retest.sequence, 1);
    assert_eq!(snapshot.pages.len(), 1);
    assert_eq!(snapshot.pages[0].page_id, home.id);
    assert_eq!(snapshot.check_results.len(), 2);
    assert!(
        snapshot
            .check_results
            .iter()
            .all(|r| r.outcome == RetestOutcome::NotRetested.as_str()
                && r.retest_page_id == snapshot.pages[0].id)
    );

    let conn = pool.connection();
    assert_eq!(
        services::summary::percentage_fixed(conn, &audit).await.unwrap(),
        0
    );
    assert_eq!(
        services::summary::unfixed_check_results(conn, &audit)
            .await
            .unwrap()
            .len(),
        2
    );
}

#[actix_rt::test]
async fn test_fixing_one_of_two_gives_fifty_percent() {
    let pool = create_test_pool().await;
    seed_html_definitions(&pool).await;
    let (case, audit, home) = audit_with_home_page(&pool).await;
    fail_all(&pool, &home).await;
    let audit = complete(&pool, audit.id).await;
    let snapshot = services::retests::start_retest(&pool, case.id).await.unwrap();

    let copy = &snapshot.check_results[0];
    let updated = services::retests::update_retest_check_result(
        &pool,
        copy.id,
        &UpdateRetestCheckResultRequest {
            version: copy.version,
            outcome: RetestOutcome::Fixed,
            retest_notes: Some("Alt text added".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.outcome, RetestOutcome::Fixed.as_str());
    assert_eq!(updated.version, copy.version + 1);

    let conn = pool.connection();
    assert_eq!(
        services::summary::percentage_fixed(conn, &audit).await.unwrap(),
        50
    );
    let unfixed = services::summary::unfixed_check_results(conn, &audit)
        .await
        .unwrap();
    assert_eq!(unfixed.len(), 1);
    assert_ne!(unfixed[0].id, copy.check_result_id);
}

#[actix_rt::test]
async fn test_one_active_retest_per_case() {
    let pool = create_test_pool().await;
    seed_html_definitions(&pool).await;
    let (case, audit, home) = audit_with_home_page(&pool).await;
    fail_all(&pool, &home).await;
    complete(&pool, audit.id).await;

    let first = services::retests::start_retest(&pool, case.id).await.unwrap();
    let err = services::retests::start_retest(&pool, case.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Precondition(PreconditionFailure::RetestAlreadyExists(id)) if id == case.id
    ));

    services::retests::delete_retest(&pool, first.retest.id, first.retest.version)
        .await
        .unwrap();
    let second = services::retests::start_retest(&pool, case.id).await.unwrap();
    assert_eq!(second.retest.sequence, 2);

    // The deleted retest stays readable, and cannot come back while the second is live.
    let deleted = services::retests::get_retest_detail(&pool, first.retest.id)
        .await
        .unwrap();
    assert!(deleted.retest.deleted_at.is_some());
    let err = services::retests::restore_retest(&pool, first.retest.id, deleted.retest.version)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Precondition(PreconditionFailure::RetestAlreadyExists(_))
    ));
}

#[actix_rt::test]
async fn test_retest_needs_completed_audit() {
    let pool = create_test_pool().await;
    seed_html_definitions(&pool).await;
    let (case, _, home) = audit_with_home_page(&pool).await;
    fail_all(&pool, &home).await;

    let err = services::retests::start_retest(&pool, case.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Precondition(PreconditionFailure::NoCompletedAudit(id)) if id == case.id
    ));

    let no_audit = create_case(&pool).await;
    let err = services::retests::start_retest(&pool, no_audit.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Precondition(PreconditionFailure::NoCompletedAudit(_))
    ));
}

/// Pages without failures are still listed; missing and removed pages are not.
#[actix_rt::test]
async fn test_snapshot_page_selection() {
    let pool = create_test_pool().await;
    seed_html_definitions(&pool).await;
    let (case, audit, home) = audit_with_home_page(&pool).await;
    let contact =
        add_page(&pool, audit.id, PageType::Contact, "https://www.example.gov.uk/contact").await;
    let missing =
        add_page(&pool, audit.id, PageType::Extra, "https://www.example.gov.uk/gone").await;
    let removed =
        add_page(&pool, audit.id, PageType::Form, "https://www.example.gov.uk/apply").await;
    fail_all(&pool, &home).await;
    fail_all(&pool, &missing).await;
    fail_all(&pool, &removed).await;

    let missing = db::pages::get_active_page(pool.connection(), missing.id)
        .await
        .unwrap();
    services::check_results::update_page(
        &pool,
        missing.id,
        &UpdatePageRequest {
            version: missing.version,
            name: None,
            url: None,
            not_found: Some(true),
        },
    )
    .await
    .unwrap();
    let removed = db::pages::get_active_page(pool.connection(), removed.id)
        .await
        .unwrap();
    services::check_results::remove_page(&pool, removed.id, removed.version)
        .await
        .unwrap();
    complete(&pool, audit.id).await;

    let snapshot = services::retests::start_retest(&pool, case.id).await.unwrap();

    let mut page_ids: Vec<_> = snapshot.pages.iter().map(|p| p.page_id).collect();
    page_ids.sort();
    let mut expected = vec![home.id, contact.id];
    expected.sort();
    assert_eq!(page_ids, expected);
    assert_eq!(snapshot.check_results.len(), 2);
}

#[actix_rt::test]
async fn test_statement_issues_are_carried_into_retest() {
    let pool = create_test_pool().await;
    let (case, audit, _) = audit_with_home_page(&pool).await;
    services::statements::add_custom_statement_issue(
        &pool,
        audit.id,
        &AddCustomIssueRequest {
            report_comment: "No feedback mechanism".to_string(),
        },
    )
    .await
    .unwrap();
    let audit = complete(&pool, audit.id).await;

    let snapshot = services::retests::start_retest(&pool, case.id).await.unwrap();
    assert_eq!(snapshot.statement_check_results.len(), 1);
    let copy = &snapshot.statement_check_results[0];
    assert_eq!(copy.comment, "No feedback mechanism");
    assert!(copy.statement_check_id.is_none());

    let conn = pool.connection();
    assert_eq!(
        services::summary::statement_errors_fixed_percentage(conn, &audit)
            .await
            .unwrap(),
        0
    );

    services::retests::update_retest_statement_check_result(
        &pool,
        copy.id,
        &UpdateRetestStatementCheckResultRequest {
            version: copy.version,
            outcome: RetestOutcome::Fixed,
            retest_comment: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(
        services::summary::statement_errors_fixed_percentage(conn, &audit)
            .await
            .unwrap(),
        100
    );
}

#[actix_rt::test]
async fn test_deleted_retest_rejects_edits() {
    let pool = create_test_pool().await;
    seed_html_definitions(&pool).await;
    let (case, audit, home) = audit_with_home_page(&pool).await;
    fail_all(&pool, &home).await;
    let audit = complete(&pool, audit.id).await;
    let snapshot = services::retests::start_retest(&pool, case.id).await.unwrap();

    services::retests::delete_retest(&pool, snapshot.retest.id, snapshot.retest.version)
        .await
        .unwrap();

    let copy = &snapshot.check_results[0];
    let err = services::retests::update_retest_check_result(
        &pool,
        copy.id,
        &UpdateRetestCheckResultRequest {
            version: copy.version,
            outcome: RetestOutcome::Fixed,
            retest_notes: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // Deleted retests no longer count towards the summary.
    assert_eq!(
        services::summary::percentage_fixed(pool.connection(), &audit)
            .await
            .unwrap(),
        0
    );
}

/// The newest retest decides the outcome of an issue.
#[actix_rt::test]
async fn test_latest_retest_outcome_wins() {
    let pool = create_test_pool().await;
    seed_html_definitions(&pool).await;
    let (case, audit, home) = audit_with_home_page(&pool).await;
    fail_all(&pool, &home).await;
    let audit = complete(&pool, audit.id).await;

    let first = services::retests::start_retest(&pool, case.id).await.unwrap();
    for copy in &first.check_results {
        services::retests::update_retest_check_result(
            &pool,
            copy.id,
            &UpdateRetestCheckResultRequest {
                version: copy.version,
                outcome: RetestOutcome::Fixed,
                retest_notes: None,
            },
        )
        .await
        .unwrap();
    }
    assert_eq!(
        services::summary::percentage_fixed(pool.connection(), &audit)
            .await
            .unwrap(),
        100
    );

    services::retests::delete_retest(&pool, first.retest.id, first.retest.version)
        .await
        .unwrap();
    let second = services::retests::start_retest(&pool, case.id).await.unwrap();
    assert_eq!(second.check_results.len(), 2);
    assert_eq!(
        services::summary::percentage_fixed(pool.connection(), &audit)
            .await
            .unwrap(),
        0
    );
}

/// Results created after the retest started have no copy and count as unfixed.
#[actix_rt::test]
async fn test_results_added_after_retest_are_not_copied() {
    let pool = create_test_pool().await;
    seed_html_definitions(&pool).await;
    let (case, audit, home) = audit_with_home_page(&pool).await;
    fail_all(&pool, &home).await;
    let audit = complete(&pool, audit.id).await;
    let snapshot = services::retests::start_retest(&pool, case.id).await.unwrap();
    for copy in &snapshot.check_results {
        services::retests::update_retest_check_result(
            &pool,
            copy.id,
            &UpdateRetestCheckResultRequest {
                version: copy.version,
                outcome: RetestOutcome::Fixed,
                retest_notes: None,
            },
        )
        .await
        .unwrap();
    }

    let contact =
        add_page(&pool, audit.id, PageType::Contact, "https://www.example.gov.uk/contact").await;
    fail_all(&pool, &contact).await;

    let detail = services::retests::get_retest_detail(&pool, snapshot.retest.id)
        .await
        .unwrap();
    assert_eq!(detail.pages.len(), 1);
    assert_eq!(detail.check_results.len(), 2);
    let contact_results: Vec<_> = results_on(&pool, &contact)
        .await
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert!(
        detail
            .check_results
            .iter()
            .all(|copy| !contact_results.contains(&copy.check_result_id))
    );

    let conn = pool.connection();
    let unfixed = services::summary::unfixed_check_results(conn, &audit)
        .await
        .unwrap();
    assert_eq!(unfixed.len(), 2);
    assert!(unfixed.iter().all(|r| r.page_id == contact.id));
    assert_eq!(
        services::summary::percentage_fixed(conn, &audit).await.unwrap(),
        50
    );
}

/// A copy failing part way through leaves no retest behind.
#[actix_rt::test]
async fn test_failed_snapshot_leaves_nothing_behind() {
    let pool = create_test_pool().await;
    seed_html_definitions(&pool).await;
    let (case, audit, home) = audit_with_home_page(&pool).await;
    fail_all(&pool, &home).await;
    services::statements::add_custom_statement_issue(
        &pool,
        audit.id,
        &AddCustomIssueRequest {
            report_comment: "Statement is out of date".to_string(),
        },
    )
    .await
    .unwrap();
    complete(&pool, audit.id).await;

    // Statement issues are copied last, after the retest, its pages and its check results.
    let conn = pool.connection();
    conn.execute_unprepared("DROP TABLE retest_statement_check_results")
        .await
        .unwrap();

    let err = services::retests::start_retest(&pool, case.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Database(_)));

    assert_eq!(db::retests::count_retests_for_case(conn, case.id).await.unwrap(), 0);
    assert_eq!(retest_page::Entity::find().count(conn).await.unwrap(), 0);
    assert_eq!(retest_check_result::Entity::find().count(conn).await.unwrap(), 0);
}

/// Losing the race for the next sequence number reads as an existing retest.
#[actix_rt::test]
async fn test_sequence_clash_is_reported_as_existing_retest() {
    let pool = create_test_pool().await;
    seed_html_definitions(&pool).await;
    let (case, audit, home) = audit_with_home_page(&pool).await;
    fail_all(&pool, &home).await;
    complete(&pool, audit.id).await;

    // A writer that committed sequence 2 after this request counted one retest.
    let conn = pool.connection();
    let taken = db::retests::insert_retest(conn, case.id, 2, Utc::now())
        .await
        .unwrap();
    db::retests::soft_delete_retest(conn, taken.id, taken.version)
        .await
        .unwrap();

    let err = services::retests::start_retest(&pool, case.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Precondition(PreconditionFailure::RetestAlreadyExists(id)) if id == case.id
    ));
    assert_eq!(db::retests::count_retests_for_case(conn, case.id).await.unwrap(), 1);
    assert_eq!(retest_page::Entity::find().count(conn).await.unwrap(), 0);
}

#[actix_rt::test]
async fn test_store_refuses_second_live_retest() {
    let pool = create_test_pool().await;
    seed_html_definitions(&pool).await;
    let (case, audit, home) = audit_with_home_page(&pool).await;
    fail_all(&pool, &home).await;
    complete(&pool, audit.id).await;
    services::retests::start_retest(&pool, case.id).await.unwrap();

    let err = db::retests::insert_retest(pool.connection(), case.id, 7, Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Precondition(PreconditionFailure::RetestAlreadyExists(_))
    ));
}
