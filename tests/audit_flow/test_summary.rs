//! Aggregates computed over a live audit.

use amp_server_lib::models::{
    AuditMetadata, CheckResultChanges, CreateAuditRequest, GroupBy, PageRole, PageType,
    RetestOutcome, UpdateRetestCheckResultRequest,
};
use amp_server_lib::services;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_summary_without_failures_is_fully_fixed() {
    let pool = create_test_pool().await;
    seed_html_definitions(&pool).await;
    let (_, audit, _) = audit_with_home_page(&pool).await;

    let summary = services::summary::audit_summary(&pool, audit.id).await.unwrap();
    assert_eq!(summary.failed_check_results, 0);
    assert_eq!(summary.percentage_fixed, 100);
    assert_eq!(summary.statement_errors_fixed_percentage, 100);
    assert!(!summary.all_overview_statement_checks_passed);
    assert!(summary.failures_by_page.is_empty());
}

#[actix_rt::test]
async fn test_all_pages_page_is_never_counted() {
    let pool = create_test_pool().await;
    seed_html_definitions(&pool).await;
    let case = create_case(&pool).await;
    let created = services::audits::create_audit(
        &pool,
        case.id,
        &CreateAuditRequest {
            metadata: AuditMetadata::default(),
            standard_pages: true,
        },
    )
    .await
    .unwrap();
    let all = created
        .pages
        .iter()
        .find(|p| p.role().unwrap() == PageRole::AggregateAll)
        .unwrap();

    // Cursor is on the home page, so nothing is mirrored.
    fail_all(&pool, all).await;

    let summary = services::summary::audit_summary(&pool, created.audit.id)
        .await
        .unwrap();
    assert_eq!(summary.failed_check_results, 0);
}

#[actix_rt::test]
async fn test_groupings_match_the_ungrouped_total() {
    let pool = create_test_pool().await;
    let definitions = seed_html_definitions(&pool).await;
    let (_, audit, home) = audit_with_home_page(&pool).await;
    let contact =
        add_page(&pool, audit.id, PageType::Contact, "https://www.example.gov.uk/contact").await;
    fail_all(&pool, &home).await;
    let first_on_contact = results_on(&pool, &contact)
        .await
        .into_iter()
        .find(|r| r.wcag_definition_id == definitions[0].id)
        .unwrap();
    services::check_results::update_check_result(
        &pool,
        first_on_contact.id,
        first_on_contact.version,
        &CheckResultChanges {
            failed: Some(true),
            notes: None,
        },
    )
    .await
    .unwrap();

    let summary = services::summary::audit_summary(&pool, audit.id).await.unwrap();
    assert_eq!(summary.failed_check_results, 3);
    let by_page: usize = summary.failures_by_page.iter().map(|g| g.count).sum();
    let by_wcag: usize = summary.failures_by_wcag.iter().map(|g| g.count).sum();
    assert_eq!(by_page, 3);
    assert_eq!(by_wcag, 3);

    let by_page = services::summary::outstanding_issues(&pool, audit.id, GroupBy::Page)
        .await
        .unwrap();
    assert_eq!(by_page.total, 3);
    assert_eq!(by_page.groups.len(), 2);
    assert_eq!(by_page.groups[0].key, home.id);
    assert_eq!(by_page.groups[0].count, 2);
    assert_eq!(by_page.groups[1].key, contact.id);

    let by_wcag = services::summary::outstanding_issues(&pool, audit.id, GroupBy::Wcag)
        .await
        .unwrap();
    assert_eq!(by_wcag.total, 3);
    let first = by_wcag
        .groups
        .iter()
        .find(|g| g.key == definitions[0].id)
        .unwrap();
    assert_eq!(first.count, 2);
    assert_eq!(first.label, definitions[0].name);
}

#[actix_rt::test]
async fn test_outstanding_issues_drop_fixed_results() {
    let pool = create_test_pool().await;
    seed_html_definitions(&pool).await;
    let (case, audit, home) = audit_with_home_page(&pool).await;
    fail_all(&pool, &home).await;
    complete(&pool, audit.id).await;
    let snapshot = services::retests::start_retest(&pool, case.id).await.unwrap();

    let copy = &snapshot.check_results[0];
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

    let outstanding = services::summary::outstanding_issues(&pool, audit.id, GroupBy::Page)
        .await
        .unwrap();
    assert_eq!(outstanding.total, 1);
    assert!(
        outstanding.groups[0]
            .check_result_ids
            .iter()
            .all(|id| *id != copy.check_result_id)
    );

    let summary = services::summary::audit_summary(&pool, audit.id).await.unwrap();
    assert_eq!(summary.failed_check_results, 2);
    assert_eq!(summary.fixed_check_results, 1);
    assert_eq!(summary.percentage_fixed, 50);
}
