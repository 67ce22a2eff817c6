//! Page-by-page checks wizard and its cursor.

use amp_server_lib::db::{self, DbPool};
use amp_server_lib::entity::page;
use amp_server_lib::error::AppError;
use amp_server_lib::models::{
    AuditMetadata, CheckResultChanges, CheckResultEdit, CreateAuditRequest, PageChecksSubmission,
    SaveAction, WizardStep,
};
use amp_server_lib::services;
use amp_server_lib::services::audits::AuditWithPages;

use super::test_helpers::*;

async fn standard_audit(pool: &DbPool) -> AuditWithPages {
    let case = create_case(pool).await;
    services::audits::create_audit(
        pool,
        case.id,
        &CreateAuditRequest {
            metadata: AuditMetadata::default(),
            standard_pages: true,
        },
    )
    .await
    .unwrap()
}

fn submission(page: &page::Model, save_action: SaveAction) -> PageChecksSubmission {
    PageChecksSubmission {
        page_version: page.version,
        complete: None,
        results: Vec::new(),
        save_action,
    }
}

#[actix_rt::test]
async fn test_standard_pages_start_at_home() {
    let pool = create_test_pool().await;
    let created = standard_audit(&pool).await;

    let types: Vec<&str> = created.pages.iter().map(|p| p.page_type.as_str()).collect();
    assert_eq!(types, ["home", "contact", "form", "statement", "pdf", "all"]);

    let cursor = services::wizard::read_cursor(&pool, created.audit.id)
        .await
        .unwrap();
    assert_eq!(cursor.next_page_id, Some(created.pages[0].id));
}

#[actix_rt::test]
async fn test_save_continue_walks_the_pages() {
    let pool = create_test_pool().await;
    seed_html_definitions(&pool).await;
    let created = standard_audit(&pool).await;
    let pages = &created.pages;

    let home_results = results_on(&pool, &pages[0]).await;
    let outcome = services::wizard::submit_page_checks(
        &pool,
        pages[0].id,
        &PageChecksSubmission {
            page_version: pages[0].version,
            complete: Some(true),
            results: vec![CheckResultEdit {
                id: home_results[0].id,
                version: home_results[0].version,
                changes: CheckResultChanges {
                    failed: Some(true),
                    notes: Some("Carousel traps focus".to_string()),
                },
            }],
            save_action: SaveAction::SaveContinue,
        },
    )
    .await
    .unwrap();

    assert_eq!(
        outcome.next,
        WizardStep::PageChecks {
            page_id: pages[1].id
        }
    );
    assert_eq!(outcome.updated.len(), 1);
    assert!(outcome.page.complete_date.is_some());
    assert_eq!(outcome.page.version, pages[0].version + 1);

    let cursor = services::wizard::read_cursor(&pool, created.audit.id)
        .await
        .unwrap();
    assert_eq!(cursor.next_page_id, Some(pages[1].id));
}

#[actix_rt::test]
async fn test_last_page_leads_to_website_decision() {
    let pool = create_test_pool().await;
    let created = standard_audit(&pool).await;
    let all = created.pages.last().unwrap();

    let outcome = services::wizard::submit_page_checks(
        &pool,
        all.id,
        &submission(all, SaveAction::SaveContinue),
    )
    .await
    .unwrap();
    assert_eq!(outcome.next, WizardStep::WebsiteDecision);

    let cursor = services::wizard::read_cursor(&pool, created.audit.id)
        .await
        .unwrap();
    assert_eq!(cursor.next_page_id, None);
}

#[actix_rt::test]
async fn test_save_and_save_exit_leave_the_cursor() {
    let pool = create_test_pool().await;
    let created = standard_audit(&pool).await;
    let contact = &created.pages[1];

    let outcome = services::wizard::submit_page_checks(
        &pool,
        contact.id,
        &submission(contact, SaveAction::Save),
    )
    .await
    .unwrap();
    assert_eq!(
        outcome.next,
        WizardStep::PageChecks {
            page_id: contact.id
        }
    );

    let outcome = services::wizard::submit_page_checks(
        &pool,
        contact.id,
        &submission(contact, SaveAction::SaveExit),
    )
    .await
    .unwrap();
    assert_eq!(outcome.next, WizardStep::Summary);

    let cursor = services::wizard::read_cursor(&pool, created.audit.id)
        .await
        .unwrap();
    assert_eq!(cursor.next_page_id, Some(created.pages[0].id));
}

/// A stale row anywhere in the form leaves every row and the page untouched.
#[actix_rt::test]
async fn test_stale_submission_rolls_back() {
    let pool = create_test_pool().await;
    seed_html_definitions(&pool).await;
    let created = standard_audit(&pool).await;
    let home = &created.pages[0];
    let results = results_on(&pool, home).await;

    services::check_results::update_check_result(
        &pool,
        results[1].id,
        results[1].version,
        &CheckResultChanges {
            failed: None,
            notes: Some("Edited elsewhere".to_string()),
        },
    )
    .await
    .unwrap();

    let edits = results
        .iter()
        .map(|r| CheckResultEdit {
            id: r.id,
            version: r.version,
            changes: CheckResultChanges {
                failed: Some(true),
                notes: None,
            },
        })
        .collect();
    let err = services::wizard::submit_page_checks(
        &pool,
        home.id,
        &PageChecksSubmission {
            page_version: home.version,
            complete: Some(true),
            results: edits,
            save_action: SaveAction::SaveContinue,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::ConcurrentModification(_)));

    let stored = results_on(&pool, home).await;
    assert!(stored.iter().all(|r| !r.failed));
    let page = db::pages::get_active_page(pool.connection(), home.id)
        .await
        .unwrap();
    assert!(page.complete_date.is_none());
    assert_eq!(page.version, home.version);
    let cursor = services::wizard::read_cursor(&pool, created.audit.id)
        .await
        .unwrap();
    assert_eq!(cursor.next_page_id, Some(home.id));
}

#[actix_rt::test]
async fn test_stale_page_version_is_rejected() {
    let pool = create_test_pool().await;
    let created = standard_audit(&pool).await;
    let home = &created.pages[0];

    services::wizard::submit_page_checks(
        &pool,
        home.id,
        &PageChecksSubmission {
            complete: Some(true),
            ..submission(home, SaveAction::Save)
        },
    )
    .await
    .unwrap();

    let err = services::wizard::submit_page_checks(
        &pool,
        home.id,
        &submission(home, SaveAction::Save),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::ConcurrentModification(_)));
}

#[actix_rt::test]
async fn test_advance_from_pages_form_points_at_first_page() {
    let pool = create_test_pool().await;
    let created = standard_audit(&pool).await;
    services::wizard::move_cursor(&pool, created.audit.id, None)
        .await
        .unwrap();

    let next = services::wizard::advance_section(
        &pool,
        created.audit.id,
        WizardStep::Pages,
        SaveAction::SaveContinue,
    )
    .await
    .unwrap();
    assert_eq!(
        next,
        WizardStep::PageChecks {
            page_id: created.pages[0].id
        }
    );
    let cursor = services::wizard::read_cursor(&pool, created.audit.id)
        .await
        .unwrap();
    assert_eq!(cursor.next_page_id, Some(created.pages[0].id));

    let next = services::wizard::advance_section(
        &pool,
        created.audit.id,
        WizardStep::Metadata,
        SaveAction::SaveContinue,
    )
    .await
    .unwrap();
    assert_eq!(next, WizardStep::Pages);
}

#[actix_rt::test]
async fn test_removed_pages_are_skipped() {
    let pool = create_test_pool().await;
    let created = standard_audit(&pool).await;
    let contact = &created.pages[1];
    services::check_results::remove_page(&pool, contact.id, contact.version)
        .await
        .unwrap();

    let home = &created.pages[0];
    let outcome = services::wizard::submit_page_checks(
        &pool,
        home.id,
        &submission(home, SaveAction::SaveContinue),
    )
    .await
    .unwrap();
    assert_eq!(
        outcome.next,
        WizardStep::PageChecks {
            page_id: created.pages[2].id
        }
    );
}

#[actix_rt::test]
async fn test_decision_and_summary_forms_follow_the_statement() {
    let pool = create_test_pool().await;
    let created = standard_audit(&pool).await;
    let audit_id = created.audit.id;

    let mut visited = Vec::new();
    let mut step = WizardStep::WebsiteDecision;
    for _ in 0..2 {
        step = services::wizard::advance_section(&pool, audit_id, step, SaveAction::SaveContinue)
            .await
            .unwrap();
        visited.push(step);
    }
    assert_eq!(
        visited,
        [
            WizardStep::InitialDisproportionateBurden,
            WizardStep::StatementPages
        ]
    );

    let statement_pages = services::audits::list_statement_pages(&pool, audit_id)
        .await
        .unwrap();
    assert_eq!(statement_pages.len(), 1);
    assert_eq!(statement_pages[0].page_type, "statement");

    let mut visited = Vec::new();
    let mut step = WizardStep::StatementCustom;
    while step != WizardStep::Summary {
        step = services::wizard::advance_section(&pool, audit_id, step, SaveAction::SaveContinue)
            .await
            .unwrap();
        visited.push(step);
    }
    assert_eq!(
        visited,
        [
            WizardStep::StatementDecision,
            WizardStep::WcagSummary,
            WizardStep::StatementSummary,
            WizardStep::Summary
        ]
    );
}
