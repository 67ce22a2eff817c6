//! Version checks on writes and protected deletes.

use amp_server_lib::db;
use amp_server_lib::error::{AppError, PreconditionFailure};
use amp_server_lib::models::{
    AuditDecisionRequest, AuditMetadata, CheckResultChanges, CreateAuditRequest,
    DisproportionateBurden, StatementCompliance, UpdateCaseRequest, UpdatePageRequest,
};
use amp_server_lib::services;

use super::test_helpers::*;

fn is_conflict(err: &AppError) -> bool {
    matches!(err, AppError::ConcurrentModification(_))
}

/// Two tabs load the same result; the second save is refused and nothing is lost.
#[actix_rt::test]
async fn test_stale_check_result_edit_is_rejected() {
    let pool = create_test_pool().await;
    seed_html_definitions(&pool).await;
    let (_, _, home) = audit_with_home_page(&pool).await;
    let loaded = results_on(&pool, &home).await.remove(0);

    services::check_results::update_check_result(
        &pool,
        loaded.id,
        loaded.version,
        &CheckResultChanges {
            failed: Some(true),
            notes: Some("First tab".to_string()),
        },
    )
    .await
    .unwrap();

    let err = services::check_results::update_check_result(
        &pool,
        loaded.id,
        loaded.version,
        &CheckResultChanges {
            failed: Some(false),
            notes: Some("Second tab".to_string()),
        },
    )
    .await
    .unwrap_err();
    assert!(is_conflict(&err), "{:?}", err);

    let stored = db::check_results::get_active_check_result(pool.connection(), loaded.id)
        .await
        .unwrap();
    assert!(stored.failed);
    assert_eq!(stored.notes, "First tab");
    assert_eq!(stored.version, loaded.version + 1);
}

#[actix_rt::test]
async fn test_stale_page_and_case_edits_are_rejected() {
    let pool = create_test_pool().await;
    let (case, _, home) = audit_with_home_page(&pool).await;

    let renamed = services::check_results::update_page(
        &pool,
        home.id,
        &UpdatePageRequest {
            version: home.version,
            name: Some("Landing".to_string()),
            url: None,
            not_found: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(renamed.version, home.version + 1);

    let err = services::check_results::update_page(
        &pool,
        home.id,
        &UpdatePageRequest {
            version: home.version,
            name: Some("Start".to_string()),
            url: None,
            not_found: None,
        },
    )
    .await
    .unwrap_err();
    assert!(is_conflict(&err));

    let case = services::cases::get_case(&pool, case.id).await.unwrap();
    services::cases::update_case(
        &pool,
        case.id,
        &UpdateCaseRequest {
            version: case.version,
            auditor: Some("someone else".to_string()),
            ..UpdateCaseRequest::default()
        },
    )
    .await
    .unwrap();
    let err = services::cases::update_case(
        &pool,
        case.id,
        &UpdateCaseRequest {
            version: case.version,
            compliance_notes: Some("late".to_string()),
            ..UpdateCaseRequest::default()
        },
    )
    .await
    .unwrap_err();
    assert!(is_conflict(&err));
}

#[actix_rt::test]
async fn test_stale_audit_metadata_is_rejected() {
    let pool = create_test_pool().await;
    let (_, audit, _) = audit_with_home_page(&pool).await;

    let metadata = AuditMetadata {
        description: "Desktop run".to_string(),
        ..AuditMetadata::default()
    };
    let updated = services::audits::update_audit_metadata(&pool, audit.id, audit.version, &metadata)
        .await
        .unwrap();
    assert_eq!(updated.description, "Desktop run");

    let err = services::audits::update_audit_metadata(&pool, audit.id, audit.version, &metadata)
        .await
        .unwrap_err();
    assert!(is_conflict(&err));

    let err = services::audits::complete_audit(&pool, audit.id, audit.version)
        .await
        .unwrap_err();
    assert!(is_conflict(&err));
}

#[actix_rt::test]
async fn test_moving_the_cursor_keeps_the_audit_version() {
    let pool = create_test_pool().await;
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
    let version = created.audit.version;

    let last = created.pages.last().unwrap();
    let cursor = services::wizard::move_cursor(&pool, created.audit.id, Some(last.id))
        .await
        .unwrap();
    assert_eq!(cursor.next_page_id, Some(last.id));
    services::wizard::move_cursor(&pool, created.audit.id, None)
        .await
        .unwrap();

    let audit = services::audits::get_audit_detail(&pool, created.audit.id)
        .await
        .unwrap()
        .audit;
    assert_eq!(audit.version, version);
    assert_eq!(audit.next_page_id, None);

    // An editor holding the pre-navigation version can still save.
    services::audits::update_audit_metadata(&pool, audit.id, version, &AuditMetadata::default())
        .await
        .unwrap();
}

#[actix_rt::test]
async fn test_cursor_rejects_pages_of_other_audits() {
    let pool = create_test_pool().await;
    let (_, audit, _) = audit_with_home_page(&pool).await;
    let (_, _, foreign) = audit_with_home_page(&pool).await;

    let err = services::wizard::move_cursor(&pool, audit.id, Some(foreign.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[actix_rt::test]
async fn test_audit_delete_is_protected_by_pages() {
    let pool = create_test_pool().await;
    let (case, audit, home) = audit_with_home_page(&pool).await;

    let err = services::audits::delete_audit(&pool, audit.id, audit.version)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Precondition(PreconditionFailure::HasActiveChildren { count: 1, .. })
    ));

    let err = services::cases::delete_case(&pool, case.id, case.version)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Precondition(PreconditionFailure::HasActiveChildren {
            children: "audits",
            ..
        })
    ));

    services::check_results::remove_page(&pool, home.id, home.version)
        .await
        .unwrap();
    services::audits::delete_audit(&pool, audit.id, audit.version)
        .await
        .unwrap();

    let case = services::cases::get_case(&pool, case.id).await.unwrap();
    services::cases::delete_case(&pool, case.id, case.version)
        .await
        .unwrap();
    let err = services::cases::get_case(&pool, case.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[actix_rt::test]
async fn test_one_active_audit_per_case() {
    let pool = create_test_pool().await;
    let case = create_case(&pool).await;
    create_bare_audit(&pool, case.id).await;

    let err = services::audits::create_audit(&pool, case.id, &CreateAuditRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Precondition(PreconditionFailure::AuditAlreadyExists(_))
    ));
}

/// Two requests that both saw no live audit: the store lets only one through.
#[actix_rt::test]
async fn test_store_refuses_second_live_audit() {
    let pool = create_test_pool().await;
    let case = create_case(&pool).await;
    let first = create_bare_audit(&pool, case.id).await;

    let err = db::audits::insert_audit(pool.connection(), case.id, &AuditMetadata::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Precondition(PreconditionFailure::AuditAlreadyExists(id)) if id == case.id
    ));
    assert_eq!(
        db::audits::count_active_audits_for_case(pool.connection(), case.id)
            .await
            .unwrap(),
        1
    );

    // Deleted audits do not hold the slot.
    services::audits::delete_audit(&pool, first.id, first.version)
        .await
        .unwrap();
    let second = create_bare_audit(&pool, case.id).await;
    assert_ne!(second.id, first.id);
}

/// The initial-test decisions are versioned like the metadata.
#[actix_rt::test]
async fn test_stale_audit_decision_is_rejected() {
    let pool = create_test_pool().await;
    let case = create_case(&pool).await;
    let audit = create_bare_audit(&pool, case.id).await;

    let updated = services::audits::update_audit_decision(
        &pool,
        audit.id,
        &AuditDecisionRequest {
            version: audit.version,
            disproportionate_burden: Some(DisproportionateBurden::NoClaim),
            disproportionate_burden_notes: None,
            statement_compliance: Some(StatementCompliance::NotCompliant),
            statement_compliance_notes: Some("No feedback section".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.version, audit.version + 1);
    assert_eq!(updated.disproportionate_burden, "no-claim");
    assert_eq!(updated.statement_compliance, "not-compliant");
    assert_eq!(updated.statement_compliance_notes, "No feedback section");

    let err = services::audits::update_audit_decision(
        &pool,
        audit.id,
        &AuditDecisionRequest {
            version: audit.version,
            disproportionate_burden: None,
            disproportionate_burden_notes: Some("Late edit".to_string()),
            statement_compliance: None,
            statement_compliance_notes: None,
        },
    )
    .await
    .unwrap_err();
    assert!(is_conflict(&err));

    let err = services::audits::update_audit_decision(
        &pool,
        audit.id,
        &AuditDecisionRequest {
            version: updated.version,
            disproportionate_burden: None,
            disproportionate_burden_notes: None,
            statement_compliance: None,
            statement_compliance_notes: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[actix_rt::test]
async fn test_standard_pages_only_on_empty_audit() {
    let pool = create_test_pool().await;
    let case = create_case(&pool).await;
    let audit = create_bare_audit(&pool, case.id).await;

    let pages = services::audits::create_standard_pages(&pool, audit.id)
        .await
        .unwrap();
    assert_eq!(pages.len(), 6);

    let err = services::audits::create_standard_pages(&pool, audit.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Precondition(PreconditionFailure::InvalidState(_))
    ));
}

#[actix_rt::test]
async fn test_racing_writers_have_one_winner() {
    let pool = create_test_pool().await;
    seed_html_definitions(&pool).await;
    let (_, _, home) = audit_with_home_page(&pool).await;
    let loaded = results_on(&pool, &home).await.remove(0);

    let fail = CheckResultChanges {
        failed: Some(true),
        notes: None,
    };
    let annotate = CheckResultChanges {
        failed: None,
        notes: Some("Checked with a screen reader".to_string()),
    };
    let (first, second) = tokio::join!(
        services::check_results::update_check_result(&pool, loaded.id, loaded.version, &fail),
        services::check_results::update_check_result(&pool, loaded.id, loaded.version, &annotate),
    );

    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        outcomes
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(is_conflict)
    );

    let stored = db::check_results::get_active_check_result(pool.connection(), loaded.id)
        .await
        .unwrap();
    assert_eq!(stored.version, loaded.version + 1);
}
