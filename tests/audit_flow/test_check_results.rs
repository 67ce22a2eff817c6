//! Check-result synchronizer: creation, idempotence and "all pages" propagation.

use amp_server_lib::db;
use amp_server_lib::entity::page;
use amp_server_lib::error::AppError;
use amp_server_lib::models::{
    AddPageRequest, AuditMetadata, CheckResultChanges, CreateAuditRequest, NewWcagDefinition,
    PageRole, PageType, TestType, UpdatePageRequest, UpdateWcagDefinitionRequest, WcagSubType,
};
use amp_server_lib::services;
use chrono::NaiveDate;
use uuid::Uuid;

use super::test_helpers::*;

fn page_of(pages: &[page::Model], role: PageRole) -> page::Model {
    pages
        .iter()
        .find(|p| p.role().unwrap() == role)
        .cloned()
        .unwrap_or_else(|| panic!("no {} page", role))
}

/// Adding a home page with one axe and one manual definition gives two passing results.
#[actix_rt::test]
async fn test_adding_page_creates_one_result_per_definition() {
    let pool = create_test_pool().await;
    seed_html_definitions(&pool).await;

    let (_, _, home) = audit_with_home_page(&pool).await;
    let results = results_on(&pool, &home).await;

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| !r.failed));
    assert!(results.iter().all(|r| r.version == 0));
}

#[actix_rt::test]
async fn test_ensure_is_idempotent() {
    let pool = create_test_pool().await;
    seed_html_definitions(&pool).await;
    let (_, audit, home) = audit_with_home_page(&pool).await;

    let created = services::check_results::ensure_check_results_for_audit(&pool, audit.id)
        .await
        .unwrap();
    assert_eq!(created, 0);
    assert_eq!(results_on(&pool, &home).await.len(), 2);

    seed_definition(&pool, TestType::Axe, "1.4.3 Contrast").await;
    let created = services::check_results::ensure_check_results_for_audit(&pool, audit.id)
        .await
        .unwrap();
    assert_eq!(created, 1);

    let created = services::check_results::ensure_check_results_for_audit(&pool, audit.id)
        .await
        .unwrap();
    assert_eq!(created, 0);
    assert_eq!(results_on(&pool, &home).await.len(), 3);
}

#[actix_rt::test]
async fn test_pdf_pages_only_take_pdf_definitions() {
    let pool = create_test_pool().await;
    seed_html_definitions(&pool).await;
    seed_definition(&pool, TestType::Pdf, "PDF tags").await;
    let case = create_case(&pool).await;
    let audit = create_bare_audit(&pool, case.id).await;

    let pdf = add_page(&pool, audit.id, PageType::Pdf, "https://www.example.gov.uk/a.pdf").await;
    let results = results_on(&pool, &pdf).await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].test_type, TestType::Pdf.as_str());

    let home = add_page(&pool, audit.id, PageType::Home, "https://www.example.gov.uk/").await;
    assert!(
        results_on(&pool, &home)
            .await
            .iter()
            .all(|r| r.test_type != TestType::Pdf.as_str())
    );
}

#[actix_rt::test]
async fn test_add_page_rejects_bad_url() {
    let pool = create_test_pool().await;
    let case = create_case(&pool).await;
    let audit = create_bare_audit(&pool, case.id).await;

    let err = services::check_results::add_page(
        &pool,
        audit.id,
        &AddPageRequest {
            page_type: PageType::Extra,
            name: "Search".to_string(),
            url: "not a url".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

/// Edits on the "all pages" page reach html pages only, and never flow back.
#[actix_rt::test]
async fn test_all_pages_edit_propagates_one_way() {
    let pool = create_test_pool().await;
    let definitions = seed_html_definitions(&pool).await;
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
    let pages = created.pages;
    let all = page_of(&pages, PageRole::AggregateAll);
    let home = page_of(&pages, PageRole::Concrete(PageType::Home));
    let contact = page_of(&pages, PageRole::Concrete(PageType::Contact));
    let form = page_of(&pages, PageRole::Concrete(PageType::Form));
    let statement = page_of(&pages, PageRole::Concrete(PageType::Statement));

    services::wizard::move_cursor(&pool, created.audit.id, Some(all.id))
        .await
        .unwrap();

    let on_all = results_on(&pool, &all)
        .await
        .into_iter()
        .find(|r| r.wcag_definition_id == definitions[0].id)
        .unwrap();
    let update = services::check_results::update_check_result(
        &pool,
        on_all.id,
        on_all.version,
        &CheckResultChanges {
            failed: Some(true),
            notes: Some("Images lack alt text".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(update.propagated.len(), 3);

    for target in [&home, &contact, &form] {
        let copy = results_on(&pool, target)
            .await
            .into_iter()
            .find(|r| r.wcag_definition_id == definitions[0].id)
            .unwrap();
        assert!(copy.failed, "{} should receive the edit", target.page_type);
        assert_eq!(copy.notes, "Images lack alt text");
        assert_eq!(copy.version, 1);
    }
    assert!(
        results_on(&pool, &statement)
            .await
            .iter()
            .all(|r| !r.failed),
        "statement page never receives all-pages edits"
    );

    // A concrete page edit stays where it is.
    let on_home = results_on(&pool, &home)
        .await
        .into_iter()
        .find(|r| r.wcag_definition_id == definitions[1].id)
        .unwrap();
    let update = services::check_results::update_check_result(
        &pool,
        on_home.id,
        on_home.version,
        &CheckResultChanges {
            failed: Some(true),
            notes: None,
        },
    )
    .await
    .unwrap();
    assert!(update.propagated.is_empty());
    assert!(
        results_on(&pool, &all)
            .await
            .iter()
            .filter(|r| r.wcag_definition_id == definitions[1].id)
            .all(|r| !r.failed)
    );
    assert!(
        results_on(&pool, &contact)
            .await
            .iter()
            .filter(|r| r.wcag_definition_id == definitions[1].id)
            .all(|r| !r.failed)
    );
}

#[actix_rt::test]
async fn test_all_pages_edit_without_cursor_does_not_propagate() {
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
    let all = page_of(&created.pages, PageRole::AggregateAll);
    let home = page_of(&created.pages, PageRole::Concrete(PageType::Home));
    assert_eq!(created.audit.next_page_id, Some(home.id));

    let on_all = results_on(&pool, &all).await.remove(0);
    let update = services::check_results::update_check_result(
        &pool,
        on_all.id,
        on_all.version,
        &CheckResultChanges {
            failed: Some(true),
            notes: None,
        },
    )
    .await
    .unwrap();

    assert!(update.result.failed);
    assert!(update.propagated.is_empty());
    assert!(results_on(&pool, &home).await.iter().all(|r| !r.failed));
}

#[actix_rt::test]
async fn test_empty_edit_is_rejected() {
    let pool = create_test_pool().await;
    seed_html_definitions(&pool).await;
    let (_, _, home) = audit_with_home_page(&pool).await;
    let result = results_on(&pool, &home).await.remove(0);

    let err = services::check_results::update_check_result(
        &pool,
        result.id,
        result.version,
        &CheckResultChanges::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

/// Removed pages keep their results; restoring fills in definitions added meanwhile.
#[actix_rt::test]
async fn test_remove_and_restore_page() {
    let pool = create_test_pool().await;
    seed_html_definitions(&pool).await;
    let (_, audit, home) = audit_with_home_page(&pool).await;
    fail_all(&pool, &home).await;

    let failed = services::summary::failed_check_results(pool.connection(), audit.id)
        .await
        .unwrap();
    assert_eq!(failed.len(), 2);

    let removed = services::check_results::remove_page(&pool, home.id, home.version)
        .await
        .unwrap();
    assert!(removed.deleted_at.is_some());
    assert!(
        services::summary::failed_check_results(pool.connection(), audit.id)
            .await
            .unwrap()
            .is_empty()
    );

    seed_definition(&pool, TestType::Manual, "3.3.2 Labels").await;
    let restored = services::check_results::restore_page(&pool, home.id, removed.version)
        .await
        .unwrap();
    assert!(restored.deleted_at.is_none());
    assert_eq!(results_on(&pool, &restored).await.len(), 3);
    assert_eq!(
        services::summary::failed_check_results(pool.connection(), audit.id)
            .await
            .unwrap()
            .len(),
        2
    );
}

#[actix_rt::test]
async fn test_not_found_pages_drop_out_of_failures() {
    let pool = create_test_pool().await;
    seed_html_definitions(&pool).await;
    let (_, audit, home) = audit_with_home_page(&pool).await;
    fail_all(&pool, &home).await;

    let home = db::pages::get_active_page(pool.connection(), home.id)
        .await
        .unwrap();
    services::check_results::update_page(
        &pool,
        home.id,
        &UpdatePageRequest {
            version: home.version,
            name: None,
            url: None,
            not_found: Some(true),
        },
    )
    .await
    .unwrap();

    assert!(
        services::summary::failed_check_results(pool.connection(), audit.id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[actix_rt::test]
async fn test_page_checks_form_shows_failures_on_other_pages() {
    let pool = create_test_pool().await;
    let definitions = seed_html_definitions(&pool).await;
    let (_, audit, home) = audit_with_home_page(&pool).await;
    let contact = add_page(&pool, audit.id, PageType::Contact, "https://www.example.gov.uk/contact").await;
    fail_all(&pool, &contact).await;

    let form = services::check_results::page_checks_form(&pool, home.id)
        .await
        .unwrap();
    assert_eq!(form.questions.len(), 2);
    for question in &form.questions {
        assert_eq!(question.other_pages_failed.len(), 1);
        assert_eq!(question.other_pages_failed[0].page_id, contact.id);
    }
    assert!(
        form.questions
            .iter()
            .any(|q| q.definition.id == definitions[0].id)
    );
}

/// Widening a definition's validity window reaches existing audits on sync.
#[actix_rt::test]
async fn test_edited_definition_is_picked_up_on_sync() {
    let pool = create_test_pool().await;
    seed_definition(&pool, TestType::Axe, "1.1.1 Non-text content").await;
    let future = services::reference::add_wcag_definition(
        &pool,
        &NewWcagDefinition {
            test_type: TestType::Manual,
            sub_type: WcagSubType::Keyboard,
            name: "2.1.4 Character key shortcuts".to_string(),
            description: String::new(),
            url: String::new(),
            date_start: NaiveDate::from_ymd_opt(2999, 1, 1),
            date_end: None,
        },
    )
    .await
    .unwrap();
    let (_, audit, home) = audit_with_home_page(&pool).await;
    assert_eq!(results_on(&pool, &home).await.len(), 1);

    let mut changes = UpdateWcagDefinitionRequest {
        sub_type: None,
        name: "  ".to_string(),
        description: String::new(),
        url: String::new(),
        date_start: None,
        date_end: None,
    };
    let err = services::reference::update_wcag_definition(&pool, future.id, &changes)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    changes.name = future.name.clone();
    let err = services::reference::update_wcag_definition(&pool, Uuid::now_v7(), &changes)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let updated = services::reference::update_wcag_definition(&pool, future.id, &changes)
        .await
        .unwrap();
    assert_eq!(updated.date_start, None);
    assert_eq!(updated.sub_type, "keyboard");
    assert_eq!(updated.test_type, "manual");

    let created = services::check_results::ensure_check_results_for_audit(&pool, audit.id)
        .await
        .unwrap();
    assert_eq!(created, 1);
    assert_eq!(results_on(&pool, &home).await.len(), 2);
}
