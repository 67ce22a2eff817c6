//! Check-result synchronizer.
//!
//! Keeps one CheckResult per (page, applicable definition) pair and mirrors
//! edits made through the "all pages" page onto the html pages. Mirroring
//! only runs from the "all pages" page to concrete pages, never back.

use std::collections::HashMap;

use sea_orm::ConnectionTrait;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::{self, DbPool, pages::PageChanges};
use crate::entity::{audit, check_result, page, wcag_definition};
use crate::error::{AppError, AppResult};
use crate::models::{
    AddPageRequest, CheckResultChanges, CheckResultResponse, OtherPageFailure, PageChecksForm,
    PageResponse, PageRole, QuestionWithOtherFailures, UpdatePageRequest,
    WcagDefinitionResponse, validate_url,
};

/// A check result edit and the copies it produced on other pages.
#[derive(Debug, Clone)]
pub struct CheckResultUpdate {
    pub result: check_result::Model,
    pub propagated: Vec<check_result::Model>,
}

/// Create the missing check results for `page` from `definitions`.
///
/// Definitions of a test type the page does not take are skipped. Rows that
/// already exist, including soft-deleted ones, are left alone, so calling
/// this again with the same inputs creates nothing. Returns the new rows.
pub async fn ensure_check_results_for_page<C: ConnectionTrait>(
    conn: &C,
    page: &page::Model,
    definitions: &[wcag_definition::Model],
) -> AppResult<Vec<check_result::Model>> {
    if !page.is_active() {
        return Ok(Vec::new());
    }

    let applicable = page.role()?.applicable_test_types();
    let mut existing = db::check_results::definition_ids_for_page(conn, page.id).await?;
    let mut created = Vec::new();

    for definition in definitions {
        if !applicable.contains(&definition.test_type()?) {
            continue;
        }
        if !existing.insert(definition.id) {
            continue;
        }
        created.push(db::check_results::insert_check_result(conn, page, definition).await?);
    }

    if !created.is_empty() {
        debug!(
            page_id = %page.id,
            created = created.len(),
            "Created check results for page"
        );
    }

    Ok(created)
}

/// Ensure check results on every active page of `audit`.
pub(crate) async fn ensure_for_audit_in<C: ConnectionTrait>(
    conn: &C,
    audit: &audit::Model,
) -> AppResult<usize> {
    let definitions =
        db::wcag_definitions::list_valid_on(conn, audit.reference_date()).await?;
    let mut created = 0;
    for page in db::pages::list_active_pages(conn, audit.id).await? {
        created += ensure_check_results_for_page(conn, &page, &definitions)
            .await?
            .len();
    }
    Ok(created)
}

/// Re-run the idempotent ensure across the audit after the definition set changed.
pub async fn ensure_check_results_for_audit(pool: &DbPool, audit_id: Uuid) -> AppResult<usize> {
    let txn = pool.begin().await?;
    let audit = db::audits::get_active_audit(&txn, audit_id).await?;
    let created = ensure_for_audit_in(&txn, &audit).await?;
    txn.commit().await?;

    info!(audit_id = %audit_id, created, "Synchronised check results");
    Ok(created)
}

/// Copy an edit made on the "all pages" page onto the html pages.
///
/// Runs only when the edited result lives on the "all pages" page and that
/// page is where the audit's wizard cursor points. Targets are the active
/// home, contact, form and extra pages; pdf and statement pages never
/// receive copies. Returns the rows that changed.
pub async fn propagate_page_all_edit<C: ConnectionTrait>(
    conn: &C,
    check_result_on_all: &check_result::Model,
    changed_fields: &CheckResultChanges,
) -> AppResult<Vec<check_result::Model>> {
    if changed_fields.is_empty() {
        return Ok(Vec::new());
    }

    let source_page = db::pages::find_page(conn, check_result_on_all.page_id)
        .await?
        .ok_or_else(|| {
            AppError::Integrity(format!(
                "check result {} references missing page {}",
                check_result_on_all.id, check_result_on_all.page_id
            ))
        })?;
    if !source_page.is_active() || !source_page.role()?.is_aggregate() {
        return Ok(Vec::new());
    }

    let audit = db::audits::get_active_audit(conn, source_page.audit_id).await?;
    if audit.next_page_id != Some(source_page.id) {
        return Ok(Vec::new());
    }

    let mut target_ids = Vec::new();
    for page in db::pages::list_active_pages(conn, audit.id).await? {
        if page.role()?.receives_all_pages_edits() {
            target_ids.push(page.id);
        }
    }

    let targets = db::check_results::list_for_definition_on_pages(
        conn,
        check_result_on_all.wcag_definition_id,
        &target_ids,
    )
    .await?;

    let mut propagated = Vec::new();
    for target in targets {
        let diff = changed_fields.relative_to(&target);
        if diff.is_empty() {
            continue;
        }
        propagated.push(
            db::check_results::update_check_result(conn, target.id, target.version, &diff)
                .await?,
        );
    }

    if !propagated.is_empty() {
        info!(
            audit_id = %audit.id,
            wcag_definition_id = %check_result_on_all.wcag_definition_id,
            pages = propagated.len(),
            "Propagated all-pages edit"
        );
    }

    Ok(propagated)
}

/// Compare-and-swap edit of one check result, followed by propagation.
pub(crate) async fn apply_check_result_edit<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    expected_version: i32,
    changes: &CheckResultChanges,
) -> AppResult<CheckResultUpdate> {
    let result = db::check_results::update_check_result(conn, id, expected_version, changes).await?;
    let propagated = propagate_page_all_edit(conn, &result, changes).await?;
    Ok(CheckResultUpdate { result, propagated })
}

/// Edit a check result if `expected_version` is still current.
pub async fn update_check_result(
    pool: &DbPool,
    id: Uuid,
    expected_version: i32,
    changes: &CheckResultChanges,
) -> AppResult<CheckResultUpdate> {
    if changes.is_empty() {
        return Err(AppError::Validation(
            "Nothing to change: supply failed or notes".to_string(),
        ));
    }

    let txn = pool.begin().await?;
    let update = apply_check_result_edit(&txn, id, expected_version, changes).await?;
    txn.commit().await?;

    Ok(update)
}

/// Create a page and its check results from the definitions valid on the test date.
pub(crate) async fn create_page_with_checks<C: ConnectionTrait>(
    conn: &C,
    audit: &audit::Model,
    role: PageRole,
    name: &str,
    url: &str,
    definitions: &[wcag_definition::Model],
) -> AppResult<page::Model> {
    let page = db::pages::insert_page(conn, audit.id, role, name, url).await?;
    ensure_check_results_for_page(conn, &page, definitions).await?;
    Ok(page)
}

/// Add a page to an audit and create its check results.
pub async fn add_page(
    pool: &DbPool,
    audit_id: Uuid,
    request: &AddPageRequest,
) -> AppResult<page::Model> {
    validate_url(&request.url)?;

    let txn = pool.begin().await?;
    let audit = db::audits::get_active_audit(&txn, audit_id).await?;
    let definitions =
        db::wcag_definitions::list_valid_on(&txn, audit.reference_date()).await?;
    let page = create_page_with_checks(
        &txn,
        &audit,
        PageRole::Concrete(request.page_type),
        request.name.trim(),
        request.url.trim(),
        &definitions,
    )
    .await?;
    txn.commit().await?;

    info!(
        audit_id = %audit_id,
        page_id = %page.id,
        page_type = %request.page_type,
        "Page added"
    );
    Ok(page)
}

/// Edit a page's name, URL or not-found flag.
pub async fn update_page(
    pool: &DbPool,
    id: Uuid,
    request: &UpdatePageRequest,
) -> AppResult<page::Model> {
    if let Some(url) = &request.url {
        let current = db::pages::get_active_page(pool.connection(), id).await?;
        if !current.role()?.is_aggregate() {
            validate_url(url)?;
        }
    }

    let changes = PageChanges {
        name: request.name.as_ref().map(|n| n.trim().to_string()),
        url: request.url.as_ref().map(|u| u.trim().to_string()),
        not_found: request.not_found,
    };
    let page = db::pages::update_page(pool.connection(), id, request.version, &changes).await?;

    info!(page_id = %id, version = page.version, "Page updated");
    Ok(page)
}

/// Soft-delete a page. Its check results stay but drop out of every aggregate.
pub async fn remove_page(pool: &DbPool, id: Uuid, expected_version: i32) -> AppResult<page::Model> {
    let page = db::pages::soft_delete_page(pool.connection(), id, expected_version).await?;
    info!(page_id = %id, audit_id = %page.audit_id, "Page removed");
    Ok(page)
}

/// Restore a removed page and create check results for definitions added meanwhile.
pub async fn restore_page(pool: &DbPool, id: Uuid, expected_version: i32) -> AppResult<page::Model> {
    let txn = pool.begin().await?;
    let page = db::pages::restore_page(&txn, id, expected_version).await?;
    let audit = db::audits::get_active_audit(&txn, page.audit_id).await?;
    let definitions =
        db::wcag_definitions::list_valid_on(&txn, audit.reference_date()).await?;
    ensure_check_results_for_page(&txn, &page, &definitions).await?;
    txn.commit().await?;

    info!(page_id = %id, "Page restored");
    Ok(page)
}

/// Failed check results on the audit's other testable pages, keyed by definition.
pub async fn other_pages_failed_check_results<C: ConnectionTrait>(
    conn: &C,
    page: &page::Model,
) -> AppResult<HashMap<Uuid, Vec<OtherPageFailure>>> {
    let others: HashMap<Uuid, page::Model> = db::pages::list_active_pages(conn, page.audit_id)
        .await?
        .into_iter()
        .filter(|p| p.id != page.id && p.is_testable())
        .map(|p| (p.id, p))
        .collect();

    let mut grouped: HashMap<Uuid, Vec<OtherPageFailure>> = HashMap::new();
    for result in db::check_results::list_failed_for_audit(conn, page.audit_id).await? {
        let Some(other) = others.get(&result.page_id) else {
            continue;
        };
        grouped
            .entry(result.wcag_definition_id)
            .or_default()
            .push(OtherPageFailure {
                page_id: other.id,
                page_name: other.display_name(),
                check_result_id: result.id,
                notes: result.notes,
            });
    }

    Ok(grouped)
}

/// Everything the page-checks form shows for one page.
pub async fn page_checks_form(pool: &DbPool, page_id: Uuid) -> AppResult<PageChecksForm> {
    let conn = pool.connection();
    let page = db::pages::get_active_page(conn, page_id).await?;

    let definitions: HashMap<Uuid, wcag_definition::Model> =
        db::wcag_definitions::list_definitions(conn)
            .await?
            .into_iter()
            .map(|d| (d.id, d))
            .collect();
    let mut others = other_pages_failed_check_results(conn, &page).await?;

    let mut questions = Vec::new();
    for result in db::check_results::find_check_results(conn, page.audit_id, page.id).await? {
        let definition = definitions.get(&result.wcag_definition_id).cloned().ok_or_else(|| {
            AppError::Integrity(format!(
                "check result {} references missing definition {}",
                result.id, result.wcag_definition_id
            ))
        })?;
        questions.push(QuestionWithOtherFailures {
            other_pages_failed: others.remove(&definition.id).unwrap_or_default(),
            definition: WcagDefinitionResponse::from_model(definition)?,
            result: CheckResultResponse::from_model(result)?,
        });
    }

    Ok(PageChecksForm {
        page: PageResponse::from_model(page)?,
        questions,
    })
}
