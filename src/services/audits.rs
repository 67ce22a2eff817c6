//! Audit lifecycle: creation, standard pages, metadata, completion and deletion.

use chrono::Utc;
use sea_orm::ConnectionTrait;
use tracing::info;
use uuid::Uuid;

use crate::db::{self, DbPool};
use crate::entity::{audit, page};
use crate::error::{AppError, AppResult, PreconditionFailure};
use crate::models::{
    AuditDecisionRequest, AuditDetailResponse, AuditMetadata, AuditResponse, CaseStatus, CreateAuditRequest,
    PageResponse, PageRole, PageType, decode,
};

use super::check_results::{create_page_with_checks, ensure_for_audit_in};
use super::statements::ensure_statement_check_results_in;
use super::wizard::{WizardCursor, order_pages_for_wizard};

/// Pages every audit starts with, in creation order.
const STANDARD_PAGES: [PageRole; 6] = [
    PageRole::Concrete(PageType::Home),
    PageRole::Concrete(PageType::Contact),
    PageRole::Concrete(PageType::Statement),
    PageRole::Concrete(PageType::Pdf),
    PageRole::Concrete(PageType::Form),
    PageRole::AggregateAll,
];

/// An audit and its active pages.
#[derive(Debug, Clone)]
pub struct AuditWithPages {
    pub audit: audit::Model,
    pub pages: Vec<page::Model>,
}

impl AuditWithPages {
    pub fn into_response(self) -> AppResult<AuditDetailResponse> {
        Ok(AuditDetailResponse {
            audit: AuditResponse::from_model(self.audit)?,
            pages: self
                .pages
                .into_iter()
                .map(PageResponse::from_model)
                .collect::<AppResult<_>>()?,
        })
    }
}

/// Create the standard pages with their check results and point the cursor at home.
pub(crate) async fn create_standard_pages_in<C: ConnectionTrait>(
    conn: &C,
    audit: &audit::Model,
) -> AppResult<Vec<page::Model>> {
    let existing = db::pages::count_active_pages(conn, audit.id).await?;
    if existing > 0 {
        return Err(PreconditionFailure::InvalidState(format!(
            "Audit {} already has {} pages",
            audit.id, existing
        ))
        .into());
    }

    let definitions = db::wcag_definitions::list_valid_on(conn, audit.reference_date()).await?;
    let mut pages = Vec::with_capacity(STANDARD_PAGES.len());
    for role in STANDARD_PAGES {
        pages.push(create_page_with_checks(conn, audit, role, "", "", &definitions).await?);
    }
    ensure_statement_check_results_in(conn, audit).await?;

    let mut cursor = WizardCursor::load(conn, audit.id).await?;
    cursor.advance_to(conn, pages.first()).await?;

    Ok(pages)
}

/// Start the initial test of a case.
pub async fn create_audit(
    pool: &DbPool,
    case_id: Uuid,
    request: &CreateAuditRequest,
) -> AppResult<AuditWithPages> {
    let txn = pool.begin().await?;

    let case = db::cases::get_active_case(&txn, case_id).await?;
    if db::audits::find_active_audit_for_case(&txn, case_id)
        .await?
        .is_some()
    {
        return Err(PreconditionFailure::AuditAlreadyExists(case_id).into());
    }

    let audit = db::audits::insert_audit(&txn, case_id, &request.metadata).await?;
    let pages = if request.standard_pages {
        create_standard_pages_in(&txn, &audit).await?
    } else {
        ensure_statement_check_results_in(&txn, &audit).await?;
        Vec::new()
    };

    if decode(&case.status, CaseStatus::parse, "cases.status")? == CaseStatus::NewCase {
        db::cases::set_status(&txn, &case, CaseStatus::TestInProgress).await?;
    }

    let audit = db::audits::get_active_audit(&txn, audit.id).await?;
    txn.commit().await?;

    info!(
        case_id = %case_id,
        audit_id = %audit.id,
        pages = pages.len(),
        "Audit created"
    );
    Ok(AuditWithPages {
        pages: order_pages_for_wizard(pages)?,
        audit,
    })
}

/// Add the standard pages to an audit that has none yet.
pub async fn create_standard_pages(pool: &DbPool, audit_id: Uuid) -> AppResult<Vec<page::Model>> {
    let txn = pool.begin().await?;
    let audit = db::audits::get_active_audit(&txn, audit_id).await?;
    let pages = create_standard_pages_in(&txn, &audit).await?;
    txn.commit().await?;

    info!(audit_id = %audit_id, pages = pages.len(), "Standard pages created");
    Ok(pages)
}

/// Edit the audit metadata.
///
/// A new test date can bring other definitions into force, so check results
/// and statement results are ensured again in the same transaction.
pub async fn update_audit_metadata(
    pool: &DbPool,
    audit_id: Uuid,
    expected_version: i32,
    metadata: &AuditMetadata,
) -> AppResult<audit::Model> {
    let txn = pool.begin().await?;
    let audit = db::audits::update_metadata(&txn, audit_id, expected_version, metadata).await?;
    let created = ensure_for_audit_in(&txn, &audit).await?;
    ensure_statement_check_results_in(&txn, &audit).await?;
    txn.commit().await?;

    info!(
        audit_id = %audit_id,
        version = audit.version,
        created_check_results = created,
        "Audit metadata updated"
    );
    Ok(audit)
}

/// Record the disproportionate burden and statement decisions of the initial test.
pub async fn update_audit_decision(
    pool: &DbPool,
    audit_id: Uuid,
    request: &AuditDecisionRequest,
) -> AppResult<audit::Model> {
    if request.is_empty() {
        return Err(AppError::Validation("No decision fields to update".to_string()));
    }

    let audit =
        db::audits::update_decision(pool.connection(), audit_id, request.version, request).await?;
    info!(
        audit_id = %audit_id,
        version = audit.version,
        statement_compliance = %audit.statement_compliance,
        "Audit decision updated"
    );
    Ok(audit)
}

/// Stamp the audit as completed so it can be retested.
pub async fn complete_audit(
    pool: &DbPool,
    audit_id: Uuid,
    expected_version: i32,
) -> AppResult<audit::Model> {
    let txn = pool.begin().await?;
    let current = db::audits::get_active_audit(&txn, audit_id).await?;
    if current.is_completed() {
        return Err(PreconditionFailure::InvalidState(format!(
            "Audit {} is already completed",
            audit_id
        ))
        .into());
    }

    let audit = db::audits::mark_completed(&txn, audit_id, expected_version, Utc::now()).await?;

    let case = db::cases::get_active_case(&txn, audit.case_id).await?;
    if decode(&case.status, CaseStatus::parse, "cases.status")? == CaseStatus::TestInProgress {
        db::cases::set_status(&txn, &case, CaseStatus::ReportInProgress).await?;
    }
    txn.commit().await?;

    info!(audit_id = %audit_id, case_id = %audit.case_id, "Audit completed");
    Ok(audit)
}

/// Delete an audit once all its pages have been removed.
pub async fn delete_audit(pool: &DbPool, audit_id: Uuid, expected_version: i32) -> AppResult<()> {
    let txn = pool.begin().await?;
    db::audits::get_active_audit(&txn, audit_id).await?;

    let pages = db::pages::count_active_pages(&txn, audit_id).await?;
    if pages > 0 {
        return Err(PreconditionFailure::HasActiveChildren {
            entity: "Audit",
            id: audit_id,
            count: pages,
            children: "pages",
        }
        .into());
    }

    db::audits::soft_delete_audit(&txn, audit_id, expected_version).await?;
    txn.commit().await?;

    info!(audit_id = %audit_id, "Audit deleted");
    Ok(())
}

/// Pages holding the accessibility statement, backing the statement-pages step.
pub async fn list_statement_pages(pool: &DbPool, audit_id: Uuid) -> AppResult<Vec<page::Model>> {
    let conn = pool.connection();
    db::audits::get_active_audit(conn, audit_id).await?;

    let mut statement_pages = Vec::new();
    for page in db::pages::list_active_pages(conn, audit_id).await? {
        if page.role()? == PageRole::Concrete(PageType::Statement) {
            statement_pages.push(page);
        }
    }
    Ok(statement_pages)
}

/// An audit with its active pages in wizard order.
pub async fn get_audit_detail(pool: &DbPool, audit_id: Uuid) -> AppResult<AuditWithPages> {
    let conn = pool.connection();
    let audit = db::audits::get_active_audit(conn, audit_id).await?;
    let pages = order_pages_for_wizard(db::pages::list_active_pages(conn, audit_id).await?)?;
    Ok(AuditWithPages { audit, pages })
}
