//! Initial test wizard: the page cursor and the order of forms.

use chrono::Utc;
use sea_orm::ConnectionTrait;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::{self, DbPool};
use crate::entity::page;
use crate::error::{AppError, AppResult};
use crate::models::{
    CheckResultResponse, CursorResponse, PageChecksOutcome, PageChecksSubmission, PageResponse,
    SaveAction, WizardStep,
};

use super::check_results::apply_check_result_edit;
use super::summary::all_overview_statement_checks_passed;

/// The audit's "next page" pointer.
///
/// Navigation state only: moving it never bumps the audit version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardCursor {
    audit_id: Uuid,
    next_page_id: Option<Uuid>,
}

impl WizardCursor {
    pub async fn load<C: ConnectionTrait>(conn: &C, audit_id: Uuid) -> AppResult<Self> {
        let audit = db::audits::get_active_audit(conn, audit_id).await?;
        Ok(Self {
            audit_id: audit.id,
            next_page_id: audit.next_page_id,
        })
    }

    pub fn read(&self) -> Option<Uuid> {
        self.next_page_id
    }

    /// Point the cursor at `page`, or clear it with `None`.
    pub async fn advance_to<C: ConnectionTrait>(
        &mut self,
        conn: &C,
        page: Option<&page::Model>,
    ) -> AppResult<()> {
        if let Some(page) = page {
            if page.audit_id != self.audit_id {
                return Err(AppError::Validation(format!(
                    "Page {} does not belong to audit {}",
                    page.id, self.audit_id
                )));
            }
            if !page.is_active() {
                return Err(AppError::Validation(format!("Page {} has been removed", page.id)));
            }
        }

        let next_page_id = page.map(|p| p.id);
        db::audits::set_next_page(conn, self.audit_id, next_page_id).await?;
        self.next_page_id = next_page_id;
        Ok(())
    }

    /// The page the cursor points at, if it is still active.
    pub async fn current_page<C: ConnectionTrait>(
        &self,
        conn: &C,
    ) -> AppResult<Option<page::Model>> {
        let Some(id) = self.next_page_id else {
            return Ok(None);
        };
        Ok(db::pages::find_page(conn, id)
            .await?
            .filter(page::Model::is_active))
    }

    pub fn to_response(&self) -> CursorResponse {
        CursorResponse {
            audit_id: self.audit_id,
            next_page_id: self.next_page_id,
        }
    }
}

/// Sort pages into the order the wizard visits them.
pub fn order_pages_for_wizard(pages: Vec<page::Model>) -> AppResult<Vec<page::Model>> {
    let mut keyed = pages
        .into_iter()
        .map(|p| Ok((p.role()?.wizard_rank(), p)))
        .collect::<AppResult<Vec<_>>>()?;
    keyed.sort_by(|(a_rank, a), (b_rank, b)| {
        a_rank
            .cmp(b_rank)
            .then(a.created_at.cmp(&b.created_at))
            .then(a.id.cmp(&b.id))
    });
    Ok(keyed.into_iter().map(|(_, p)| p).collect())
}

/// Pages the wizard stops at: testable pages and the "all pages" page.
fn is_wizard_stop(page: &page::Model) -> bool {
    page.is_testable()
        || (page.is_active() && matches!(page.role(), Ok(role) if role.is_aggregate()))
}

/// The first wizard stop after `current_id` in `ordered`.
///
/// When `current_id` is absent from the list the first stop is returned.
pub fn next_page_after(ordered: &[page::Model], current_id: Option<Uuid>) -> Option<&page::Model> {
    let start = current_id
        .and_then(|id| ordered.iter().position(|p| p.id == id))
        .map_or(0, |i| i + 1);
    ordered[start..].iter().find(|p| is_wizard_stop(p))
}

/// What `next_step` needs to know about the audit.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepContext {
    /// First page the checks wizard stops at
    pub first_page: Option<Uuid>,
    /// Stop after the page being submitted
    pub next_page: Option<Uuid>,
    pub overview_passed: bool,
}

/// The form that follows `current` for the button the user pressed.
pub fn next_step(current: WizardStep, action: SaveAction, context: StepContext) -> WizardStep {
    match action {
        SaveAction::Save => current,
        SaveAction::SaveExit => WizardStep::Summary,
        SaveAction::SaveContinue => match current {
            WizardStep::Metadata => WizardStep::Pages,
            WizardStep::Pages => context
                .first_page
                .map_or(WizardStep::WebsiteDecision, |page_id| {
                    WizardStep::PageChecks { page_id }
                }),
            WizardStep::PageChecks { .. } => context
                .next_page
                .map_or(WizardStep::WebsiteDecision, |page_id| {
                    WizardStep::PageChecks { page_id }
                }),
            WizardStep::WebsiteDecision => WizardStep::InitialDisproportionateBurden,
            WizardStep::InitialDisproportionateBurden => WizardStep::StatementPages,
            WizardStep::StatementPages => WizardStep::StatementOverview,
            WizardStep::StatementOverview if context.overview_passed => {
                WizardStep::StatementWebsite
            }
            WizardStep::StatementOverview => WizardStep::Summary,
            WizardStep::StatementWebsite => WizardStep::StatementCompliance,
            WizardStep::StatementCompliance => WizardStep::StatementNonAccessible,
            WizardStep::StatementNonAccessible => WizardStep::StatementPreparation,
            WizardStep::StatementPreparation => WizardStep::StatementFeedback,
            WizardStep::StatementFeedback => WizardStep::StatementCustom,
            WizardStep::StatementCustom => WizardStep::StatementDecision,
            WizardStep::StatementDecision => WizardStep::WcagSummary,
            WizardStep::WcagSummary => WizardStep::StatementSummary,
            WizardStep::StatementSummary | WizardStep::Summary => WizardStep::Summary,
        },
    }
}

/// Move the cursor to match a page-checks step, clearing it when the pages are done.
async fn follow_step<C: ConnectionTrait>(
    conn: &C,
    cursor: &mut WizardCursor,
    ordered: &[page::Model],
    step: WizardStep,
) -> AppResult<()> {
    match step {
        WizardStep::PageChecks { page_id } => {
            cursor
                .advance_to(conn, ordered.iter().find(|p| p.id == page_id))
                .await
        }
        _ => cursor.advance_to(conn, None).await,
    }
}

/// Where the cursor points.
pub async fn read_cursor(pool: &DbPool, audit_id: Uuid) -> AppResult<CursorResponse> {
    Ok(WizardCursor::load(pool.connection(), audit_id)
        .await?
        .to_response())
}

/// Point the cursor at a page of the audit, or clear it.
pub async fn move_cursor(
    pool: &DbPool,
    audit_id: Uuid,
    page_id: Option<Uuid>,
) -> AppResult<CursorResponse> {
    let conn = pool.connection();
    let mut cursor = WizardCursor::load(conn, audit_id).await?;
    let page = match page_id {
        Some(id) => Some(db::pages::get_active_page(conn, id).await?),
        None => None,
    };
    cursor.advance_to(conn, page.as_ref()).await?;
    Ok(cursor.to_response())
}

/// Save the page-checks form and resolve the next form.
///
/// The completion flag and every edit are written in one transaction; a
/// stale version anywhere rolls all of them back.
pub async fn submit_page_checks(
    pool: &DbPool,
    page_id: Uuid,
    submission: &PageChecksSubmission,
) -> AppResult<PageChecksOutcome> {
    let txn = pool.begin().await?;

    let mut page = db::pages::get_active_page(&txn, page_id).await?;
    if page.version != submission.page_version {
        warn!(page_id = %page_id, "Rejected stale page-checks submission");
        return Err(AppError::ConcurrentModification(format!("Page {}", page_id)));
    }
    if let Some(complete) = submission.complete {
        let complete_date = complete.then(|| Utc::now().date_naive());
        if complete_date.is_some() != page.complete_date.is_some() {
            page = db::pages::set_complete_date(&txn, page_id, page.version, complete_date)
                .await?;
        }
    }

    let mut updated = Vec::new();
    let mut propagated = 0;
    for edit in &submission.results {
        let current = db::check_results::get_active_check_result(&txn, edit.id).await?;
        if current.page_id != page_id {
            return Err(AppError::Validation(format!(
                "Check result {} is not on page {}",
                edit.id, page_id
            )));
        }
        if current.version != edit.version {
            warn!(check_result_id = %edit.id, "Rejected stale check result edit");
            return Err(AppError::ConcurrentModification(format!(
                "Check result {}",
                edit.id
            )));
        }

        let diff = edit.changes.relative_to(&current);
        if diff.is_empty() {
            continue;
        }
        let update = apply_check_result_edit(&txn, edit.id, edit.version, &diff).await?;
        propagated += update.propagated.len();
        updated.push(update.result);
    }

    txn.commit().await?;

    info!(
        page_id = %page_id,
        updated = updated.len(),
        propagated,
        action = ?submission.save_action,
        "Page checks saved"
    );

    let current = WizardStep::PageChecks { page_id };
    let next = match submission.save_action {
        SaveAction::SaveContinue => {
            let conn = pool.connection();
            let ordered =
                order_pages_for_wizard(db::pages::list_active_pages(conn, page.audit_id).await?)?;
            let context = StepContext {
                next_page: next_page_after(&ordered, Some(page_id)).map(|p| p.id),
                ..StepContext::default()
            };
            let step = next_step(current, SaveAction::SaveContinue, context);
            let mut cursor = WizardCursor::load(conn, page.audit_id).await?;
            follow_step(conn, &mut cursor, &ordered, step).await?;
            step
        }
        action => next_step(current, action, StepContext::default()),
    };

    Ok(PageChecksOutcome {
        page: PageResponse::from_model(page)?,
        updated: updated
            .into_iter()
            .map(CheckResultResponse::from_model)
            .collect::<AppResult<_>>()?,
        next,
    })
}

/// Leave a wizard form and return the one to show next.
pub async fn advance_section(
    pool: &DbPool,
    audit_id: Uuid,
    current: WizardStep,
    action: SaveAction,
) -> AppResult<WizardStep> {
    let conn = pool.connection();
    let mut cursor = WizardCursor::load(conn, audit_id).await?;
    let ordered = order_pages_for_wizard(db::pages::list_active_pages(conn, audit_id).await?)?;

    let context = StepContext {
        first_page: next_page_after(&ordered, None).map(|p| p.id),
        next_page: match current {
            WizardStep::PageChecks { page_id } => {
                next_page_after(&ordered, Some(page_id)).map(|p| p.id)
            }
            _ => None,
        },
        overview_passed: current == WizardStep::StatementOverview
            && all_overview_statement_checks_passed(conn, audit_id).await?,
    };

    let step = next_step(current, action, context);
    if action == SaveAction::SaveContinue
        && matches!(current, WizardStep::Pages | WizardStep::PageChecks { .. })
    {
        follow_step(conn, &mut cursor, &ordered, step).await?;
    }
    Ok(step)
}
