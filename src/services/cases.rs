//! Case management.

use tracing::info;
use uuid::Uuid;

use crate::db::{self, DbPool};
use crate::entity::case;
use crate::error::{AppError, AppResult, PreconditionFailure};
use crate::models::{CreateCaseRequest, UpdateCaseRequest, domain_from_url, validate_url};

/// Open a case for an organisation's website.
pub async fn create_case(pool: &DbPool, request: &CreateCaseRequest) -> AppResult<case::Model> {
    let organisation_name = request.organisation_name.trim();
    if organisation_name.is_empty() {
        return Err(AppError::Validation(
            "Organisation name is required".to_string(),
        ));
    }
    let home_page_url = request.home_page_url.trim();
    validate_url(home_page_url)?;

    let case = db::cases::insert_case(
        pool.connection(),
        organisation_name,
        home_page_url,
        &domain_from_url(home_page_url),
        request.auditor.clone(),
    )
    .await?;

    info!(case_id = %case.id, domain = %case.domain, "Case created");
    Ok(case)
}

pub async fn get_case(pool: &DbPool, id: Uuid) -> AppResult<case::Model> {
    db::cases::get_active_case(pool.connection(), id).await
}

pub async fn list_cases(pool: &DbPool) -> AppResult<Vec<case::Model>> {
    db::cases::list_active_cases(pool.connection()).await
}

/// Change status, people or compliance decisions of a case.
pub async fn update_case(
    pool: &DbPool,
    id: Uuid,
    request: &UpdateCaseRequest,
) -> AppResult<case::Model> {
    if request
        .organisation_name
        .as_deref()
        .is_some_and(|name| name.trim().is_empty())
    {
        return Err(AppError::Validation(
            "Organisation name cannot be blank".to_string(),
        ));
    }

    let case = db::cases::update_case(pool.connection(), id, request.version, request).await?;
    info!(case_id = %id, version = case.version, status = %case.status, "Case updated");
    Ok(case)
}

/// Delete a case that no longer has a live audit or retest.
pub async fn delete_case(pool: &DbPool, id: Uuid, expected_version: i32) -> AppResult<()> {
    let txn = pool.begin().await?;
    db::cases::get_active_case(&txn, id).await?;

    let audits = db::audits::count_active_audits_for_case(&txn, id).await?;
    if audits > 0 {
        return Err(PreconditionFailure::HasActiveChildren {
            entity: "Case",
            id,
            count: audits,
            children: "audits",
        }
        .into());
    }
    let retests = db::retests::list_active_retests_for_case(&txn, id).await?;
    if !retests.is_empty() {
        return Err(PreconditionFailure::HasActiveChildren {
            entity: "Case",
            id,
            count: retests.len() as u64,
            children: "retests",
        }
        .into());
    }

    db::cases::soft_delete_case(&txn, id, expected_version).await?;
    txn.commit().await?;

    info!(case_id = %id, "Case deleted");
    Ok(())
}
