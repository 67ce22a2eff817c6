//! Reference data: WCAG definitions and statement checks.

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::db::{self, DbPool};
use crate::entity::{statement_check, wcag_definition};
use crate::error::{AppError, AppResult};
use crate::models::{
    NewStatementCheck, NewWcagDefinition, UpdateStatementCheckRequest,
    UpdateWcagDefinitionRequest,
};

fn validate_window(start: Option<NaiveDate>, end: Option<NaiveDate>) -> AppResult<()> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(AppError::Validation(format!(
            "date_end {} is before date_start {}",
            end, start
        ))),
        _ => Ok(()),
    }
}

/// Add a WCAG definition. Existing audits pick it up on their next sync.
pub async fn add_wcag_definition(
    pool: &DbPool,
    definition: &NewWcagDefinition,
) -> AppResult<wcag_definition::Model> {
    if definition.name.trim().is_empty() {
        return Err(AppError::Validation("Definition name is required".to_string()));
    }
    validate_window(definition.date_start, definition.date_end)?;

    let created = db::wcag_definitions::insert_definition(pool.connection(), definition).await?;
    info!(
        wcag_definition_id = %created.id,
        test_type = %definition.test_type,
        "WCAG definition added"
    );
    Ok(created)
}

/// Edit a definition in place.
///
/// Existing check results keep pointing at it; a widened validity window
/// reaches existing audits on their next sync.
pub async fn update_wcag_definition(
    pool: &DbPool,
    id: Uuid,
    changes: &UpdateWcagDefinitionRequest,
) -> AppResult<wcag_definition::Model> {
    if changes.name.trim().is_empty() {
        return Err(AppError::Validation("Definition name is required".to_string()));
    }
    validate_window(changes.date_start, changes.date_end)?;

    let updated = db::wcag_definitions::update_definition(pool.connection(), id, changes).await?;
    info!(wcag_definition_id = %id, "WCAG definition updated");
    Ok(updated)
}

/// All definitions, or only those in force on `on_date`.
pub async fn list_wcag_definitions(
    pool: &DbPool,
    on_date: Option<NaiveDate>,
) -> AppResult<Vec<wcag_definition::Model>> {
    match on_date {
        Some(date) => db::wcag_definitions::list_valid_on(pool.connection(), date).await,
        None => db::wcag_definitions::list_definitions(pool.connection()).await,
    }
}

pub async fn add_statement_check(
    pool: &DbPool,
    check: &NewStatementCheck,
) -> AppResult<statement_check::Model> {
    if check.label.trim().is_empty() {
        return Err(AppError::Validation("Statement check label is required".to_string()));
    }
    validate_window(check.date_start, check.date_end)?;

    let created = db::statements::insert_statement_check(pool.connection(), check).await?;
    info!(statement_check_id = %created.id, check_type = check.check_type.as_str(), "Statement check added");
    Ok(created)
}

pub async fn update_statement_check(
    pool: &DbPool,
    id: Uuid,
    changes: &UpdateStatementCheckRequest,
) -> AppResult<statement_check::Model> {
    if changes.label.trim().is_empty() {
        return Err(AppError::Validation("Statement check label is required".to_string()));
    }
    validate_window(changes.date_start, changes.date_end)?;

    let updated = db::statements::update_statement_check(pool.connection(), id, changes).await?;
    info!(statement_check_id = %id, "Statement check updated");
    Ok(updated)
}

/// All statement checks in assessment order, or only those in force on `on_date`.
pub async fn list_statement_checks(
    pool: &DbPool,
    on_date: Option<NaiveDate>,
) -> AppResult<Vec<statement_check::Model>> {
    let checks = db::statements::list_statement_checks(pool.connection()).await?;
    Ok(match on_date {
        Some(date) => checks.into_iter().filter(|c| c.is_valid_on(date)).collect(),
        None => checks,
    })
}
