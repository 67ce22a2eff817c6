//! Check result DTOs and the page-checks form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::check_result;
use crate::error::AppResult;

use super::{Lifecycle, PageResponse, SaveAction, TestType, WcagDefinitionResponse, WizardStep, decode};

/// Fields a tester can change on a check result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct CheckResultChanges {
    #[serde(default)]
    pub failed: Option<bool>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CheckResultChanges {
    pub fn is_empty(&self) -> bool {
        self.failed.is_none() && self.notes.is_none()
    }

    /// Drop fields that already hold the requested value.
    pub fn relative_to(&self, current: &check_result::Model) -> Self {
        Self {
            failed: self.failed.filter(|failed| *failed != current.failed),
            notes: self
                .notes
                .as_ref()
                .filter(|notes| **notes != current.notes)
                .cloned(),
        }
    }
}

/// Request to edit a single check result.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateCheckResultRequest {
    pub version: i32,
    #[serde(flatten)]
    pub changes: CheckResultChanges,
}

/// One row of a page-checks submission.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CheckResultEdit {
    pub id: Uuid,
    pub version: i32,
    #[serde(flatten)]
    pub changes: CheckResultChanges,
}

/// Submission of the page-checks form for one page.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PageChecksSubmission {
    /// Page version the form was rendered with
    pub page_version: i32,
    /// Marks the page as done for today, or clears the mark
    #[serde(default)]
    pub complete: Option<bool>,
    #[serde(default)]
    pub results: Vec<CheckResultEdit>,
    pub save_action: SaveAction,
}

/// Result of submitting the page-checks form.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PageChecksOutcome {
    pub page: PageResponse,
    pub updated: Vec<CheckResultResponse>,
    pub next: WizardStep,
}

/// Check result as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckResultResponse {
    pub id: Uuid,
    pub audit_id: Uuid,
    pub page_id: Uuid,
    pub wcag_definition_id: Uuid,
    pub test_type: TestType,
    pub failed: bool,
    pub notes: String,
    pub version: i32,
    pub lifecycle: Lifecycle,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CheckResultResponse {
    pub fn from_model(model: check_result::Model) -> AppResult<Self> {
        Ok(Self {
            test_type: decode(&model.test_type, TestType::parse, "check_results.test_type")?,
            lifecycle: Lifecycle::from_deleted_at(&model.deleted_at),
            id: model.id,
            audit_id: model.audit_id,
            page_id: model.page_id,
            wcag_definition_id: model.wcag_definition_id,
            failed: model.failed,
            notes: model.notes,
            version: model.version,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// A failure of the same definition recorded on another page.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OtherPageFailure {
    pub page_id: Uuid,
    pub page_name: String,
    pub check_result_id: Uuid,
    pub notes: String,
}

/// One question of the page-checks form.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuestionWithOtherFailures {
    pub definition: WcagDefinitionResponse,
    pub result: CheckResultResponse,
    pub other_pages_failed: Vec<OtherPageFailure>,
}

/// Data behind the page-checks form.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PageChecksForm {
    pub page: PageResponse,
    pub questions: Vec<QuestionWithOtherFailures>,
}
