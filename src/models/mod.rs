//! Domain models and DTOs for the accessibility monitoring server.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};

pub mod audit;
pub mod case;
pub mod check_result;
pub mod page;
pub mod retest;
pub mod statement;
pub mod summary;
pub mod wcag;
pub mod wizard;

// Re-export commonly used types
pub use audit::{
    AdvanceCursorRequest, AuditDecisionRequest, AuditDetailResponse, AuditMetadata, AuditResponse, CreateAuditRequest,
    CursorResponse, Exemptions, ScreenSize, UpdateAuditMetadataRequest,
};
pub use case::{
    CaseResponse, CaseStatus, CreateCaseRequest, StatementCompliance, UpdateCaseRequest, domain_from_url,
    WebsiteCompliance,
};
pub use check_result::{
    CheckResultChanges, CheckResultEdit, CheckResultResponse, OtherPageFailure, PageChecksForm,
    PageChecksSubmission, PageChecksOutcome, QuestionWithOtherFailures, UpdateCheckResultRequest,
};
pub use page::{AddPageRequest, PageResponse, PageRole, PageType, UpdatePageRequest};
pub use retest::{
    DisproportionateBurden, RetestCheckResultResponse, RetestDecisionRequest,
    RetestDetailResponse, RetestOutcome, RetestPageResponse, RetestResponse,
    RetestStatementCheckResultResponse, UpdateRetestCheckResultRequest, UpdateRetestPageRequest,
    UpdateRetestStatementCheckResultRequest,
};
pub use statement::{
    AddCustomIssueRequest, NewStatementCheck, StatementCheckResponse,
    StatementCheckResultResponse, StatementCheckType, StatementResultState,
    UpdateStatementCheckRequest, UpdateStatementCheckResultRequest,
};
pub use summary::{AuditSummary, GroupBy, IssueGroup, OutstandingIssuesQuery, OutstandingIssuesResponse};
pub use wcag::{
    NewWcagDefinition, TestType, UpdateWcagDefinitionRequest, WcagDefinitionResponse,
    WcagSubType,
};
pub use wizard::{SaveAction, WizardNavigationRequest, WizardStep};

/// Lifecycle of a soft-deletable record, derived from `deleted_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    Active,
    Deleted,
}

impl Lifecycle {
    pub fn from_deleted_at<T>(deleted_at: &Option<T>) -> Self {
        if deleted_at.is_some() {
            Self::Deleted
        } else {
            Self::Active
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Version the caller last read, for body-less mutations.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema, IntoParams)]
pub struct VersionParam {
    pub version: i32,
}

/// Decode an enum column, treating unknown values as corrupt data.
pub(crate) fn decode<T>(value: &str, parse: fn(&str) -> Option<T>, column: &str) -> AppResult<T> {
    parse(value).ok_or_else(|| {
        AppError::Integrity(format!("unexpected value '{}' in column {}", value, column))
    })
}

/// Require a non-empty http(s) URL.
pub(crate) fn validate_url(url: &str) -> AppResult<()> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("URL is required".to_string()));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(AppError::Validation(format!(
            "URL must start with http:// or https://, got '{}'",
            trimmed
        )));
    }
    Ok(())
}
