//! Retest domain models and DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{retest, retest_check_result, retest_page, retest_statement_check_result};
use crate::error::AppResult;

use super::{Lifecycle, PageRole, StatementCheckType, StatementCompliance, TestType, decode};

/// Remediation state of an issue carried into a retest.
///
/// Starts at `NotRetested`; every transition is made by a tester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum RetestOutcome {
    #[default]
    NotRetested,
    Fixed,
    NotFixed,
}

impl RetestOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotRetested => "not-retested",
            Self::Fixed => "fixed",
            Self::NotFixed => "not-fixed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "not-retested" => Some(Self::NotRetested),
            "fixed" => Some(Self::Fixed),
            "not-fixed" => Some(Self::NotFixed),
            _ => None,
        }
    }

    /// Not-retested issues still count as outstanding.
    pub fn is_outstanding(&self) -> bool {
        !matches!(self, Self::Fixed)
    }
}

/// Disproportionate burden claim found in the accessibility statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum DisproportionateBurden {
    NoAssessment,
    Assessment,
    NoClaim,
    #[default]
    NotChecked,
}

impl DisproportionateBurden {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoAssessment => "no-assessment",
            Self::Assessment => "assessment",
            Self::NoClaim => "no-claim",
            Self::NotChecked => "not-checked",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "no-assessment" => Some(Self::NoAssessment),
            "assessment" => Some(Self::Assessment),
            "no-claim" => Some(Self::NoClaim),
            "not-checked" => Some(Self::NotChecked),
            _ => None,
        }
    }
}

/// Request to record the retest decisions.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RetestDecisionRequest {
    pub version: i32,
    #[serde(default)]
    pub date_of_retest: Option<NaiveDate>,
    #[serde(default)]
    pub statement_compliance: Option<StatementCompliance>,
    #[serde(default)]
    pub disproportionate_burden: Option<DisproportionateBurden>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request to update one retest check result.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateRetestCheckResultRequest {
    pub version: i32,
    pub outcome: RetestOutcome,
    #[serde(default)]
    pub retest_notes: Option<String>,
}

/// Request to update one retest statement check result.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateRetestStatementCheckResultRequest {
    pub version: i32,
    pub outcome: RetestOutcome,
    #[serde(default)]
    pub retest_comment: Option<String>,
}

/// Request to update a retest page.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateRetestPageRequest {
    pub version: i32,
    /// Date the page was found to be missing; null when present
    #[serde(default)]
    pub missing_date: Option<NaiveDate>,
    #[serde(default)]
    pub additional_issues_notes: Option<String>,
}

/// Retest as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RetestResponse {
    pub id: Uuid,
    pub case_id: Uuid,
    pub sequence: i32,
    pub date_of_retest: Option<NaiveDate>,
    pub statement_compliance: StatementCompliance,
    pub disproportionate_burden: DisproportionateBurden,
    pub notes: String,
    pub version: i32,
    pub lifecycle: Lifecycle,
    pub created_at: DateTime<Utc>,
}

impl RetestResponse {
    pub fn from_model(model: retest::Model) -> AppResult<Self> {
        Ok(Self {
            statement_compliance: decode(
                &model.statement_compliance,
                StatementCompliance::parse,
                "retests.statement_compliance",
            )?,
            disproportionate_burden: decode(
                &model.disproportionate_burden,
                DisproportionateBurden::parse,
                "retests.disproportionate_burden",
            )?,
            lifecycle: Lifecycle::from_deleted_at(&model.deleted_at),
            id: model.id,
            case_id: model.case_id,
            sequence: model.sequence,
            date_of_retest: model.date_of_retest,
            notes: model.notes,
            version: model.version,
            created_at: model.created_at,
        })
    }
}

/// Retest page as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RetestPageResponse {
    pub id: Uuid,
    pub page_id: Uuid,
    #[schema(value_type = String, example = "home")]
    pub page_type: PageRole,
    pub name: String,
    pub url: String,
    pub missing_date: Option<NaiveDate>,
    pub additional_issues_notes: String,
    pub version: i32,
}

impl RetestPageResponse {
    pub fn from_model(model: retest_page::Model) -> AppResult<Self> {
        Ok(Self {
            page_type: decode(&model.page_type, PageRole::parse, "retest_pages.page_type")?,
            id: model.id,
            page_id: model.page_id,
            name: model.name,
            url: model.url,
            missing_date: model.missing_date,
            additional_issues_notes: model.additional_issues_notes,
            version: model.version,
        })
    }
}

/// Retest check result as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RetestCheckResultResponse {
    pub id: Uuid,
    pub retest_page_id: Uuid,
    pub check_result_id: Uuid,
    pub wcag_definition_id: Uuid,
    pub test_type: TestType,
    pub outcome: RetestOutcome,
    pub retest_notes: String,
    pub version: i32,
}

impl RetestCheckResultResponse {
    pub fn from_model(model: retest_check_result::Model) -> AppResult<Self> {
        Ok(Self {
            test_type: decode(
                &model.test_type,
                TestType::parse,
                "retest_check_results.test_type",
            )?,
            outcome: decode(
                &model.outcome,
                RetestOutcome::parse,
                "retest_check_results.outcome",
            )?,
            id: model.id,
            retest_page_id: model.retest_page_id,
            check_result_id: model.check_result_id,
            wcag_definition_id: model.wcag_definition_id,
            retest_notes: model.retest_notes,
            version: model.version,
        })
    }
}

/// Retest statement check result as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RetestStatementCheckResultResponse {
    pub id: Uuid,
    pub statement_check_result_id: Uuid,
    pub statement_check_id: Option<Uuid>,
    pub check_type: StatementCheckType,
    pub comment: String,
    pub outcome: RetestOutcome,
    pub retest_comment: String,
    pub version: i32,
}

impl RetestStatementCheckResultResponse {
    pub fn from_model(model: retest_statement_check_result::Model) -> AppResult<Self> {
        Ok(Self {
            check_type: decode(
                &model.check_type,
                StatementCheckType::parse,
                "retest_statement_check_results.check_type",
            )?,
            outcome: decode(
                &model.outcome,
                RetestOutcome::parse,
                "retest_statement_check_results.outcome",
            )?,
            id: model.id,
            statement_check_result_id: model.statement_check_result_id,
            statement_check_id: model.statement_check_id,
            comment: model.comment,
            retest_comment: model.retest_comment,
            version: model.version,
        })
    }
}

/// A retest with every record it owns.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RetestDetailResponse {
    pub retest: RetestResponse,
    pub pages: Vec<RetestPageResponse>,
    pub check_results: Vec<RetestCheckResultResponse>,
    pub statement_check_results: Vec<RetestStatementCheckResultResponse>,
}
