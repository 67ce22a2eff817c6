//! Accessibility statement checks and their per-audit results.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{statement_check, statement_check_result};
use crate::error::AppResult;

use super::{Lifecycle, decode};

/// Section of the statement assessment a check belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum StatementCheckType {
    Overview,
    Website,
    Compliance,
    NonAccessible,
    Preparation,
    Feedback,
    /// Free-text issue raised by the auditor
    Custom,
}

impl StatementCheckType {
    /// Sections with reference questions, in assessment order.
    pub const SECTIONS: [Self; 6] = [
        Self::Overview,
        Self::Website,
        Self::Compliance,
        Self::NonAccessible,
        Self::Preparation,
        Self::Feedback,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Website => "website",
            Self::Compliance => "compliance",
            Self::NonAccessible => "non-accessible",
            Self::Preparation => "preparation",
            Self::Feedback => "feedback",
            Self::Custom => "custom",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "overview" => Some(Self::Overview),
            "website" => Some(Self::Website),
            "compliance" => Some(Self::Compliance),
            "non-accessible" => Some(Self::NonAccessible),
            "preparation" => Some(Self::Preparation),
            "feedback" => Some(Self::Feedback),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

/// Answer to a statement question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum StatementResultState {
    Yes,
    /// The statement fails this check
    No,
    #[default]
    NotTested,
}

impl StatementResultState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::NotTested => "not-tested",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "yes" => Some(Self::Yes),
            "no" => Some(Self::No),
            "not-tested" => Some(Self::NotTested),
            _ => None,
        }
    }
}

impl statement_check::Model {
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        self.date_start.is_none_or(|start| start <= date)
            && self.date_end.is_none_or(|end| date <= end)
    }
}

impl statement_check_result::Model {
    pub fn is_custom(&self) -> bool {
        self.statement_check_id.is_none()
    }

    /// Failing answer or custom issue; these are carried into a retest.
    pub fn is_issue(&self) -> bool {
        self.is_custom() || self.state == StatementResultState::No.as_str()
    }
}

/// Request to append a statement check.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewStatementCheck {
    pub check_type: StatementCheckType,
    pub label: String,
    #[serde(default)]
    pub success_criteria: String,
    #[serde(default)]
    pub report_text: String,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub date_start: Option<NaiveDate>,
    #[serde(default)]
    pub date_end: Option<NaiveDate>,
}

/// Request to edit a statement check. The check type is fixed once added.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateStatementCheckRequest {
    pub label: String,
    #[serde(default)]
    pub success_criteria: String,
    #[serde(default)]
    pub report_text: String,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub date_start: Option<NaiveDate>,
    #[serde(default)]
    pub date_end: Option<NaiveDate>,
}

/// Statement check as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatementCheckResponse {
    pub id: Uuid,
    pub check_type: StatementCheckType,
    pub label: String,
    pub success_criteria: String,
    pub report_text: String,
    pub position: i32,
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
}

impl StatementCheckResponse {
    pub fn from_model(model: statement_check::Model) -> AppResult<Self> {
        Ok(Self {
            check_type: decode(
                &model.check_type,
                StatementCheckType::parse,
                "statement_checks.check_type",
            )?,
            id: model.id,
            label: model.label,
            success_criteria: model.success_criteria,
            report_text: model.report_text,
            position: model.position,
            date_start: model.date_start,
            date_end: model.date_end,
        })
    }
}

/// Request to answer a statement question.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateStatementCheckResultRequest {
    pub version: i32,
    pub state: StatementResultState,
    #[serde(default)]
    pub report_comment: Option<String>,
}

/// Request to raise a custom statement issue.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddCustomIssueRequest {
    pub report_comment: String,
}

/// Statement check result as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatementCheckResultResponse {
    pub id: Uuid,
    pub audit_id: Uuid,
    pub statement_check_id: Option<Uuid>,
    pub check_type: StatementCheckType,
    pub state: StatementResultState,
    pub report_comment: String,
    pub version: i32,
    pub lifecycle: Lifecycle,
    pub updated_at: DateTime<Utc>,
}

impl StatementCheckResultResponse {
    pub fn from_model(model: statement_check_result::Model) -> AppResult<Self> {
        Ok(Self {
            check_type: decode(
                &model.check_type,
                StatementCheckType::parse,
                "statement_check_results.check_type",
            )?,
            state: decode(
                &model.state,
                StatementResultState::parse,
                "statement_check_results.state",
            )?,
            lifecycle: Lifecycle::from_deleted_at(&model.deleted_at),
            id: model.id,
            audit_id: model.audit_id,
            statement_check_id: model.statement_check_id,
            report_comment: model.report_comment,
            version: model.version,
            updated_at: model.updated_at,
        })
    }
}
