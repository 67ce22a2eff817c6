//! Audit domain models and DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::audit;
use crate::error::AppResult;

use super::{DisproportionateBurden, Lifecycle, PageResponse, StatementCompliance, decode};

/// Screen size the test was carried out on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum ScreenSize {
    #[default]
    #[serde(rename = "15in")]
    FifteenInch,
    #[serde(rename = "13in")]
    ThirteenInch,
}

impl ScreenSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FifteenInch => "15in",
            Self::ThirteenInch => "13in",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "15in" => Some(Self::FifteenInch),
            "13in" => Some(Self::ThirteenInch),
            _ => None,
        }
    }
}

/// Whether the public body claims exemptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Exemptions {
    Yes,
    No,
    #[default]
    Unknown,
}

impl Exemptions {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Unknown => "unknown",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "yes" => Some(Self::Yes),
            "no" => Some(Self::No),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

/// Test metadata entered on the first wizard step.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AuditMetadata {
    #[serde(default)]
    pub date_of_test: Option<NaiveDate>,
    #[serde(default)]
    pub screen_size: ScreenSize,
    #[serde(default)]
    pub exemptions: Exemptions,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notes: String,
}

/// Request to start the initial test on a case.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateAuditRequest {
    #[serde(flatten)]
    pub metadata: AuditMetadata,
    /// Create home, contact, statement, pdf, form and all pages up front
    #[serde(default = "default_true")]
    pub standard_pages: bool,
}

fn default_true() -> bool {
    true
}

/// Request to edit the audit metadata.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateAuditMetadataRequest {
    pub version: i32,
    #[serde(flatten)]
    pub metadata: AuditMetadata,
}

/// Request to record the initial-test statement decisions.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AuditDecisionRequest {
    pub version: i32,
    #[serde(default)]
    pub disproportionate_burden: Option<DisproportionateBurden>,
    #[serde(default)]
    pub disproportionate_burden_notes: Option<String>,
    #[serde(default)]
    pub statement_compliance: Option<StatementCompliance>,
    #[serde(default)]
    pub statement_compliance_notes: Option<String>,
}

impl AuditDecisionRequest {
    pub fn is_empty(&self) -> bool {
        self.disproportionate_burden.is_none()
            && self.disproportionate_burden_notes.is_none()
            && self.statement_compliance.is_none()
            && self.statement_compliance_notes.is_none()
    }
}

/// Request to move the wizard cursor.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AdvanceCursorRequest {
    /// Page to point at, or null to clear the cursor
    pub page_id: Option<Uuid>,
}

/// Wizard cursor state.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CursorResponse {
    pub audit_id: Uuid,
    pub next_page_id: Option<Uuid>,
}

/// Audit as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuditResponse {
    pub id: Uuid,
    pub case_id: Uuid,
    pub date_of_test: Option<NaiveDate>,
    pub screen_size: ScreenSize,
    pub exemptions: Exemptions,
    pub description: String,
    pub notes: String,
    pub disproportionate_burden: DisproportionateBurden,
    pub disproportionate_burden_notes: String,
    pub statement_compliance: StatementCompliance,
    pub statement_compliance_notes: String,
    pub next_page_id: Option<Uuid>,
    pub completed_at: Option<DateTime<Utc>>,
    pub version: i32,
    pub lifecycle: Lifecycle,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AuditResponse {
    pub fn from_model(model: audit::Model) -> AppResult<Self> {
        Ok(Self {
            screen_size: decode(&model.screen_size, ScreenSize::parse, "audits.screen_size")?,
            exemptions: decode(&model.exemptions, Exemptions::parse, "audits.exemptions")?,
            disproportionate_burden: decode(
                &model.disproportionate_burden,
                DisproportionateBurden::parse,
                "audits.disproportionate_burden",
            )?,
            statement_compliance: decode(
                &model.statement_compliance,
                StatementCompliance::parse,
                "audits.statement_compliance",
            )?,
            lifecycle: Lifecycle::from_deleted_at(&model.deleted_at),
            id: model.id,
            case_id: model.case_id,
            date_of_test: model.date_of_test,
            description: model.description,
            notes: model.notes,
            disproportionate_burden_notes: model.disproportionate_burden_notes,
            statement_compliance_notes: model.statement_compliance_notes,
            next_page_id: model.next_page_id,
            completed_at: model.completed_at,
            version: model.version,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Audit with its active pages in wizard order.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuditDetailResponse {
    pub audit: AuditResponse,
    pub pages: Vec<PageResponse>,
}

impl audit::Model {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Date used to select reference data: the test date, else the creation day.
    pub fn reference_date(&self) -> NaiveDate {
        self.date_of_test
            .unwrap_or_else(|| self.created_at.date_naive())
    }
}
