//! Case domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::case;
use crate::error::AppResult;

use super::{Lifecycle, decode};

/// Workflow stage of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum CaseStatus {
    #[serde(rename = "new-case")]
    NewCase,
    #[serde(rename = "test-in-progress")]
    TestInProgress,
    #[serde(rename = "report-in-progress")]
    ReportInProgress,
    #[serde(rename = "awaiting-response")]
    AwaitingResponse,
    #[serde(rename = "12w-due")]
    TwelveWeekDue,
    #[serde(rename = "12w-sent")]
    TwelveWeekSent,
    #[serde(rename = "escalated")]
    Escalated,
    #[serde(rename = "complete")]
    Complete,
    #[serde(rename = "archived")]
    Archived,
    #[serde(rename = "not-a-psb")]
    NotAPublicSectorBody,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewCase => "new-case",
            Self::TestInProgress => "test-in-progress",
            Self::ReportInProgress => "report-in-progress",
            Self::AwaitingResponse => "awaiting-response",
            Self::TwelveWeekDue => "12w-due",
            Self::TwelveWeekSent => "12w-sent",
            Self::Escalated => "escalated",
            Self::Complete => "complete",
            Self::Archived => "archived",
            Self::NotAPublicSectorBody => "not-a-psb",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new-case" => Some(Self::NewCase),
            "test-in-progress" => Some(Self::TestInProgress),
            "report-in-progress" => Some(Self::ReportInProgress),
            "awaiting-response" => Some(Self::AwaitingResponse),
            "12w-due" => Some(Self::TwelveWeekDue),
            "12w-sent" => Some(Self::TwelveWeekSent),
            "escalated" => Some(Self::Escalated),
            "complete" => Some(Self::Complete),
            "archived" => Some(Self::Archived),
            "not-a-psb" => Some(Self::NotAPublicSectorBody),
            _ => None,
        }
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Website compliance decision recorded after the initial test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum WebsiteCompliance {
    Compliant,
    PartiallyCompliant,
    NotCompliant,
    #[default]
    Unknown,
}

impl WebsiteCompliance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compliant => "compliant",
            Self::PartiallyCompliant => "partially-compliant",
            Self::NotCompliant => "not-compliant",
            Self::Unknown => "unknown",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "compliant" => Some(Self::Compliant),
            "partially-compliant" => Some(Self::PartiallyCompliant),
            "not-compliant" => Some(Self::NotCompliant),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

/// Accessibility statement compliance decision.
///
/// Recorded on the case, on the initial test and independently on each retest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum StatementCompliance {
    Compliant,
    NotCompliant,
    #[default]
    Unknown,
}

impl StatementCompliance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compliant => "compliant",
            Self::NotCompliant => "not-compliant",
            Self::Unknown => "unknown",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "compliant" => Some(Self::Compliant),
            "not-compliant" => Some(Self::NotCompliant),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

/// Request to open a case.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateCaseRequest {
    pub organisation_name: String,
    pub home_page_url: String,
    #[serde(default)]
    pub auditor: Option<String>,
}

/// Request to edit a case. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateCaseRequest {
    pub version: i32,
    #[serde(default)]
    pub organisation_name: Option<String>,
    #[serde(default)]
    pub status: Option<CaseStatus>,
    #[serde(default)]
    pub auditor: Option<String>,
    #[serde(default)]
    pub reviewer: Option<String>,
    #[serde(default)]
    pub website_compliance: Option<WebsiteCompliance>,
    #[serde(default)]
    pub statement_compliance: Option<StatementCompliance>,
    #[serde(default)]
    pub compliance_notes: Option<String>,
}

/// Case as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CaseResponse {
    pub id: Uuid,
    pub organisation_name: String,
    pub home_page_url: String,
    pub domain: String,
    pub status: CaseStatus,
    pub auditor: Option<String>,
    pub reviewer: Option<String>,
    pub website_compliance: WebsiteCompliance,
    pub statement_compliance: StatementCompliance,
    pub compliance_notes: String,
    pub version: i32,
    pub lifecycle: Lifecycle,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CaseResponse {
    pub fn from_model(model: case::Model) -> AppResult<Self> {
        Ok(Self {
            status: decode(&model.status, CaseStatus::parse, "cases.status")?,
            website_compliance: decode(
                &model.website_compliance,
                WebsiteCompliance::parse,
                "cases.website_compliance",
            )?,
            statement_compliance: decode(
                &model.statement_compliance,
                StatementCompliance::parse,
                "cases.statement_compliance",
            )?,
            lifecycle: Lifecycle::from_deleted_at(&model.deleted_at),
            id: model.id,
            organisation_name: model.organisation_name,
            home_page_url: model.home_page_url,
            domain: model.domain,
            auditor: model.auditor,
            reviewer: model.reviewer,
            compliance_notes: model.compliance_notes,
            version: model.version,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Extract the domain from a home page URL.
///
/// `https://www.example.gov.uk/path` gives `www.example.gov.uk`.
pub fn domain_from_url(url: &str) -> String {
    let without_scheme = url
        .trim()
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(url.trim());
    without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}
