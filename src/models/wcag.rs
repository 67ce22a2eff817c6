//! WCAG definition reference data.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::wcag_definition;
use crate::error::AppResult;

use super::decode;

/// How a success criterion is tested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TestType {
    /// Automated axe rule
    Axe,
    /// Manual check by the auditor
    Manual,
    /// Check applied to PDF documents
    Pdf,
}

impl TestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Axe => "axe",
            Self::Manual => "manual",
            Self::Pdf => "pdf",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "axe" => Some(Self::Axe),
            "manual" => Some(Self::Manual),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }
}

impl std::fmt::Display for TestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Grouping of manual checks in the page-checks form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum WcagSubType {
    Additional,
    AudioVisual,
    Keyboard,
    Other,
    Pdf,
    Zoom,
    Relationship,
    Navigation,
    Presentation,
    Aria,
    Timing,
    Nontext,
    Language,
}

impl WcagSubType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Additional => "additional",
            Self::AudioVisual => "audio-visual",
            Self::Keyboard => "keyboard",
            Self::Other => "other",
            Self::Pdf => "pdf",
            Self::Zoom => "zoom",
            Self::Relationship => "relationship",
            Self::Navigation => "navigation",
            Self::Presentation => "presentation",
            Self::Aria => "aria",
            Self::Timing => "timing",
            Self::Nontext => "nontext",
            Self::Language => "language",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "additional" => Some(Self::Additional),
            "audio-visual" => Some(Self::AudioVisual),
            "keyboard" => Some(Self::Keyboard),
            "other" => Some(Self::Other),
            "pdf" => Some(Self::Pdf),
            "zoom" => Some(Self::Zoom),
            "relationship" => Some(Self::Relationship),
            "navigation" => Some(Self::Navigation),
            "presentation" => Some(Self::Presentation),
            "aria" => Some(Self::Aria),
            "timing" => Some(Self::Timing),
            "nontext" => Some(Self::Nontext),
            "language" => Some(Self::Language),
            _ => None,
        }
    }
}

impl wcag_definition::Model {
    pub fn test_type(&self) -> AppResult<TestType> {
        decode(&self.test_type, TestType::parse, "wcag_definitions.test_type")
    }

    /// Whether the definition applies to a test carried out on `date`.
    ///
    /// Bounds are inclusive; a missing bound is open.
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        self.date_start.is_none_or(|start| start <= date)
            && self.date_end.is_none_or(|end| date <= end)
    }
}

/// Request to append a WCAG definition.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewWcagDefinition {
    pub test_type: TestType,
    #[serde(default = "default_sub_type")]
    pub sub_type: WcagSubType,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub date_start: Option<NaiveDate>,
    #[serde(default)]
    pub date_end: Option<NaiveDate>,
}

/// Request to edit a WCAG definition. The test type is fixed once added
/// since check results copy it.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateWcagDefinitionRequest {
    #[serde(default)]
    pub sub_type: Option<WcagSubType>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub date_start: Option<NaiveDate>,
    #[serde(default)]
    pub date_end: Option<NaiveDate>,
}

fn default_sub_type() -> WcagSubType {
    WcagSubType::Other
}

/// WCAG definition as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WcagDefinitionResponse {
    pub id: Uuid,
    pub test_type: TestType,
    pub sub_type: WcagSubType,
    pub name: String,
    pub description: String,
    pub url: String,
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl WcagDefinitionResponse {
    pub fn from_model(model: wcag_definition::Model) -> AppResult<Self> {
        Ok(Self {
            test_type: model.test_type()?,
            sub_type: decode(
                &model.sub_type,
                WcagSubType::parse,
                "wcag_definitions.sub_type",
            )?,
            id: model.id,
            name: model.name,
            description: model.description,
            url: model.url,
            date_start: model.date_start,
            date_end: model.date_end,
            created_at: model.created_at,
        })
    }
}
