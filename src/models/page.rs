//! Page domain models and DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::page;
use crate::error::AppResult;

use super::{Lifecycle, TestType, decode};

/// Kind of a real page on the audited website.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    Extra,
    Home,
    Contact,
    Statement,
    Pdf,
    Form,
}

impl PageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extra => "extra",
            Self::Home => "home",
            Self::Contact => "contact",
            Self::Statement => "statement",
            Self::Pdf => "pdf",
            Self::Form => "form",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "extra" => Some(Self::Extra),
            "home" => Some(Self::Home),
            "contact" => Some(Self::Contact),
            "statement" => Some(Self::Statement),
            "pdf" => Some(Self::Pdf),
            "form" => Some(Self::Form),
            _ => None,
        }
    }

    /// Label shown when the page has no name of its own.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Extra => "Additional page",
            Self::Home => "Home page",
            Self::Contact => "Contact page",
            Self::Statement => "Accessibility statement",
            Self::Pdf => "PDF",
            Self::Form => "A form",
        }
    }
}

impl std::fmt::Display for PageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a page row stands for.
///
/// `AggregateAll` is the "all pages" pseudo-page: its check results are a
/// batch-editing surface mirrored onto the html pages, never counted itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageRole {
    Concrete(PageType),
    AggregateAll,
}

impl PageRole {
    pub const ALL_PAGES: &'static str = "all";

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Concrete(page_type) => page_type.as_str(),
            Self::AggregateAll => Self::ALL_PAGES,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        if s == Self::ALL_PAGES {
            return Some(Self::AggregateAll);
        }
        PageType::parse(s).map(Self::Concrete)
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, Self::AggregateAll)
    }

    pub fn concrete(&self) -> Option<PageType> {
        match self {
            Self::Concrete(page_type) => Some(*page_type),
            Self::AggregateAll => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Concrete(page_type) => page_type.label(),
            Self::AggregateAll => "All pages",
        }
    }

    /// Test types whose definitions produce check results on this page.
    pub fn applicable_test_types(&self) -> &'static [TestType] {
        match self {
            Self::Concrete(PageType::Pdf) => &[TestType::Pdf],
            _ => &[TestType::Axe, TestType::Manual],
        }
    }

    /// Whether edits made through the "all pages" page are copied here.
    pub fn receives_all_pages_edits(&self) -> bool {
        matches!(
            self,
            Self::Concrete(PageType::Home | PageType::Contact | PageType::Form | PageType::Extra)
        )
    }

    /// Position in the page-by-page checks wizard.
    pub fn wizard_rank(&self) -> u8 {
        match self {
            Self::Concrete(PageType::Home) => 0,
            Self::Concrete(PageType::Contact) => 1,
            Self::Concrete(PageType::Form) => 2,
            Self::Concrete(PageType::Statement) => 3,
            Self::Concrete(PageType::Extra) => 4,
            Self::Concrete(PageType::Pdf) => 5,
            Self::AggregateAll => 6,
        }
    }
}

impl std::fmt::Display for PageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for PageRole {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Read helpers over the stored page row.
impl page::Model {
    pub fn role(&self) -> AppResult<PageRole> {
        decode(&self.page_type, PageRole::parse, "pages.page_type")
    }

    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// Active, concrete and still present on the website.
    pub fn is_testable(&self) -> bool {
        self.is_active()
            && !self.not_found
            && matches!(PageRole::parse(&self.page_type), Some(PageRole::Concrete(_)))
    }

    pub fn display_name(&self) -> String {
        if !self.name.trim().is_empty() {
            return self.name.clone();
        }
        PageRole::parse(&self.page_type)
            .map(|role| role.label().to_string())
            .unwrap_or_else(|| self.page_type.clone())
    }
}

/// Request to add a page to an audit.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddPageRequest {
    pub page_type: PageType,
    #[serde(default)]
    pub name: String,
    pub url: String,
}

/// Request to edit a page.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdatePageRequest {
    pub version: i32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub not_found: Option<bool>,
}

/// Page as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PageResponse {
    pub id: Uuid,
    pub audit_id: Uuid,
    #[schema(value_type = String, example = "home")]
    pub page_type: PageRole,
    pub name: String,
    pub display_name: String,
    pub url: String,
    pub not_found: bool,
    pub complete_date: Option<NaiveDate>,
    pub version: i32,
    pub lifecycle: Lifecycle,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PageResponse {
    pub fn from_model(model: page::Model) -> AppResult<Self> {
        Ok(Self {
            page_type: model.role()?,
            display_name: model.display_name(),
            lifecycle: Lifecycle::from_deleted_at(&model.deleted_at),
            id: model.id,
            audit_id: model.audit_id,
            name: model.name,
            url: model.url,
            not_found: model.not_found,
            complete_date: model.complete_date,
            version: model.version,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
