//! Aggregate figures for an audit.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Dimension outstanding issues are grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    #[default]
    Page,
    Wcag,
}

/// Query parameters for the outstanding issues view.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct OutstandingIssuesQuery {
    #[serde(default)]
    pub group_by: GroupBy,
}

/// Issues that share a page or a definition.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IssueGroup {
    /// Page or WCAG definition id
    pub key: Uuid,
    pub label: String,
    pub check_result_ids: Vec<Uuid>,
    pub count: usize,
}

/// Outstanding issues grouped for display.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OutstandingIssuesResponse {
    pub audit_id: Uuid,
    pub group_by: GroupBy,
    pub total: usize,
    pub groups: Vec<IssueGroup>,
}

/// Headline figures for an audit and its latest retest.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuditSummary {
    pub audit_id: Uuid,
    pub failed_check_results: usize,
    pub unfixed_check_results: usize,
    pub fixed_check_results: usize,
    /// 0 to 100; 100 when nothing failed
    pub percentage_fixed: u8,
    pub failed_statement_checks: usize,
    pub statement_errors_fixed_percentage: u8,
    pub all_overview_statement_checks_passed: bool,
    pub failures_by_page: Vec<IssueGroup>,
    pub failures_by_wcag: Vec<IssueGroup>,
}
