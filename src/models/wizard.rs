//! Test wizard navigation types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Submit button used on a wizard form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SaveAction {
    /// Save and stay on the same form
    Save,
    /// Save and go to the next form
    SaveContinue,
    /// Save and return to the audit summary
    SaveExit,
}

/// A form in the initial test wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum WizardStep {
    Metadata,
    Pages,
    PageChecks { page_id: Uuid },
    WebsiteDecision,
    InitialDisproportionateBurden,
    StatementPages,
    StatementOverview,
    StatementWebsite,
    StatementCompliance,
    StatementNonAccessible,
    StatementPreparation,
    StatementFeedback,
    StatementCustom,
    StatementDecision,
    WcagSummary,
    StatementSummary,
    Summary,
}

/// Request to leave a non-page wizard form.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct WizardNavigationRequest {
    pub current: WizardStep,
    pub save_action: SaveAction,
}
