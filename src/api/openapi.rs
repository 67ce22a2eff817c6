//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Accessibility Monitoring Server",
        version = "0.1.0",
        description = "Case management for website accessibility audits: page-by-page WCAG checks, statement assessment, retests and compliance figures"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Case endpoints
        api::cases::create_case,
        api::cases::list_cases,
        api::cases::get_case,
        api::cases::update_case,
        api::cases::delete_case,
        api::cases::create_audit,
        api::cases::start_retest,
        // Audit endpoints
        api::audits::get_audit,
        api::audits::update_metadata,
        api::audits::update_decision,
        api::audits::complete_audit,
        api::audits::delete_audit,
        api::audits::add_page,
        api::audits::list_statement_pages,
        api::audits::create_standard_pages,
        api::audits::sync_check_results,
        // Wizard endpoints
        api::audits::get_cursor,
        api::audits::put_cursor,
        api::audits::navigate,
        // Page and check result endpoints
        api::pages::update_page,
        api::pages::remove_page,
        api::pages::restore_page,
        api::pages::get_page_checks,
        api::pages::submit_page_checks,
        api::pages::update_check_result,
        // Statement endpoints
        api::statements::list_results,
        api::statements::add_custom_issue,
        api::statements::sync_results,
        api::statements::update_result,
        api::statements::remove_custom_issue,
        // Summary endpoints
        api::summary::get_summary,
        api::summary::get_outstanding_issues,
        // Retest endpoints
        api::retests::get_retest,
        api::retests::delete_retest,
        api::retests::restore_retest,
        api::retests::update_decision,
        api::retests::update_page,
        api::retests::update_check_result,
        api::retests::update_statement_check_result,
        // Reference data endpoints
        api::reference::list_wcag_definitions,
        api::reference::add_wcag_definition,
        api::reference::update_wcag_definition,
        api::reference::list_statement_checks,
        api::reference::add_statement_check,
        api::reference::update_statement_check,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            models::Lifecycle,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Cases
            models::CaseStatus,
            models::WebsiteCompliance,
            models::StatementCompliance,
            models::CreateCaseRequest,
            models::UpdateCaseRequest,
            models::CaseResponse,
            // Audits
            models::ScreenSize,
            models::Exemptions,
            models::AuditMetadata,
            models::CreateAuditRequest,
            models::UpdateAuditMetadataRequest,
            models::AuditDecisionRequest,
            models::AuditResponse,
            models::AuditDetailResponse,
            api::audits::SyncResponse,
            // Wizard
            models::AdvanceCursorRequest,
            models::CursorResponse,
            models::SaveAction,
            models::WizardStep,
            models::WizardNavigationRequest,
            // Pages and check results
            models::PageType,
            models::AddPageRequest,
            models::UpdatePageRequest,
            models::PageResponse,
            models::CheckResultChanges,
            models::UpdateCheckResultRequest,
            models::CheckResultEdit,
            models::PageChecksSubmission,
            models::PageChecksOutcome,
            models::CheckResultResponse,
            models::OtherPageFailure,
            models::QuestionWithOtherFailures,
            models::PageChecksForm,
            api::pages::CheckResultUpdateResponse,
            // Statement
            models::StatementCheckType,
            models::StatementResultState,
            models::UpdateStatementCheckResultRequest,
            models::AddCustomIssueRequest,
            models::StatementCheckResultResponse,
            // Summary
            models::GroupBy,
            models::IssueGroup,
            models::OutstandingIssuesResponse,
            models::AuditSummary,
            // Retests
            models::RetestOutcome,
            models::DisproportionateBurden,
            models::RetestDecisionRequest,
            models::UpdateRetestPageRequest,
            models::UpdateRetestCheckResultRequest,
            models::UpdateRetestStatementCheckResultRequest,
            models::RetestResponse,
            models::RetestPageResponse,
            models::RetestCheckResultResponse,
            models::RetestStatementCheckResultResponse,
            models::RetestDetailResponse,
            // Reference data
            models::TestType,
            models::WcagSubType,
            models::NewWcagDefinition,
            models::UpdateWcagDefinitionRequest,
            models::WcagDefinitionResponse,
            models::NewStatementCheck,
            models::UpdateStatementCheckRequest,
            models::StatementCheckResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Cases", description = "Case management, audit creation and retest start"),
        (name = "Audits", description = "Initial test metadata, completion and deletion"),
        (name = "Wizard", description = "Initial test wizard navigation"),
        (name = "Pages", description = "Pages under test"),
        (name = "Check results", description = "WCAG check results and the all-pages synchroniser"),
        (name = "Statement", description = "Accessibility statement assessment"),
        (name = "Summary", description = "Compliance figures and outstanding issues"),
        (name = "Retests", description = "Retests of outstanding issues"),
        (name = "Reference data", description = "WCAG definitions and statement checks")
    )
)]
pub struct ApiDoc;
