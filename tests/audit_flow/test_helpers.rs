//! Shared helpers for audit flow tests.

use actix_web::{App, dev::ServiceResponse, test, web};
use amp_server_lib::config::DatabaseSettings;
use amp_server_lib::db::DbPool;
use amp_server_lib::entity::{audit, case, check_result, page, wcag_definition};
use amp_server_lib::models::{
    AddPageRequest, AuditMetadata, CheckResultChanges, CreateAuditRequest, CreateCaseRequest,
    NewWcagDefinition, PageType, TestType, WcagSubType,
};
use amp_server_lib::services;
use serde_json::Value;

/// Fresh in-memory database with the schema applied.
pub async fn create_test_pool() -> DbPool {
    let pool = DbPool::connect(&DatabaseSettings::in_memory())
        .await
        .expect("Failed to open in-memory database");
    pool.run_migrations()
        .await
        .expect("Failed to run migrations");
    pool
}

/// Add a definition with an open validity window.
pub async fn seed_definition(
    pool: &DbPool,
    test_type: TestType,
    name: &str,
) -> wcag_definition::Model {
    services::reference::add_wcag_definition(
        pool,
        &NewWcagDefinition {
            test_type,
            sub_type: WcagSubType::Other,
            name: name.to_string(),
            description: String::new(),
            url: String::new(),
            date_start: None,
            date_end: None,
        },
    )
    .await
    .expect("Failed to seed definition")
}

/// One axe and one manual definition.
pub async fn seed_html_definitions(pool: &DbPool) -> Vec<wcag_definition::Model> {
    vec![
        seed_definition(pool, TestType::Axe, "1.1.1 Non-text content").await,
        seed_definition(pool, TestType::Manual, "2.4.7 Focus visible").await,
    ]
}

pub async fn create_case(pool: &DbPool) -> case::Model {
    services::cases::create_case(
        pool,
        &CreateCaseRequest {
            organisation_name: "Example Council".to_string(),
            home_page_url: "https://www.example.gov.uk/".to_string(),
            auditor: Some("auditor".to_string()),
        },
    )
    .await
    .expect("Failed to create case")
}

/// Audit without the standard pages.
pub async fn create_bare_audit(pool: &DbPool, case_id: uuid::Uuid) -> audit::Model {
    services::audits::create_audit(
        pool,
        case_id,
        &CreateAuditRequest {
            metadata: AuditMetadata::default(),
            standard_pages: false,
        },
    )
    .await
    .expect("Failed to create audit")
    .audit
}

pub async fn add_page(
    pool: &DbPool,
    audit_id: uuid::Uuid,
    page_type: PageType,
    url: &str,
) -> page::Model {
    services::check_results::add_page(
        pool,
        audit_id,
        &AddPageRequest {
            page_type,
            name: String::new(),
            url: url.to_string(),
        },
    )
    .await
    .expect("Failed to add page")
}

/// Case, bare audit and one home page.
pub async fn audit_with_home_page(pool: &DbPool) -> (case::Model, audit::Model, page::Model) {
    let case = create_case(pool).await;
    let audit = create_bare_audit(pool, case.id).await;
    let home = add_page(pool, audit.id, PageType::Home, "https://www.example.gov.uk/").await;
    (case, audit, home)
}

/// Check results on one page.
pub async fn results_on(pool: &DbPool, page: &page::Model) -> Vec<check_result::Model> {
    amp_server_lib::db::check_results::find_check_results(pool.connection(), page.audit_id, page.id)
        .await
        .expect("Failed to load check results")
}

/// Mark every check result on the page failed.
pub async fn fail_all(pool: &DbPool, page: &page::Model) {
    for result in results_on(pool, page).await {
        services::check_results::update_check_result(
            pool,
            result.id,
            result.version,
            &CheckResultChanges {
                failed: Some(true),
                notes: Some("Fails".to_string()),
            },
        )
        .await
        .expect("Failed to mark check result failed");
    }
}

/// Complete the audit at its current version.
pub async fn complete(pool: &DbPool, audit_id: uuid::Uuid) -> audit::Model {
    let current = services::audits::get_audit_detail(pool, audit_id)
        .await
        .expect("Failed to load audit")
        .audit;
    services::audits::complete_audit(pool, audit_id, current.version)
        .await
        .expect("Failed to complete audit")
}

/// Create a test app serving the versioned API.
pub async fn create_test_app(
    pool: &DbPool,
) -> impl actix_web::dev::Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
    test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .service(web::scope("/api/v1").configure(amp_server_lib::api::configure_routes)),
    )
    .await
}

/// Send a request and decode the JSON body, if any.
pub async fn send<S>(app: &S, req: test::TestRequest) -> (u16, Value)
where
    S: actix_web::dev::Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status().as_u16();
    let bytes = test::read_body(resp).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}
