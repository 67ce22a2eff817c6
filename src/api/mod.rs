//! API endpoint modules.

pub mod audits;
pub mod cases;
pub mod health;
pub mod openapi;
pub mod pages;
pub mod reference;
pub mod retests;
pub mod statements;
pub mod summary;

pub use audits::configure_routes as configure_audit_routes;
pub use cases::configure_routes as configure_case_routes;
pub use health::configure_health_routes;
pub use openapi::ApiDoc;
pub use pages::configure_routes as configure_page_routes;
pub use reference::configure_routes as configure_reference_routes;
pub use retests::configure_routes as configure_retest_routes;
pub use statements::configure_routes as configure_statement_routes;
pub use summary::configure_routes as configure_summary_routes;

use actix_web::web;

use crate::error::AppError;

/// Report malformed bodies, queries and path ids in the API's error format.
fn extractor_configs(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _| AppError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _| AppError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _| AppError::Validation(err.to_string()).into()),
    );
}

/// Register every `/api/v1` route.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(extractor_configs)
        .configure(configure_health_routes)
        .configure(configure_case_routes)
        .configure(configure_audit_routes)
        .configure(configure_page_routes)
        .configure(configure_statement_routes)
        .configure(configure_summary_routes)
        .configure(configure_retest_routes)
        .configure(configure_reference_routes);
}
