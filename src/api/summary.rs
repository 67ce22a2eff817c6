//! Aggregate figures for an audit.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{AuditSummary, OutstandingIssuesQuery, OutstandingIssuesResponse};
use crate::services;

#[utoipa::path(
    get,
    path = "/audits/{audit_id}/summary",
    tag = "Summary",
    params(
        ("audit_id" = Uuid, Path, description = "Audit UUID")
    ),
    responses(
        (status = 200, description = "Audit summary", body = AuditSummary),
        (status = 404, description = "Audit not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_summary(pool: web::Data<DbPool>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let summary = services::summary::audit_summary(&pool, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// Failed check results not yet fixed at the latest retest.
#[utoipa::path(
    get,
    path = "/audits/{audit_id}/outstanding-issues",
    tag = "Summary",
    params(
        ("audit_id" = Uuid, Path, description = "Audit UUID"),
        OutstandingIssuesQuery
    ),
    responses(
        (status = 200, description = "Grouped outstanding issues", body = OutstandingIssuesResponse),
        (status = 404, description = "Audit not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_outstanding_issues(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    query: web::Query<OutstandingIssuesQuery>,
) -> AppResult<HttpResponse> {
    let issues =
        services::summary::outstanding_issues(&pool, path.into_inner(), query.group_by).await?;
    Ok(HttpResponse::Ok().json(issues))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/audits/{audit_id}/summary").route(web::get().to(get_summary)))
        .service(
            web::resource("/audits/{audit_id}/outstanding-issues")
                .route(web::get().to(get_outstanding_issues)),
        );
}
