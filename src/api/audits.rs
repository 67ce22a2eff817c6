//! Audit API handlers: metadata, pages, wizard cursor and navigation.

use actix_web::{HttpResponse, web};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{
    AddPageRequest, AdvanceCursorRequest, AuditDecisionRequest, AuditDetailResponse, AuditResponse, CursorResponse,
    PageResponse, UpdateAuditMetadataRequest, VersionParam, WizardNavigationRequest, WizardStep,
};
use crate::services;

/// Result of a check-result synchronisation.
#[derive(Debug, Serialize, ToSchema)]
pub struct SyncResponse {
    pub audit_id: Uuid,
    /// Check results created by this run; 0 when already in sync
    pub created: usize,
}

#[utoipa::path(
    get,
    path = "/audits/{audit_id}",
    tag = "Audits",
    params(
        ("audit_id" = Uuid, Path, description = "Audit UUID")
    ),
    responses(
        (status = 200, description = "Audit with its pages in wizard order", body = AuditDetailResponse),
        (status = 404, description = "Audit not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_audit(pool: web::Data<DbPool>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let detail = services::audits::get_audit_detail(&pool, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(detail.into_response()?))
}

#[utoipa::path(
    put,
    path = "/audits/{audit_id}/metadata",
    tag = "Audits",
    params(
        ("audit_id" = Uuid, Path, description = "Audit UUID")
    ),
    request_body = UpdateAuditMetadataRequest,
    responses(
        (status = 200, description = "Metadata saved", body = AuditResponse),
        (status = 409, description = "Audit changed since it was loaded", body = crate::error::ErrorResponse),
    )
)]
pub async fn update_metadata(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateAuditMetadataRequest>,
) -> AppResult<HttpResponse> {
    let audit = services::audits::update_audit_metadata(
        &pool,
        path.into_inner(),
        body.version,
        &body.metadata,
    )
    .await?;
    Ok(HttpResponse::Ok().json(AuditResponse::from_model(audit)?))
}

/// Record the disproportionate burden and statement decisions.
#[utoipa::path(
    put,
    path = "/audits/{audit_id}/decision",
    tag = "Audits",
    params(
        ("audit_id" = Uuid, Path, description = "Audit UUID")
    ),
    request_body = AuditDecisionRequest,
    responses(
        (status = 200, description = "Decision saved", body = AuditResponse),
        (status = 400, description = "No decision fields given", body = crate::error::ErrorResponse),
        (status = 409, description = "Audit changed since it was loaded", body = crate::error::ErrorResponse),
    )
)]
pub async fn update_decision(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<AuditDecisionRequest>,
) -> AppResult<HttpResponse> {
    let audit = services::audits::update_audit_decision(&pool, path.into_inner(), &body).await?;
    Ok(HttpResponse::Ok().json(AuditResponse::from_model(audit)?))
}

/// Mark the initial test complete.
#[utoipa::path(
    post,
    path = "/audits/{audit_id}/complete",
    tag = "Audits",
    params(
        ("audit_id" = Uuid, Path, description = "Audit UUID"),
        VersionParam
    ),
    responses(
        (status = 200, description = "Audit completed", body = AuditResponse),
        (status = 409, description = "Audit changed since it was loaded", body = crate::error::ErrorResponse),
        (status = 422, description = "Audit already completed", body = crate::error::ErrorResponse),
    )
)]
pub async fn complete_audit(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    query: web::Query<VersionParam>,
) -> AppResult<HttpResponse> {
    let audit = services::audits::complete_audit(&pool, path.into_inner(), query.version).await?;
    Ok(HttpResponse::Ok().json(AuditResponse::from_model(audit)?))
}

/// Delete an audit whose pages have all been removed.
#[utoipa::path(
    delete,
    path = "/audits/{audit_id}",
    tag = "Audits",
    params(
        ("audit_id" = Uuid, Path, description = "Audit UUID"),
        VersionParam
    ),
    responses(
        (status = 204, description = "Audit deleted"),
        (status = 409, description = "Audit changed since it was loaded", body = crate::error::ErrorResponse),
        (status = 422, description = "Audit still has pages", body = crate::error::ErrorResponse),
    )
)]
pub async fn delete_audit(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    query: web::Query<VersionParam>,
) -> AppResult<HttpResponse> {
    services::audits::delete_audit(&pool, path.into_inner(), query.version).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    get,
    path = "/audits/{audit_id}/cursor",
    tag = "Wizard",
    params(
        ("audit_id" = Uuid, Path, description = "Audit UUID")
    ),
    responses(
        (status = 200, description = "Current wizard page", body = CursorResponse),
        (status = 404, description = "Audit not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_cursor(pool: web::Data<DbPool>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let cursor = services::wizard::read_cursor(&pool, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(cursor))
}

/// Point the wizard at a page, or clear it with a null `page_id`.
#[utoipa::path(
    put,
    path = "/audits/{audit_id}/cursor",
    tag = "Wizard",
    params(
        ("audit_id" = Uuid, Path, description = "Audit UUID")
    ),
    request_body = AdvanceCursorRequest,
    responses(
        (status = 200, description = "Cursor moved", body = CursorResponse),
        (status = 400, description = "Page is not an active page of this audit", body = crate::error::ErrorResponse),
    )
)]
pub async fn put_cursor(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<AdvanceCursorRequest>,
) -> AppResult<HttpResponse> {
    let cursor = services::wizard::move_cursor(&pool, path.into_inner(), body.page_id).await?;
    Ok(HttpResponse::Ok().json(cursor))
}

/// Leave a wizard form and get the next one.
#[utoipa::path(
    post,
    path = "/audits/{audit_id}/wizard",
    tag = "Wizard",
    params(
        ("audit_id" = Uuid, Path, description = "Audit UUID")
    ),
    request_body = WizardNavigationRequest,
    responses(
        (status = 200, description = "Next form", body = WizardStep),
    )
)]
pub async fn navigate(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<WizardNavigationRequest>,
) -> AppResult<HttpResponse> {
    let step =
        services::wizard::advance_section(&pool, path.into_inner(), body.current, body.save_action)
            .await?;
    Ok(HttpResponse::Ok().json(step))
}

#[utoipa::path(
    post,
    path = "/audits/{audit_id}/pages",
    tag = "Pages",
    params(
        ("audit_id" = Uuid, Path, description = "Audit UUID")
    ),
    request_body = AddPageRequest,
    responses(
        (status = 201, description = "Page added with its check results", body = PageResponse),
        (status = 400, description = "Invalid page", body = crate::error::ErrorResponse),
    )
)]
pub async fn add_page(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<AddPageRequest>,
) -> AppResult<HttpResponse> {
    let page = services::check_results::add_page(&pool, path.into_inner(), &body).await?;
    Ok(HttpResponse::Created().json(PageResponse::from_model(page)?))
}

/// Statement pages of the audit, for the statement-pages wizard step.
#[utoipa::path(
    get,
    path = "/audits/{audit_id}/statement-pages",
    tag = "Pages",
    params(
        ("audit_id" = Uuid, Path, description = "Audit UUID")
    ),
    responses(
        (status = 200, description = "Active statement pages", body = Vec<PageResponse>),
        (status = 404, description = "Audit not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn list_statement_pages(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let pages = services::audits::list_statement_pages(&pool, path.into_inner())
        .await?
        .into_iter()
        .map(PageResponse::from_model)
        .collect::<AppResult<Vec<_>>>()?;
    Ok(HttpResponse::Ok().json(pages))
}

/// Add the standard pages to an audit created without them.
#[utoipa::path(
    post,
    path = "/audits/{audit_id}/standard-pages",
    tag = "Pages",
    params(
        ("audit_id" = Uuid, Path, description = "Audit UUID")
    ),
    responses(
        (status = 201, description = "Standard pages created", body = Vec<PageResponse>),
        (status = 422, description = "Audit already has pages", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_standard_pages(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let pages = services::audits::create_standard_pages(&pool, path.into_inner())
        .await?
        .into_iter()
        .map(PageResponse::from_model)
        .collect::<AppResult<Vec<_>>>()?;
    Ok(HttpResponse::Created().json(pages))
}

/// Create check results for definitions added since the pages were set up.
#[utoipa::path(
    post,
    path = "/audits/{audit_id}/check-results/sync",
    tag = "Check results",
    params(
        ("audit_id" = Uuid, Path, description = "Audit UUID")
    ),
    responses(
        (status = 200, description = "Check results in sync", body = SyncResponse),
        (status = 404, description = "Audit not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn sync_check_results(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let audit_id = path.into_inner();
    let created = services::check_results::ensure_check_results_for_audit(&pool, audit_id).await?;
    Ok(HttpResponse::Ok().json(SyncResponse { audit_id, created }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/audits/{audit_id}")
            .route(web::get().to(get_audit))
            .route(web::delete().to(delete_audit)),
    )
    .service(web::resource("/audits/{audit_id}/metadata").route(web::put().to(update_metadata)))
    .service(web::resource("/audits/{audit_id}/decision").route(web::put().to(update_decision)))
    .service(web::resource("/audits/{audit_id}/complete").route(web::post().to(complete_audit)))
    .service(
        web::resource("/audits/{audit_id}/cursor")
            .route(web::get().to(get_cursor))
            .route(web::put().to(put_cursor)),
    )
    .service(web::resource("/audits/{audit_id}/wizard").route(web::post().to(navigate)))
    .service(web::resource("/audits/{audit_id}/pages").route(web::post().to(add_page)))
    .service(
        web::resource("/audits/{audit_id}/statement-pages")
            .route(web::get().to(list_statement_pages)),
    )
    .service(
        web::resource("/audits/{audit_id}/standard-pages")
            .route(web::post().to(create_standard_pages)),
    )
    .service(
        web::resource("/audits/{audit_id}/check-results/sync")
            .route(web::post().to(sync_check_results)),
    );
}
