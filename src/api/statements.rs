//! Statement assessment API handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{
    AddCustomIssueRequest, StatementCheckResultResponse, UpdateStatementCheckResultRequest,
    VersionParam,
};
use crate::services;

#[utoipa::path(
    get,
    path = "/audits/{audit_id}/statement-check-results",
    tag = "Statement",
    params(
        ("audit_id" = Uuid, Path, description = "Audit UUID")
    ),
    responses(
        (status = 200, description = "Statement answers, then custom issues", body = Vec<StatementCheckResultResponse>),
        (status = 404, description = "Audit not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn list_results(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let results = services::statements::list_statement_check_results(&pool, path.into_inner())
        .await?
        .into_iter()
        .map(StatementCheckResultResponse::from_model)
        .collect::<AppResult<Vec<_>>>()?;
    Ok(HttpResponse::Ok().json(results))
}

/// Create answers for statement checks brought into force since the audit was set up.
#[utoipa::path(
    post,
    path = "/audits/{audit_id}/statement-check-results/sync",
    tag = "Statement",
    params(
        ("audit_id" = Uuid, Path, description = "Audit UUID")
    ),
    responses(
        (status = 200, description = "Answers created by this run; empty when already in sync", body = Vec<StatementCheckResultResponse>),
        (status = 404, description = "Audit not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn sync_results(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let created = services::statements::ensure_statement_check_results(&pool, path.into_inner())
        .await?
        .into_iter()
        .map(StatementCheckResultResponse::from_model)
        .collect::<AppResult<Vec<_>>>()?;
    Ok(HttpResponse::Ok().json(created))
}

/// Record a statement issue no reference question covers.
#[utoipa::path(
    post,
    path = "/audits/{audit_id}/statement-check-results",
    tag = "Statement",
    params(
        ("audit_id" = Uuid, Path, description = "Audit UUID")
    ),
    request_body = AddCustomIssueRequest,
    responses(
        (status = 201, description = "Custom issue added", body = StatementCheckResultResponse),
        (status = 400, description = "Comment missing", body = crate::error::ErrorResponse),
    )
)]
pub async fn add_custom_issue(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<AddCustomIssueRequest>,
) -> AppResult<HttpResponse> {
    let issue =
        services::statements::add_custom_statement_issue(&pool, path.into_inner(), &body).await?;
    Ok(HttpResponse::Created().json(StatementCheckResultResponse::from_model(issue)?))
}

#[utoipa::path(
    put,
    path = "/statement-check-results/{result_id}",
    tag = "Statement",
    params(
        ("result_id" = Uuid, Path, description = "Statement check result UUID")
    ),
    request_body = UpdateStatementCheckResultRequest,
    responses(
        (status = 200, description = "Answer saved", body = StatementCheckResultResponse),
        (status = 409, description = "Answer changed since it was loaded", body = crate::error::ErrorResponse),
    )
)]
pub async fn update_result(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateStatementCheckResultRequest>,
) -> AppResult<HttpResponse> {
    let result =
        services::statements::update_statement_check_result(&pool, path.into_inner(), &body)
            .await?;
    Ok(HttpResponse::Ok().json(StatementCheckResultResponse::from_model(result)?))
}

#[utoipa::path(
    delete,
    path = "/statement-check-results/{result_id}",
    tag = "Statement",
    params(
        ("result_id" = Uuid, Path, description = "Statement check result UUID"),
        VersionParam
    ),
    responses(
        (status = 204, description = "Custom issue removed"),
        (status = 422, description = "Not a custom issue", body = crate::error::ErrorResponse),
    )
)]
pub async fn remove_custom_issue(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    query: web::Query<VersionParam>,
) -> AppResult<HttpResponse> {
    services::statements::remove_custom_statement_issue(&pool, path.into_inner(), query.version)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/audits/{audit_id}/statement-check-results")
            .route(web::get().to(list_results))
            .route(web::post().to(add_custom_issue)),
    )
    .service(
        web::resource("/audits/{audit_id}/statement-check-results/sync")
            .route(web::post().to(sync_results)),
    )
    .service(
        web::resource("/statement-check-results/{result_id}")
            .route(web::put().to(update_result))
            .route(web::delete().to(remove_custom_issue)),
    );
}
