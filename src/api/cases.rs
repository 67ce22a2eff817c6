//! Case API handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{
    AuditDetailResponse, CaseResponse, CreateAuditRequest, CreateCaseRequest,
    RetestDetailResponse, UpdateCaseRequest, VersionParam,
};
use crate::services;

/// Open a case.
#[utoipa::path(
    post,
    path = "/cases",
    tag = "Cases",
    request_body = CreateCaseRequest,
    responses(
        (status = 201, description = "Case created", body = CaseResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_case(
    pool: web::Data<DbPool>,
    body: web::Json<CreateCaseRequest>,
) -> AppResult<HttpResponse> {
    let case = services::cases::create_case(&pool, &body).await?;
    Ok(HttpResponse::Created().json(CaseResponse::from_model(case)?))
}

/// List active cases, newest first.
#[utoipa::path(
    get,
    path = "/cases",
    tag = "Cases",
    responses(
        (status = 200, description = "Active cases", body = Vec<CaseResponse>),
    )
)]
pub async fn list_cases(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let cases = services::cases::list_cases(&pool)
        .await?
        .into_iter()
        .map(CaseResponse::from_model)
        .collect::<AppResult<Vec<_>>>()?;
    Ok(HttpResponse::Ok().json(cases))
}

#[utoipa::path(
    get,
    path = "/cases/{case_id}",
    tag = "Cases",
    params(
        ("case_id" = Uuid, Path, description = "Case UUID")
    ),
    responses(
        (status = 200, description = "Case", body = CaseResponse),
        (status = 404, description = "Case not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_case(pool: web::Data<DbPool>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let case = services::cases::get_case(&pool, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(CaseResponse::from_model(case)?))
}

/// Update status, people or compliance decisions.
#[utoipa::path(
    put,
    path = "/cases/{case_id}",
    tag = "Cases",
    params(
        ("case_id" = Uuid, Path, description = "Case UUID")
    ),
    request_body = UpdateCaseRequest,
    responses(
        (status = 200, description = "Case updated", body = CaseResponse),
        (status = 404, description = "Case not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Case changed since it was loaded", body = crate::error::ErrorResponse),
    )
)]
pub async fn update_case(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCaseRequest>,
) -> AppResult<HttpResponse> {
    let case = services::cases::update_case(&pool, path.into_inner(), &body).await?;
    Ok(HttpResponse::Ok().json(CaseResponse::from_model(case)?))
}

/// Delete a case with no live audit or retest.
#[utoipa::path(
    delete,
    path = "/cases/{case_id}",
    tag = "Cases",
    params(
        ("case_id" = Uuid, Path, description = "Case UUID"),
        VersionParam
    ),
    responses(
        (status = 204, description = "Case deleted"),
        (status = 409, description = "Case changed since it was loaded", body = crate::error::ErrorResponse),
        (status = 422, description = "Case still has an audit or retest", body = crate::error::ErrorResponse),
    )
)]
pub async fn delete_case(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    query: web::Query<VersionParam>,
) -> AppResult<HttpResponse> {
    services::cases::delete_case(&pool, path.into_inner(), query.version).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Start the initial test, with the standard pages unless told otherwise.
#[utoipa::path(
    post,
    path = "/cases/{case_id}/audit",
    tag = "Cases",
    params(
        ("case_id" = Uuid, Path, description = "Case UUID")
    ),
    request_body = CreateAuditRequest,
    responses(
        (status = 201, description = "Audit created", body = AuditDetailResponse),
        (status = 404, description = "Case not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Case already has an audit", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_audit(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<CreateAuditRequest>,
) -> AppResult<HttpResponse> {
    let created = services::audits::create_audit(&pool, path.into_inner(), &body).await?;
    Ok(HttpResponse::Created().json(created.into_response()?))
}

/// Snapshot the completed audit's outstanding issues into a new retest.
#[utoipa::path(
    post,
    path = "/cases/{case_id}/retests",
    tag = "Cases",
    params(
        ("case_id" = Uuid, Path, description = "Case UUID")
    ),
    responses(
        (status = 201, description = "Retest started", body = RetestDetailResponse),
        (status = 404, description = "Case not found", body = crate::error::ErrorResponse),
        (status = 422, description = "No completed audit, or a retest is already open", body = crate::error::ErrorResponse),
    )
)]
pub async fn start_retest(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let snapshot = services::retests::start_retest(&pool, path.into_inner()).await?;
    Ok(HttpResponse::Created().json(snapshot.into_response()?))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/cases")
            .route(web::get().to(list_cases))
            .route(web::post().to(create_case)),
    )
    .service(
        web::resource("/cases/{case_id}")
            .route(web::get().to(get_case))
            .route(web::put().to(update_case))
            .route(web::delete().to(delete_case)),
    )
    .service(web::resource("/cases/{case_id}/audit").route(web::post().to(create_audit)))
    .service(web::resource("/cases/{case_id}/retests").route(web::post().to(start_retest)));
}
