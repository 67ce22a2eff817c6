//! Page and check result API handlers.

use actix_web::{HttpResponse, web};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{
    CheckResultResponse, PageChecksForm, PageChecksOutcome, PageChecksSubmission, PageResponse,
    UpdateCheckResultRequest, UpdatePageRequest, VersionParam,
};
use crate::services;

/// An edited check result and the copies made on other pages.
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckResultUpdateResponse {
    pub result: CheckResultResponse,
    /// Results on html pages that received an "all pages" edit
    pub propagated: Vec<CheckResultResponse>,
}

#[utoipa::path(
    put,
    path = "/pages/{page_id}",
    tag = "Pages",
    params(
        ("page_id" = Uuid, Path, description = "Page UUID")
    ),
    request_body = UpdatePageRequest,
    responses(
        (status = 200, description = "Page updated", body = PageResponse),
        (status = 400, description = "Invalid URL", body = crate::error::ErrorResponse),
        (status = 409, description = "Page changed since it was loaded", body = crate::error::ErrorResponse),
    )
)]
pub async fn update_page(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePageRequest>,
) -> AppResult<HttpResponse> {
    let page = services::check_results::update_page(&pool, path.into_inner(), &body).await?;
    Ok(HttpResponse::Ok().json(PageResponse::from_model(page)?))
}

/// Remove a page. Its check results stop counting but are kept.
#[utoipa::path(
    delete,
    path = "/pages/{page_id}",
    tag = "Pages",
    params(
        ("page_id" = Uuid, Path, description = "Page UUID"),
        VersionParam
    ),
    responses(
        (status = 200, description = "Page removed", body = PageResponse),
        (status = 409, description = "Page changed since it was loaded", body = crate::error::ErrorResponse),
    )
)]
pub async fn remove_page(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    query: web::Query<VersionParam>,
) -> AppResult<HttpResponse> {
    let page = services::check_results::remove_page(&pool, path.into_inner(), query.version).await?;
    Ok(HttpResponse::Ok().json(PageResponse::from_model(page)?))
}

#[utoipa::path(
    post,
    path = "/pages/{page_id}/restore",
    tag = "Pages",
    params(
        ("page_id" = Uuid, Path, description = "Page UUID"),
        VersionParam
    ),
    responses(
        (status = 200, description = "Page restored", body = PageResponse),
        (status = 422, description = "Page is not removed", body = crate::error::ErrorResponse),
    )
)]
pub async fn restore_page(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    query: web::Query<VersionParam>,
) -> AppResult<HttpResponse> {
    let page =
        services::check_results::restore_page(&pool, path.into_inner(), query.version).await?;
    Ok(HttpResponse::Ok().json(PageResponse::from_model(page)?))
}

/// Questions for the page-checks form, with failures seen on other pages.
#[utoipa::path(
    get,
    path = "/pages/{page_id}/checks",
    tag = "Check results",
    params(
        ("page_id" = Uuid, Path, description = "Page UUID")
    ),
    responses(
        (status = 200, description = "Page-checks form", body = PageChecksForm),
        (status = 404, description = "Page not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_page_checks(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let form = services::check_results::page_checks_form(&pool, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(form))
}

/// Save the page-checks form.
#[utoipa::path(
    post,
    path = "/pages/{page_id}/checks",
    tag = "Check results",
    params(
        ("page_id" = Uuid, Path, description = "Page UUID")
    ),
    request_body = PageChecksSubmission,
    responses(
        (status = 200, description = "Saved; includes the next wizard form", body = PageChecksOutcome),
        (status = 409, description = "Page or a check result changed since it was loaded", body = crate::error::ErrorResponse),
    )
)]
pub async fn submit_page_checks(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<PageChecksSubmission>,
) -> AppResult<HttpResponse> {
    let outcome = services::wizard::submit_page_checks(&pool, path.into_inner(), &body).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

/// Edit one check result.
#[utoipa::path(
    put,
    path = "/check-results/{check_result_id}",
    tag = "Check results",
    params(
        ("check_result_id" = Uuid, Path, description = "Check result UUID")
    ),
    request_body = UpdateCheckResultRequest,
    responses(
        (status = 200, description = "Check result updated", body = CheckResultUpdateResponse),
        (status = 400, description = "Nothing to change", body = crate::error::ErrorResponse),
        (status = 409, description = "Check result changed since it was loaded", body = crate::error::ErrorResponse),
    )
)]
pub async fn update_check_result(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCheckResultRequest>,
) -> AppResult<HttpResponse> {
    let update = services::check_results::update_check_result(
        &pool,
        path.into_inner(),
        body.version,
        &body.changes,
    )
    .await?;

    Ok(HttpResponse::Ok().json(CheckResultUpdateResponse {
        result: CheckResultResponse::from_model(update.result)?,
        propagated: update
            .propagated
            .into_iter()
            .map(CheckResultResponse::from_model)
            .collect::<AppResult<_>>()?,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/pages/{page_id}")
            .route(web::put().to(update_page))
            .route(web::delete().to(remove_page)),
    )
    .service(web::resource("/pages/{page_id}/restore").route(web::post().to(restore_page)))
    .service(
        web::resource("/pages/{page_id}/checks")
            .route(web::get().to(get_page_checks))
            .route(web::post().to(submit_page_checks)),
    )
    .service(
        web::resource("/check-results/{check_result_id}")
            .route(web::put().to(update_check_result)),
    );
}
