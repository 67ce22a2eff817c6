//! Retest API handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{
    RetestCheckResultResponse, RetestDecisionRequest, RetestDetailResponse, RetestPageResponse,
    RetestResponse, RetestStatementCheckResultResponse, UpdateRetestCheckResultRequest,
    UpdateRetestPageRequest, UpdateRetestStatementCheckResultRequest, VersionParam,
};
use crate::services;

/// A retest with its pages and copied issues, deleted or not.
#[utoipa::path(
    get,
    path = "/retests/{retest_id}",
    tag = "Retests",
    params(
        ("retest_id" = Uuid, Path, description = "Retest UUID")
    ),
    responses(
        (status = 200, description = "Retest detail", body = RetestDetailResponse),
        (status = 404, description = "Retest not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_retest(pool: web::Data<DbPool>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let snapshot = services::retests::get_retest_detail(&pool, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(snapshot.into_response()?))
}

#[utoipa::path(
    delete,
    path = "/retests/{retest_id}",
    tag = "Retests",
    params(
        ("retest_id" = Uuid, Path, description = "Retest UUID"),
        VersionParam
    ),
    responses(
        (status = 204, description = "Retest deleted"),
        (status = 409, description = "Retest changed since it was loaded", body = crate::error::ErrorResponse),
    )
)]
pub async fn delete_retest(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    query: web::Query<VersionParam>,
) -> AppResult<HttpResponse> {
    services::retests::delete_retest(&pool, path.into_inner(), query.version).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    post,
    path = "/retests/{retest_id}/restore",
    tag = "Retests",
    params(
        ("retest_id" = Uuid, Path, description = "Retest UUID"),
        VersionParam
    ),
    responses(
        (status = 200, description = "Retest restored", body = RetestResponse),
        (status = 422, description = "Retest not deleted, or another retest is open", body = crate::error::ErrorResponse),
    )
)]
pub async fn restore_retest(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    query: web::Query<VersionParam>,
) -> AppResult<HttpResponse> {
    let retest = services::retests::restore_retest(&pool, path.into_inner(), query.version).await?;
    Ok(HttpResponse::Ok().json(RetestResponse::from_model(retest)?))
}

#[utoipa::path(
    put,
    path = "/retests/{retest_id}/decision",
    tag = "Retests",
    params(
        ("retest_id" = Uuid, Path, description = "Retest UUID")
    ),
    request_body = RetestDecisionRequest,
    responses(
        (status = 200, description = "Decision saved", body = RetestResponse),
        (status = 409, description = "Retest changed since it was loaded", body = crate::error::ErrorResponse),
    )
)]
pub async fn update_decision(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<RetestDecisionRequest>,
) -> AppResult<HttpResponse> {
    let retest =
        services::retests::update_retest_decision(&pool, path.into_inner(), &body).await?;
    Ok(HttpResponse::Ok().json(RetestResponse::from_model(retest)?))
}

#[utoipa::path(
    put,
    path = "/retest-pages/{retest_page_id}",
    tag = "Retests",
    params(
        ("retest_page_id" = Uuid, Path, description = "Retest page UUID")
    ),
    request_body = UpdateRetestPageRequest,
    responses(
        (status = 200, description = "Retest page saved", body = RetestPageResponse),
        (status = 409, description = "Retest page changed since it was loaded", body = crate::error::ErrorResponse),
    )
)]
pub async fn update_page(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateRetestPageRequest>,
) -> AppResult<HttpResponse> {
    let page = services::retests::update_retest_page(&pool, path.into_inner(), &body).await?;
    Ok(HttpResponse::Ok().json(RetestPageResponse::from_model(page)?))
}

#[utoipa::path(
    put,
    path = "/retest-check-results/{retest_check_result_id}",
    tag = "Retests",
    params(
        ("retest_check_result_id" = Uuid, Path, description = "Retest check result UUID")
    ),
    request_body = UpdateRetestCheckResultRequest,
    responses(
        (status = 200, description = "Outcome saved", body = RetestCheckResultResponse),
        (status = 409, description = "Result changed since it was loaded", body = crate::error::ErrorResponse),
    )
)]
pub async fn update_check_result(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateRetestCheckResultRequest>,
) -> AppResult<HttpResponse> {
    let result =
        services::retests::update_retest_check_result(&pool, path.into_inner(), &body).await?;
    Ok(HttpResponse::Ok().json(RetestCheckResultResponse::from_model(result)?))
}

#[utoipa::path(
    put,
    path = "/retest-statement-check-results/{retest_statement_check_result_id}",
    tag = "Retests",
    params(
        ("retest_statement_check_result_id" = Uuid, Path, description = "Retest statement check result UUID")
    ),
    request_body = UpdateRetestStatementCheckResultRequest,
    responses(
        (status = 200, description = "Outcome saved", body = RetestStatementCheckResultResponse),
        (status = 409, description = "Result changed since it was loaded", body = crate::error::ErrorResponse),
    )
)]
pub async fn update_statement_check_result(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateRetestStatementCheckResultRequest>,
) -> AppResult<HttpResponse> {
    let result = services::retests::update_retest_statement_check_result(
        &pool,
        path.into_inner(),
        &body,
    )
    .await?;
    Ok(HttpResponse::Ok().json(RetestStatementCheckResultResponse::from_model(result)?))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/retests/{retest_id}")
            .route(web::get().to(get_retest))
            .route(web::delete().to(delete_retest)),
    )
    .service(web::resource("/retests/{retest_id}/restore").route(web::post().to(restore_retest)))
    .service(web::resource("/retests/{retest_id}/decision").route(web::put().to(update_decision)))
    .service(
        web::resource("/retest-pages/{retest_page_id}").route(web::put().to(update_page)),
    )
    .service(
        web::resource("/retest-check-results/{retest_check_result_id}")
            .route(web::put().to(update_check_result)),
    )
    .service(
        web::resource("/retest-statement-check-results/{retest_statement_check_result_id}")
            .route(web::put().to(update_statement_check_result)),
    );
}
