//! Reference data API handlers.

use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{
    NewStatementCheck, NewWcagDefinition, StatementCheckResponse, UpdateStatementCheckRequest,
    UpdateWcagDefinitionRequest, WcagDefinitionResponse,
};
use crate::services;

/// Filter reference data to what was in force on a date.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ValidOnQuery {
    /// Only entries whose validity window contains this date (YYYY-MM-DD)
    pub on_date: Option<NaiveDate>,
}

#[utoipa::path(
    get,
    path = "/wcag-definitions",
    tag = "Reference data",
    params(ValidOnQuery),
    responses(
        (status = 200, description = "WCAG definitions", body = Vec<WcagDefinitionResponse>),
    )
)]
pub async fn list_wcag_definitions(
    pool: web::Data<DbPool>,
    query: web::Query<ValidOnQuery>,
) -> AppResult<HttpResponse> {
    let definitions = services::reference::list_wcag_definitions(&pool, query.on_date)
        .await?
        .into_iter()
        .map(WcagDefinitionResponse::from_model)
        .collect::<AppResult<Vec<_>>>()?;
    Ok(HttpResponse::Ok().json(definitions))
}

#[utoipa::path(
    post,
    path = "/wcag-definitions",
    tag = "Reference data",
    request_body = NewWcagDefinition,
    responses(
        (status = 201, description = "Definition added", body = WcagDefinitionResponse),
        (status = 400, description = "Invalid definition", body = crate::error::ErrorResponse),
    )
)]
pub async fn add_wcag_definition(
    pool: web::Data<DbPool>,
    body: web::Json<NewWcagDefinition>,
) -> AppResult<HttpResponse> {
    let definition = services::reference::add_wcag_definition(&pool, &body).await?;
    Ok(HttpResponse::Created().json(WcagDefinitionResponse::from_model(definition)?))
}

#[utoipa::path(
    put,
    path = "/wcag-definitions/{definition_id}",
    tag = "Reference data",
    params(
        ("definition_id" = Uuid, Path, description = "WCAG definition UUID")
    ),
    request_body = UpdateWcagDefinitionRequest,
    responses(
        (status = 200, description = "Definition updated", body = WcagDefinitionResponse),
        (status = 400, description = "Invalid definition", body = crate::error::ErrorResponse),
        (status = 404, description = "Definition not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn update_wcag_definition(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateWcagDefinitionRequest>,
) -> AppResult<HttpResponse> {
    let definition =
        services::reference::update_wcag_definition(&pool, path.into_inner(), &body).await?;
    Ok(HttpResponse::Ok().json(WcagDefinitionResponse::from_model(definition)?))
}

#[utoipa::path(
    get,
    path = "/statement-checks",
    tag = "Reference data",
    params(ValidOnQuery),
    responses(
        (status = 200, description = "Statement checks in assessment order", body = Vec<StatementCheckResponse>),
    )
)]
pub async fn list_statement_checks(
    pool: web::Data<DbPool>,
    query: web::Query<ValidOnQuery>,
) -> AppResult<HttpResponse> {
    let checks = services::reference::list_statement_checks(&pool, query.on_date)
        .await?
        .into_iter()
        .map(StatementCheckResponse::from_model)
        .collect::<AppResult<Vec<_>>>()?;
    Ok(HttpResponse::Ok().json(checks))
}

#[utoipa::path(
    post,
    path = "/statement-checks",
    tag = "Reference data",
    request_body = NewStatementCheck,
    responses(
        (status = 201, description = "Statement check added", body = StatementCheckResponse),
        (status = 400, description = "Invalid statement check", body = crate::error::ErrorResponse),
    )
)]
pub async fn add_statement_check(
    pool: web::Data<DbPool>,
    body: web::Json<NewStatementCheck>,
) -> AppResult<HttpResponse> {
    let check = services::reference::add_statement_check(&pool, &body).await?;
    Ok(HttpResponse::Created().json(StatementCheckResponse::from_model(check)?))
}

#[utoipa::path(
    put,
    path = "/statement-checks/{check_id}",
    tag = "Reference data",
    params(
        ("check_id" = Uuid, Path, description = "Statement check UUID")
    ),
    request_body = UpdateStatementCheckRequest,
    responses(
        (status = 200, description = "Statement check updated", body = StatementCheckResponse),
        (status = 400, description = "Invalid statement check", body = crate::error::ErrorResponse),
        (status = 404, description = "Statement check not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn update_statement_check(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateStatementCheckRequest>,
) -> AppResult<HttpResponse> {
    let check = services::reference::update_statement_check(&pool, path.into_inner(), &body).await?;
    Ok(HttpResponse::Ok().json(StatementCheckResponse::from_model(check)?))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/wcag-definitions")
            .route(web::get().to(list_wcag_definitions))
            .route(web::post().to(add_wcag_definition)),
    )
    .service(
        web::resource("/wcag-definitions/{definition_id}")
            .route(web::put().to(update_wcag_definition)),
    )
    .service(
        web::resource("/statement-checks")
            .route(web::get().to(list_statement_checks))
            .route(web::post().to(add_statement_check)),
    )
    .service(
        web::resource("/statement-checks/{check_id}").route(web::put().to(update_statement_check)),
    );
}
