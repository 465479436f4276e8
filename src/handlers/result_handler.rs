use std::sync::Arc;

use actix_web::{get, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{
        request::PageQuery,
        response::{ResultListResponse, ResultSummaryDto},
    },
};

#[get("/tests/attempts")]
async fn list_results(
    state: web::Data<Arc<AppState>>,
    query: web::Query<PageQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let (offset, limit) = query.clamped();
    let (results, total) = state
        .result_service
        .list_results_page(auth.id(), offset, limit)
        .await?;

    Ok(HttpResponse::Ok().json(ResultListResponse {
        results: results.iter().map(ResultSummaryDto::from).collect(),
        total,
    }))
}

#[get("/tests/attempts/{id}")]
async fn get_result(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let record = state.result_service.get_result(&id, auth.id()).await?;
    Ok(HttpResponse::Ok().json(record))
}
