use std::sync::Arc;

use actix_web::{delete, get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{
        request::PdfUploadQuery,
        response::{MessageResponse, PdfSummaryDto},
    },
    services::pdf_service::DEFAULT_MCQ_COUNT,
};

/// Takes the raw PDF as the request body.
#[post("/pdfs")]
async fn upload_pdf(
    state: web::Data<Arc<AppState>>,
    query: web::Query<PdfUploadQuery>,
    body: web::Bytes,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    query.validate()?;

    let count = query
        .num_questions
        .map(|n| n as usize)
        .unwrap_or(DEFAULT_MCQ_COUNT);

    let pdf = state
        .pdf_service
        .ingest(
            auth.id(),
            query.title.trim(),
            body.to_vec(),
            query.topic.as_deref(),
            count,
        )
        .await?;

    Ok(HttpResponse::Created().json(PdfSummaryDto::from(&pdf)))
}

#[get("/pdfs")]
async fn list_pdfs(
    state: web::Data<Arc<AppState>>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let pdfs = state.pdf_service.list(auth.id()).await?;
    let pdfs: Vec<PdfSummaryDto> = pdfs.iter().map(PdfSummaryDto::from).collect();
    Ok(HttpResponse::Ok().json(pdfs))
}

#[delete("/pdfs/{id}")]
async fn delete_pdf(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    state.pdf_service.delete(&id, auth.id()).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "PDF deleted successfully".to_string(),
    }))
}
