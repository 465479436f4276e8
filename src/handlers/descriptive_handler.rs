use std::sync::Arc;

use actix_web::{delete, get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{
        request::{EvaluateAnswerRequest, ImproveAnswerRequest},
        response::{DescriptiveAttemptDto, ImprovedAnswerResponse, MessageResponse},
    },
};

#[post("/descriptive/evaluate")]
async fn evaluate_answer(
    state: web::Data<Arc<AppState>>,
    request: web::Json<EvaluateAnswerRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let attempt = state
        .descriptive_service
        .evaluate_and_record(auth.id(), request)
        .await?;
    Ok(HttpResponse::Ok().json(DescriptiveAttemptDto::from(attempt)))
}

#[post("/descriptive/improve")]
async fn improve_answer(
    state: web::Data<Arc<AppState>>,
    request: web::Json<ImproveAnswerRequest>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let improved_answer = state
        .descriptive_service
        .improve(&request.exam_name, &request.question, &request.answer)
        .await?;
    Ok(HttpResponse::Ok().json(ImprovedAnswerResponse { improved_answer }))
}

#[get("/descriptive/history")]
async fn descriptive_history(
    state: web::Data<Arc<AppState>>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let attempts = state.descriptive_service.history(auth.id()).await?;
    let attempts: Vec<DescriptiveAttemptDto> =
        attempts.into_iter().map(DescriptiveAttemptDto::from).collect();
    Ok(HttpResponse::Ok().json(attempts))
}

#[delete("/descriptive/{id}")]
async fn delete_descriptive(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    state.descriptive_service.delete(&id, auth.id()).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Attempt deleted successfully".to_string(),
    }))
}
