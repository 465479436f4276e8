use std::sync::Arc;

use actix_web::{delete, get, post, put, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{
        request::{
            CreateTestRequest, GenerateTestRequest, PageQuery, SubmitTestRequest,
            UpdateQuestionsRequest,
        },
        response::{
            GeneratedTestResponse, MessageResponse, SubmitResponse, TestEnvelope,
            TestListResponse, TestSummaryDto,
        },
    },
};

#[post("/tests")]
async fn create_test(
    state: web::Data<Arc<AppState>>,
    request: web::Json<CreateTestRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let test = state
        .test_service
        .create_test(auth.id(), request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(TestEnvelope {
        message: "Test created successfully".to_string(),
        test,
    }))
}

#[get("/tests")]
async fn list_tests(
    state: web::Data<Arc<AppState>>,
    query: web::Query<PageQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let (offset, limit) = query.clamped();
    let (tests, total) = state
        .test_service
        .list_tests_page(auth.id(), offset, limit)
        .await?;

    Ok(HttpResponse::Ok().json(TestListResponse {
        message: "Tests fetched successfully".to_string(),
        tests: tests.iter().map(TestSummaryDto::from).collect(),
        total,
    }))
}

#[post("/tests/generate")]
async fn generate_test(
    state: web::Data<Arc<AppState>>,
    request: web::Json<GenerateTestRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let test = state
        .test_service
        .create_generated(auth.id(), request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(GeneratedTestResponse {
        success: true,
        test_id: test.id,
        title: test.title,
        question_count: test.questions.len(),
    }))
}

#[get("/tests/{id}")]
async fn get_test(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let test = state.test_service.get_test(&id, auth.id()).await?;
    Ok(HttpResponse::Ok().json(test))
}

#[put("/tests/{id}/questions")]
async fn update_questions(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    request: web::Json<UpdateQuestionsRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let test = state
        .test_service
        .update_questions(&id, auth.id(), request.questions)
        .await?;

    Ok(HttpResponse::Ok().json(TestEnvelope {
        message: "Questions updated successfully".to_string(),
        test,
    }))
}

#[get("/tests/{id}/start")]
async fn start_test(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let started = state
        .test_service
        .get_test_for_attempt(&id, auth.id())
        .await?;
    Ok(HttpResponse::Ok().json(started))
}

#[post("/tests/{id}/submit")]
async fn submit_test(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    request: web::Json<SubmitTestRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let attempt = state
        .result_service
        .submit(auth.id(), &id, request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(SubmitResponse {
        success: true,
        attempt,
    }))
}

#[delete("/tests/{id}/delete")]
async fn delete_test(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    state.test_service.delete_test(&id, auth.id()).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Test deleted successfully".to_string(),
    }))
}
