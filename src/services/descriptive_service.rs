use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    constants::prompts,
    errors::{AppError, AppResult},
    models::{
        domain::{DescriptiveAttempt, Evaluation},
        dto::request::EvaluateAnswerRequest,
    },
    repositories::DescriptiveRepository,
    services::ai_client::{strip_code_fences, AiClient},
};

#[async_trait]
pub trait AnswerEvaluator: Send + Sync {
    async fn evaluate(&self, exam_name: &str, question: &str, answer: &str)
        -> AppResult<Evaluation>;
    async fn improve(&self, exam_name: &str, question: &str, answer: &str) -> AppResult<String>;
}

/// Model replies sometimes carry fractional or out-of-range scores.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvaluation {
    score: f64,
    #[serde(default)]
    feedback: String,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    areas_to_improve: Vec<String>,
    #[serde(default)]
    suggestions: Vec<String>,
}

pub fn parse_evaluation(raw: &str) -> AppResult<Evaluation> {
    let parsed: RawEvaluation = serde_json::from_str(&strip_code_fences(raw))?;

    if !parsed.score.is_finite() {
        return Err(AppError::UpstreamFailure(
            "Evaluation score is not a number".to_string(),
        ));
    }

    Ok(Evaluation {
        score: parsed.score.round().clamp(0.0, 100.0) as u32,
        feedback: parsed.feedback,
        strengths: parsed.strengths,
        areas_to_improve: parsed.areas_to_improve,
        suggestions: parsed.suggestions,
    })
}

pub struct AiAnswerEvaluator {
    client: AiClient,
}

impl AiAnswerEvaluator {
    pub fn new(client: AiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AnswerEvaluator for AiAnswerEvaluator {
    async fn evaluate(
        &self,
        exam_name: &str,
        question: &str,
        answer: &str,
    ) -> AppResult<Evaluation> {
        let prompt = prompts::evaluate_prompt(exam_name, question, answer);
        let reply = self.client.complete(prompts::EVALUATOR_ROLE, &prompt).await?;
        parse_evaluation(&reply)
    }

    async fn improve(&self, exam_name: &str, question: &str, answer: &str) -> AppResult<String> {
        let prompt = prompts::improve_prompt(exam_name, question, answer);
        let reply = self.client.complete(prompts::EVALUATOR_ROLE, &prompt).await?;
        Ok(strip_code_fences(&reply))
    }
}

pub struct DescriptiveService {
    repository: Arc<dyn DescriptiveRepository>,
    evaluator: Arc<dyn AnswerEvaluator>,
}

impl DescriptiveService {
    pub fn new(
        repository: Arc<dyn DescriptiveRepository>,
        evaluator: Arc<dyn AnswerEvaluator>,
    ) -> Self {
        Self {
            repository,
            evaluator,
        }
    }

    pub async fn evaluate_and_record(
        &self,
        user_id: &str,
        request: EvaluateAnswerRequest,
    ) -> AppResult<DescriptiveAttempt> {
        let evaluation = self
            .evaluator
            .evaluate(&request.exam_name, &request.question, &request.answer)
            .await
            .map_err(|e| {
                log::error!("Descriptive evaluation failed: {}", e);
                AppError::UpstreamFailure(format!("Failed to evaluate answer: {}", e))
            })?;

        let attempt = DescriptiveAttempt::record(
            user_id,
            &request.exam_name,
            &request.question,
            &request.answer,
            request.time_limit_minutes,
            request.time_taken_seconds,
            evaluation,
        );
        let attempt = self.repository.create(attempt).await?;

        log::info!(
            "Recorded descriptive attempt {} for user {} (score {})",
            attempt.id,
            user_id,
            attempt.score
        );
        Ok(attempt)
    }

    pub async fn improve(&self, exam_name: &str, question: &str, answer: &str) -> AppResult<String> {
        self.evaluator
            .improve(exam_name, question, answer)
            .await
            .map_err(|e| AppError::UpstreamFailure(format!("Failed to improve answer: {}", e)))
    }

    pub async fn history(&self, user_id: &str) -> AppResult<Vec<DescriptiveAttempt>> {
        self.repository.list_by_user(user_id).await
    }

    pub async fn delete(&self, id: &str, user_id: &str) -> AppResult<()> {
        if !self.repository.delete_for_user(id, user_id).await? {
            return Err(AppError::NotFound(format!(
                "Descriptive attempt with id '{}' not found",
                id
            )));
        }
        Ok(())
    }
}
