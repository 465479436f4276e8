use async_trait::async_trait;
use once_cell::sync::Lazy;
use schemars::{schema_for, JsonSchema};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    constants::{prompts, CatalogKind},
    errors::{AppError, AppResult},
    models::domain::{CorrectAnswer, Difficulty, Question},
    services::ai_client::{strip_code_fences, AiClient},
};

/// Produces multiple-choice questions from free text or a catalog subject.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate_from_text(
        &self,
        text: &str,
        topic: Option<&str>,
        count: usize,
    ) -> AppResult<Vec<Question>>;

    async fn generate_for_category(&self, kind: CatalogKind, count: usize)
        -> AppResult<Vec<Question>>;
}

/// One question as the model is asked to emit it.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct GeneratedQuestion {
    #[serde(alias = "text")]
    question: String,
    options: Vec<String>,
    /// 0-based index of the correct option.
    correct_answer: CorrectAnswer,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    difficulty: Option<Difficulty>,
}

static QUESTION_SCHEMA: Lazy<String> = Lazy::new(|| {
    serde_json::to_string_pretty(&schema_for!(GeneratedQuestion)).unwrap_or_default()
});

impl From<GeneratedQuestion> for Question {
    fn from(generated: GeneratedQuestion) -> Self {
        Question {
            text: generated.question.trim().to_string(),
            options: generated
                .options
                .into_iter()
                .map(|o| o.trim().to_string())
                .collect(),
            correct_answer: match generated.correct_answer {
                CorrectAnswer::Text(text) => CorrectAnswer::Text(text.trim().to_string()),
                index => index,
            },
            explanation: generated.explanation.filter(|e| !e.trim().is_empty()),
            difficulty: generated.difficulty,
        }
        .canonicalize()
    }
}

/// Parses a model reply into valid questions. Entries that do not describe a
/// well-formed question are dropped rather than failing the batch.
pub fn parse_generated_questions(raw: &str, limit: usize) -> AppResult<Vec<Question>> {
    let cleaned = strip_code_fences(raw);
    let value: Value = serde_json::from_str(&cleaned)?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("questions") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(AppError::UpstreamFailure(
                    "Model output is not a question list".to_string(),
                ))
            }
        },
        _ => {
            return Err(AppError::UpstreamFailure(
                "Model output is not a question list".to_string(),
            ))
        }
    };

    let total = items.len();
    let questions: Vec<Question> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<GeneratedQuestion>(item).ok())
        .map(Question::from)
        .enumerate()
        .filter(|(i, q)| q.validate(*i).is_ok())
        .map(|(_, q)| q)
        .take(limit)
        .collect();

    if questions.len() < total.min(limit) {
        log::warn!(
            "Dropped {} malformed generated questions",
            total.min(limit) - questions.len()
        );
    }

    Ok(questions)
}

pub struct AiQuestionGenerator {
    client: AiClient,
}

impl AiQuestionGenerator {
    pub fn new(client: AiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QuestionGenerator for AiQuestionGenerator {
    async fn generate_from_text(
        &self,
        text: &str,
        topic: Option<&str>,
        count: usize,
    ) -> AppResult<Vec<Question>> {
        let prompt = prompts::from_text_prompt(text, topic, count, &QUESTION_SCHEMA);
        let reply = self
            .client
            .complete(prompts::QUESTION_WRITER_ROLE, &prompt)
            .await?;

        parse_generated_questions(&reply, count)
    }

    async fn generate_for_category(
        &self,
        kind: CatalogKind,
        count: usize,
    ) -> AppResult<Vec<Question>> {
        let prompt = prompts::category_prompt(kind.entry().subject, count, &QUESTION_SCHEMA);
        let reply = self
            .client
            .complete(prompts::QUESTION_WRITER_ROLE, &prompt)
            .await?;

        parse_generated_questions(&reply, count)
    }
}
