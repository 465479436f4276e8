use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Assessment of one free-text answer.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub score: u32,
    pub feedback: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub areas_to_improve: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct DescriptiveAttempt {
    pub id: String,
    pub user_id: String,
    pub exam_name: String,
    pub question: String,
    pub answer: String,
    pub word_count: u32,
    pub time_limit_minutes: u32,
    pub time_taken_seconds: u32,
    pub score: u32,
    pub feedback: String,
    pub strengths: Vec<String>,
    pub areas_to_improve: Vec<String>,
    pub suggestions: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl DescriptiveAttempt {
    pub fn record(
        user_id: &str,
        exam_name: &str,
        question: &str,
        answer: &str,
        time_limit_minutes: u32,
        time_taken_seconds: u32,
        evaluation: Evaluation,
    ) -> Self {
        DescriptiveAttempt {
            id: Uuid::now_v7().to_string(),
            user_id: user_id.to_string(),
            exam_name: exam_name.to_string(),
            question: question.to_string(),
            answer: answer.to_string(),
            word_count: word_count(answer),
            time_limit_minutes,
            time_taken_seconds,
            score: evaluation.score.min(100),
            feedback: evaluation.feedback,
            strengths: evaluation.strengths,
            areas_to_improve: evaluation.areas_to_improve,
            suggestions: evaluation.suggestions,
            created_at: Utc::now(),
        }
    }
}

pub fn word_count(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}
