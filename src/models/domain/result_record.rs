use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::question::{Question, SubmittedAnswer};

/// How a submission is turned into a score and a verdict.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct ScoringPolicy {
    /// Subtract half a mark for every wrong or unanswered question.
    pub negative_marking: bool,
    pub pass_threshold_percent: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        ScoringPolicy {
            negative_marking: false,
            pass_threshold_percent: 50.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuestionOutcome {
    pub index: u32,
    pub submitted: Option<SubmittedAnswer>,
    pub correct: bool,
}

/// Persisted outcome of one scored submission. Never updated once stored.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ResultRecord {
    pub id: String,
    pub user_id: String,
    pub test_id: String,
    pub test_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempt_id: Option<String>,
    pub idempotency_key: String,
    pub answers: Vec<Option<SubmittedAnswer>>,
    pub questions: Vec<Question>,
    pub per_question: Vec<QuestionOutcome>,
    pub score: f64,
    pub percentage: f64,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub wrong_answers: u32,
    pub passed: bool,
    pub policy: ScoringPolicy,
    pub time_taken_seconds: i64,
    pub created_at: DateTime<Utc>,
}
