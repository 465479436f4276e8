use async_graphql::Enum;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{AppError, AppResult},
    models::domain::question::Question,
};

pub const DEFAULT_DURATION_MINUTES: u32 = 30;
pub const DEFAULT_TOTAL_MARKS: u32 = 100;
pub const DEFAULT_PASSING_MARKS: u32 = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, Enum)]
#[serde(rename_all = "lowercase")]
pub enum TestSource {
    Manual,
    Generated,
    Catalog,
    Pdf,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TestDefinition {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub duration_minutes: u32,
    pub total_marks: u32,
    pub passing_marks: u32,
    pub questions: Vec<Question>,
    pub source: TestSource,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TestDefinition {
    pub fn new(owner_id: &str, title: &str, description: &str, questions: Vec<Question>) -> Self {
        let now = Utc::now();
        TestDefinition {
            id: Uuid::now_v7().to_string(),
            owner_id: owner_id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            duration_minutes: DEFAULT_DURATION_MINUTES,
            total_marks: DEFAULT_TOTAL_MARKS,
            passing_marks: DEFAULT_PASSING_MARKS,
            questions: questions.into_iter().map(Question::canonicalize).collect(),
            source: TestSource::Manual,
            created_at: now,
            updated_at: now,
        }
    }

    /// Tests assembled by the server from generated, catalog or PDF questions
    /// are marked out of the question count with a 60% pass mark.
    pub fn assembled(
        owner_id: &str,
        title: &str,
        description: &str,
        questions: Vec<Question>,
        source: TestSource,
    ) -> Self {
        let count = questions.len() as u32;
        let mut test = TestDefinition::new(owner_id, title, description, questions);
        test.total_marks = count;
        test.passing_marks = (count * 3).div_ceil(5);
        test.source = source;
        test
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::ValidationError("Title is required".to_string()));
        }

        if self.duration_minutes == 0 {
            return Err(AppError::ValidationError(
                "Duration must be at least one minute".to_string(),
            ));
        }

        if self.total_marks == 0 || self.passing_marks > self.total_marks {
            return Err(AppError::ValidationError(
                "Passing marks must be between 0 and total marks".to_string(),
            ));
        }

        validate_questions(&self.questions)
    }
}

pub fn validate_questions(questions: &[Question]) -> AppResult<()> {
    if questions.is_empty() {
        return Err(AppError::ValidationError(
            "A test needs at least one question".to_string(),
        ));
    }

    questions
        .iter()
        .enumerate()
        .try_for_each(|(i, q)| q.validate(i))
}
