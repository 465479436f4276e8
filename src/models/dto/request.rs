use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidationError};

use crate::{
    constants::CatalogKind,
    models::domain::{Question, SubmittedAnswer},
};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTestRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(range(min = 1, max = 600))]
    pub duration_minutes: Option<u32>,

    #[validate(range(min = 1))]
    pub total_marks: Option<u32>,

    pub passing_marks: Option<u32>,

    #[validate(length(min = 1, message = "A test needs at least one question"))]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQuestionsRequest {
    #[validate(length(min = 1, message = "A test needs at least one question"))]
    pub questions: Vec<Question>,
}

/// Either a catalog subject or a set of uploaded PDFs to build a test from.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_generate_source"))]
pub struct GenerateTestRequest {
    #[serde(default, alias = "type")]
    pub kind: Option<CatalogKind>,

    #[serde(default)]
    pub pdf_ids: Option<Vec<String>>,

    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
}

fn validate_generate_source(request: &GenerateTestRequest) -> Result<(), ValidationError> {
    let has_pdfs = request.pdf_ids.as_ref().is_some_and(|ids| !ids.is_empty());
    match (request.kind.is_some(), has_pdfs) {
        (true, false) | (false, true) => Ok(()),
        _ => Err(ValidationError::new("generate_source")
            .with_message("Provide either a test type or a non-empty list of PDF ids".into())),
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SubmitTestRequest {
    #[serde(default, deserialize_with = "lenient_answers")]
    pub answers: Vec<Option<SubmittedAnswer>>,

    /// Id returned by the start endpoint; ties the submission to its snapshot.
    #[serde(default)]
    pub attempt_id: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, max = 128))]
    pub submission_key: Option<String>,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub time_taken_seconds: Option<i64>,
}

/// Malformed entries become `None` so they are scored as wrong rather than
/// rejecting the whole submission.
fn lenient_answers<'de, D>(deserializer: D) -> Result<Vec<Option<SubmittedAnswer>>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values.iter().map(SubmittedAnswer::from_json).collect())
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PdfUploadQuery {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 200))]
    pub topic: Option<String>,

    #[validate(range(min = 1, max = 20))]
    pub num_questions: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EvaluateAnswerRequest {
    #[validate(length(min = 1, max = 100))]
    pub exam_name: String,

    #[validate(length(min = 1, max = 2000))]
    pub question: String,

    #[validate(length(min = 1, max = 20000))]
    pub answer: String,

    #[serde(default)]
    pub time_limit_minutes: u32,

    #[serde(default)]
    pub time_taken_seconds: u32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ImproveAnswerRequest {
    #[validate(length(min = 1, max = 100))]
    pub exam_name: String,

    #[validate(length(min = 1, max = 2000))]
    pub question: String,

    #[validate(length(min = 1, max = 20000))]
    pub answer: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl PageQuery {
    pub fn clamped(&self) -> (i64, i64) {
        (
            self.offset.unwrap_or(0).max(0),
            self.limit.unwrap_or(20).clamp(1, 100),
        )
    }
}
