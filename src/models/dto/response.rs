use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{
    DescriptiveAttempt, PdfDocument, PublicQuestion, ResultRecord, TestDefinition, TestSource,
    User,
};

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserDto,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct TestSummaryDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration_minutes: u32,
    pub total_marks: u32,
    pub passing_marks: u32,
    pub question_count: u32,
    pub source: TestSource,
    pub created_at: DateTime<Utc>,
}

impl From<&TestDefinition> for TestSummaryDto {
    fn from(test: &TestDefinition) -> Self {
        TestSummaryDto {
            id: test.id.clone(),
            title: test.title.clone(),
            description: test.description.clone(),
            duration_minutes: test.duration_minutes,
            total_marks: test.total_marks,
            passing_marks: test.passing_marks,
            question_count: test.questions.len() as u32,
            source: test.source,
            created_at: test.created_at,
        }
    }
}

/// A test as handed to someone about to take it.
#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct TestForAttempt {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration_minutes: u32,
    pub total_marks: u32,
    pub passing_marks: u32,
    pub questions: Vec<PublicQuestion>,
}

impl From<&TestDefinition> for TestForAttempt {
    fn from(test: &TestDefinition) -> Self {
        TestForAttempt {
            id: test.id.clone(),
            title: test.title.clone(),
            description: test.description.clone(),
            duration_minutes: test.duration_minutes,
            total_marks: test.total_marks,
            passing_marks: test.passing_marks,
            questions: test.questions.iter().map(PublicQuestion::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct StartedAttempt {
    pub test: TestForAttempt,
    pub attempt_id: String,
}

#[derive(Debug, Serialize)]
pub struct TestEnvelope {
    pub message: String,
    pub test: TestDefinition,
}

#[derive(Debug, Serialize)]
pub struct TestListResponse {
    pub message: String,
    pub tests: Vec<TestSummaryDto>,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct GeneratedTestResponse {
    pub success: bool,
    pub test_id: String,
    pub title: String,
    pub question_count: usize,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub attempt: ResultRecord,
}

/// Result summary for listings and the GraphQL surface.
#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct ResultSummaryDto {
    pub id: String,
    pub test_id: String,
    pub test_title: String,
    pub score: f64,
    pub percentage: f64,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub wrong_answers: u32,
    pub passed: bool,
    pub time_taken_seconds: i64,
    pub created_at: DateTime<Utc>,
}

impl From<&ResultRecord> for ResultSummaryDto {
    fn from(record: &ResultRecord) -> Self {
        ResultSummaryDto {
            id: record.id.clone(),
            test_id: record.test_id.clone(),
            test_title: record.test_title.clone(),
            score: record.score,
            percentage: record.percentage,
            total_questions: record.total_questions,
            correct_answers: record.correct_answers,
            wrong_answers: record.wrong_answers,
            passed: record.passed,
            time_taken_seconds: record.time_taken_seconds,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResultListResponse {
    pub results: Vec<ResultSummaryDto>,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct PdfSummaryDto {
    pub id: String,
    pub title: String,
    pub file_size: u64,
    pub page_count: u32,
    pub mcq_count: u32,
    pub created_at: DateTime<Utc>,
}

impl From<&PdfDocument> for PdfSummaryDto {
    fn from(pdf: &PdfDocument) -> Self {
        PdfSummaryDto {
            id: pdf.id.clone(),
            title: pdf.title.clone(),
            file_size: pdf.file_size,
            page_count: pdf.page_count,
            mcq_count: pdf.mcqs.len() as u32,
            created_at: pdf.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct DescriptiveAttemptDto {
    pub id: String,
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

impl From<DescriptiveAttempt> for DescriptiveAttemptDto {
    fn from(attempt: DescriptiveAttempt) -> Self {
        DescriptiveAttemptDto {
            id: attempt.id,
            exam_name: attempt.exam_name,
            question: attempt.question,
            answer: attempt.answer,
            word_count: attempt.word_count,
            time_limit_minutes: attempt.time_limit_minutes,
            time_taken_seconds: attempt.time_taken_seconds,
            score: attempt.score,
            feedback: attempt.feedback,
            strengths: attempt.strengths,
            areas_to_improve: attempt.areas_to_improve,
            suggestions: attempt.suggestions,
            created_at: attempt.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ImprovedAnswerResponse {
    pub improved_answer: String,
}

#[derive(Debug, Serialize, SimpleObject)]
pub struct MessageResponse {
    pub message: String,
}
