#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use examforge_server::{
    app_state::{AppState, Collaborators, Repositories},
    config::Config,
    constants::CatalogKind,
    errors::{AppError, AppResult},
    models::domain::{
        AttemptStart, DescriptiveAttempt, Evaluation, PdfDocument, Question, ResultRecord,
        TestDefinition, User,
    },
    repositories::{
        AttemptRepository, DescriptiveRepository, PdfRepository, ResultRepository,
        TestRepository, UserRepository,
    },
    services::{
        pdf_service::ExtractedText, AnswerEvaluator, QuestionGenerator, TextExtractor,
    },
};

fn page<T: Clone>(items: &[T], offset: i64, limit: i64) -> Vec<T> {
    let start = offset.max(0) as usize;
    if start >= items.len() {
        return vec![];
    }
    let end = (start + limit.max(0) as usize).min(items.len());
    items[start..end].to_vec()
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::AlreadyExists(format!(
                "User with email '{}' already exists",
                user.email
            )));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryTestRepository {
    tests: Arc<RwLock<HashMap<String, TestDefinition>>>,
}

#[async_trait]
impl TestRepository for InMemoryTestRepository {
    async fn create(&self, test: TestDefinition) -> AppResult<TestDefinition> {
        let mut tests = self.tests.write().await;
        if tests.contains_key(&test.id) {
            return Err(AppError::AlreadyExists(format!(
                "Test with id '{}' already exists",
                test.id
            )));
        }
        tests.insert(test.id.clone(), test.clone());
        Ok(test)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<TestDefinition>> {
        let tests = self.tests.read().await;
        Ok(tests.get(id).cloned())
    }

    async fn list_by_owner(
        &self,
        owner_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<TestDefinition>, i64)> {
        let tests = self.tests.read().await;
        let mut items: Vec<_> = tests
            .values()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.id.cmp(&a.id));

        let total = items.len() as i64;
        Ok((page(&items, offset, limit), total))
    }

    async fn replace_questions(&self, id: &str, questions: Vec<Question>) -> AppResult<()> {
        let mut tests = self.tests.write().await;
        let test = tests
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Test with id '{}' not found", id)))?;
        test.questions = questions;
        test.updated_at = chrono::Utc::now();
        Ok(())
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let mut tests = self.tests.write().await;
        Ok(tests.remove(id).is_some())
    }
}

#[derive(Default)]
pub struct InMemoryAttemptRepository {
    attempts: Arc<RwLock<HashMap<String, AttemptStart>>>,
}

#[async_trait]
impl AttemptRepository for InMemoryAttemptRepository {
    async fn create(&self, attempt: AttemptStart) -> AppResult<AttemptStart> {
        let mut attempts = self.attempts.write().await;
        attempts.insert(attempt.id.clone(), attempt.clone());
        Ok(attempt)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<AttemptStart>> {
        let attempts = self.attempts.read().await;
        Ok(attempts.get(id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryResultRepository {
    results: Arc<RwLock<HashMap<String, ResultRecord>>>,
}

impl InMemoryResultRepository {
    pub async fn count(&self) -> usize {
        self.results.read().await.len()
    }
}

#[async_trait]
impl ResultRepository for InMemoryResultRepository {
    async fn create(&self, record: ResultRecord) -> AppResult<ResultRecord> {
        let mut results = self.results.write().await;
        if results
            .values()
            .any(|r| r.idempotency_key == record.idempotency_key)
        {
            return Err(AppError::AlreadyExists(
                "Result for this submission already exists".to_string(),
            ));
        }
        results.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<ResultRecord>> {
        let results = self.results.read().await;
        Ok(results.get(id).cloned())
    }

    async fn find_by_idempotency_key(&self, key: &str) -> AppResult<Option<ResultRecord>> {
        let results = self.results.read().await;
        Ok(results.values().find(|r| r.idempotency_key == key).cloned())
    }

    async fn list_by_user(
        &self,
        user_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<ResultRecord>, i64)> {
        let results = self.results.read().await;
        let mut items: Vec<_> = results
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.id.cmp(&a.id));

        let total = items.len() as i64;
        Ok((page(&items, offset, limit), total))
    }
}

#[derive(Default)]
pub struct InMemoryPdfRepository {
    pdfs: Arc<RwLock<HashMap<String, PdfDocument>>>,
}

#[async_trait]
impl PdfRepository for InMemoryPdfRepository {
    async fn create(&self, pdf: PdfDocument) -> AppResult<PdfDocument> {
        let mut pdfs = self.pdfs.write().await;
        pdfs.insert(pdf.id.clone(), pdf.clone());
        Ok(pdf)
    }

    async fn find_many_for_user(
        &self,
        user_id: &str,
        ids: &[String],
    ) -> AppResult<Vec<PdfDocument>> {
        let pdfs = self.pdfs.read().await;
        let mut items: Vec<_> = pdfs
            .values()
            .filter(|p| p.user_id == user_id && ids.contains(&p.id))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(items)
    }

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<PdfDocument>> {
        let pdfs = self.pdfs.read().await;
        let mut items: Vec<_> = pdfs
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .map(|mut p| {
                p.content = String::new();
                p
            })
            .collect();
        items.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(items)
    }

    async fn delete_for_user(&self, id: &str, user_id: &str) -> AppResult<bool> {
        let mut pdfs = self.pdfs.write().await;
        match pdfs.get(id) {
            Some(pdf) if pdf.user_id == user_id => Ok(pdfs.remove(id).is_some()),
            _ => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct InMemoryDescriptiveRepository {
    attempts: Arc<RwLock<HashMap<String, DescriptiveAttempt>>>,
}

#[async_trait]
impl DescriptiveRepository for InMemoryDescriptiveRepository {
    async fn create(&self, attempt: DescriptiveAttempt) -> AppResult<DescriptiveAttempt> {
        let mut attempts = self.attempts.write().await;
        attempts.insert(attempt.id.clone(), attempt.clone());
        Ok(attempt)
    }

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<DescriptiveAttempt>> {
        let attempts = self.attempts.read().await;
        let mut items: Vec<_> = attempts
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(items)
    }

    async fn delete_for_user(&self, id: &str, user_id: &str) -> AppResult<bool> {
        let mut attempts = self.attempts.write().await;
        match attempts.get(id) {
            Some(attempt) if attempt.user_id == user_id => Ok(attempts.remove(id).is_some()),
            _ => Ok(false),
        }
    }
}

/// Returns canned questions, or fails when built with `failing()`.
pub struct StubGenerator {
    questions: Option<Vec<Question>>,
}

impl StubGenerator {
    pub fn with_questions(questions: Vec<Question>) -> Self {
        Self {
            questions: Some(questions),
        }
    }

    pub fn failing() -> Self {
        Self { questions: None }
    }

    fn reply(&self, count: usize) -> AppResult<Vec<Question>> {
        match &self.questions {
            Some(questions) => Ok(questions.iter().take(count).cloned().collect()),
            None => Err(AppError::UpstreamFailure("model offline".to_string())),
        }
    }
}

#[async_trait]
impl QuestionGenerator for StubGenerator {
    async fn generate_from_text(
        &self,
        _text: &str,
        _topic: Option<&str>,
        count: usize,
    ) -> AppResult<Vec<Question>> {
        self.reply(count)
    }

    async fn generate_for_category(
        &self,
        _kind: CatalogKind,
        count: usize,
    ) -> AppResult<Vec<Question>> {
        self.reply(count)
    }
}

pub struct StubExtractor;

pub const EXTRACTED_TEXT: &str =
    "Photosynthesis converts light energy into chemical energy stored in glucose molecules.";

impl TextExtractor for StubExtractor {
    fn extract(&self, _bytes: &[u8]) -> AppResult<ExtractedText> {
        Ok(ExtractedText {
            text: EXTRACTED_TEXT.to_string(),
            page_count: 3,
        })
    }
}

pub struct StubEvaluator {
    pub score: u32,
}

#[async_trait]
impl AnswerEvaluator for StubEvaluator {
    async fn evaluate(&self, _exam: &str, _question: &str, _answer: &str) -> AppResult<Evaluation> {
        Ok(Evaluation {
            score: self.score,
            feedback: "Clear structure".to_string(),
            strengths: vec!["Concise".to_string()],
            areas_to_improve: vec!["Add examples".to_string()],
            suggestions: vec!["Cite data".to_string()],
        })
    }

    async fn improve(&self, _exam: &str, _question: &str, answer: &str) -> AppResult<String> {
        Ok(format!("{} (improved)", answer))
    }
}

pub fn sample_questions() -> Vec<Question> {
    vec![
        Question::new("Capital of France?", &["London", "Paris", "Rome", "Berlin"], 1),
        Question::new("2 + 2?", &["3", "4", "5", "6"], 1),
        Question::new("Largest ocean?", &["Atlantic", "Indian", "Pacific", "Arctic"], 2),
        Question::new("Red planet?", &["Venus", "Mars", "Jupiter", "Saturn"], 1),
    ]
}

pub fn test_config() -> Config {
    let mut config = Config::from_env();
    config.jwt_expiration_hours = 1;
    config.login_rate_limit_max_attempts = 5;
    config.login_rate_limit_window_seconds = 15;
    config.submission_window_seconds = 30;
    config.scoring_negative_marking = false;
    config.scoring_pass_threshold_percent = 50.0;
    config
}

/// Application state over in-memory storage and stub collaborators.
pub fn test_state(generator: StubGenerator) -> AppState {
    AppState::from_parts(
        test_config(),
        Repositories {
            users: Arc::new(InMemoryUserRepository::default()),
            tests: Arc::new(InMemoryTestRepository::default()),
            attempts: Arc::new(InMemoryAttemptRepository::default()),
            results: Arc::new(InMemoryResultRepository::default()),
            pdfs: Arc::new(InMemoryPdfRepository::default()),
            descriptive: Arc::new(InMemoryDescriptiveRepository::default()),
        },
        Collaborators {
            generator: Arc::new(generator),
            evaluator: Arc::new(StubEvaluator { score: 72 }),
            extractor: Arc::new(StubExtractor),
        },
        None,
    )
}
