use std::sync::Arc;

use futures::Stream;
use uuid::Uuid;
use validator::Validate;

use crate::{
    constants::CatalogKind,
    errors::{AppError, AppResult},
    models::{
        domain::{test_definition::validate_questions, AttemptStart, Question, TestDefinition, TestSource},
        dto::{
            request::{CreateTestRequest, GenerateTestRequest},
            response::{StartedAttempt, TestForAttempt},
        },
    },
    repositories::{AttemptRepository, PdfRepository, TestRepository},
    services::{generation::QuestionGenerator, paging::paged, pdf_service::DEFAULT_MCQ_COUNT},
};

pub struct TestService {
    tests: Arc<dyn TestRepository>,
    attempts: Arc<dyn AttemptRepository>,
    pdfs: Arc<dyn PdfRepository>,
    generator: Arc<dyn QuestionGenerator>,
}

impl TestService {
    pub fn new(
        tests: Arc<dyn TestRepository>,
        attempts: Arc<dyn AttemptRepository>,
        pdfs: Arc<dyn PdfRepository>,
        generator: Arc<dyn QuestionGenerator>,
    ) -> Self {
        Self {
            tests,
            attempts,
            pdfs,
            generator,
        }
    }

    pub async fn create_test(
        &self,
        owner_id: &str,
        request: CreateTestRequest,
    ) -> AppResult<TestDefinition> {
        request.validate()?;

        let mut test = TestDefinition::new(
            owner_id,
            request.title.trim(),
            request.description.as_deref().unwrap_or_default().trim(),
            request.questions,
        );
        if let Some(duration) = request.duration_minutes {
            test.duration_minutes = duration;
        }
        if let Some(total) = request.total_marks {
            test.total_marks = total;
        }
        if let Some(passing) = request.passing_marks {
            test.passing_marks = passing;
        }
        test.validate()?;

        let test = self.tests.create(test).await?;
        log::info!(
            "Created test {} for owner {} with {} questions",
            test.id,
            owner_id,
            test.questions.len()
        );
        Ok(test)
    }

    /// Owner view, including correct answers. Tests owned by someone else are
    /// reported as missing.
    pub async fn get_test(&self, id: &str, requester_id: &str) -> AppResult<TestDefinition> {
        let test = self.find_test(id).await?;
        if !test.is_owned_by(requester_id) {
            return Err(not_found(id));
        }
        Ok(test)
    }

    /// Public view for taking the test. Records the question snapshot that
    /// the submission will be scored against.
    pub async fn get_test_for_attempt(
        &self,
        id: &str,
        requester_id: &str,
    ) -> AppResult<StartedAttempt> {
        if Uuid::parse_str(id).is_err() {
            return Err(AppError::ValidationError("Invalid test id".to_string()));
        }

        let test = self.find_test(id).await?;
        let attempt = self
            .attempts
            .create(AttemptStart::snapshot(requester_id, &test))
            .await?;

        log::info!(
            "User {} started attempt {} on test {}",
            requester_id,
            attempt.id,
            test.id
        );

        Ok(StartedAttempt {
            test: TestForAttempt::from(&test),
            attempt_id: attempt.id,
        })
    }

    /// Results that reference the test are kept.
    pub async fn delete_test(&self, id: &str, requester_id: &str) -> AppResult<()> {
        let test = self.find_test(id).await?;

        if !test.is_owned_by(requester_id) {
            log::warn!("User {} attempted to delete test {} they do not own", requester_id, id);
            return Err(AppError::Unauthorized(
                "Only the owner can delete this test".to_string(),
            ));
        }

        if !self.tests.delete(id).await? {
            return Err(not_found(id));
        }

        log::info!("Deleted test {} by owner {}", id, requester_id);
        Ok(())
    }

    /// Newest first, fetched page by page as the stream is polled.
    pub fn list_tests<'a>(
        &'a self,
        owner_id: &'a str,
    ) -> impl Stream<Item = AppResult<TestDefinition>> + 'a {
        paged(move |offset, limit| self.tests.list_by_owner(owner_id, offset, limit))
    }

    pub async fn list_tests_page(
        &self,
        owner_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<TestDefinition>, i64)> {
        self.tests.list_by_owner(owner_id, offset, limit).await
    }

    pub async fn update_questions(
        &self,
        id: &str,
        requester_id: &str,
        questions: Vec<Question>,
    ) -> AppResult<TestDefinition> {
        let questions: Vec<Question> = questions.into_iter().map(Question::canonicalize).collect();
        validate_questions(&questions)?;

        let mut test = self.find_test(id).await?;
        if !test.is_owned_by(requester_id) {
            return Err(AppError::Unauthorized(
                "Only the owner can edit this test".to_string(),
            ));
        }

        self.tests.replace_questions(id, questions.clone()).await?;

        test.questions = questions;
        test.updated_at = chrono::Utc::now();
        log::info!("Replaced questions of test {} ({} questions)", id, test.questions.len());
        Ok(test)
    }

    pub async fn create_generated(
        &self,
        owner_id: &str,
        request: GenerateTestRequest,
    ) -> AppResult<TestDefinition> {
        request.validate()?;

        match (request.kind, request.pdf_ids) {
            (Some(kind), _) => self.create_from_catalog(owner_id, kind, request.title).await,
            (None, Some(pdf_ids)) => self.create_from_pdfs(owner_id, &pdf_ids, request.title).await,
            (None, None) => Err(AppError::ValidationError(
                "Provide either a test type or a list of PDF ids".to_string(),
            )),
        }
    }

    /// Asks the generator for fresh questions and falls back to the built-in
    /// catalog when it fails or returns nothing.
    pub async fn create_from_catalog(
        &self,
        owner_id: &str,
        kind: CatalogKind,
        title: Option<String>,
    ) -> AppResult<TestDefinition> {
        let entry = kind.entry();

        let (questions, source) = match self
            .generator
            .generate_for_category(kind, DEFAULT_MCQ_COUNT)
            .await
        {
            Ok(questions) if !questions.is_empty() => (questions, TestSource::Generated),
            Ok(_) => {
                log::warn!("Generator returned no questions for {:?}, using catalog", kind);
                (entry.to_questions(), TestSource::Catalog)
            }
            Err(e) => {
                log::warn!("Generation failed for {:?}, using catalog: {}", kind, e);
                (entry.to_questions(), TestSource::Catalog)
            }
        };

        let title = title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| entry.title.to_string());
        let test = TestDefinition::assembled(owner_id, &title, entry.description, questions, source);
        test.validate()?;

        let test = self.tests.create(test).await?;
        log::info!("Created {:?} test {} for owner {}", test.source, test.id, owner_id);
        Ok(test)
    }

    pub async fn create_from_pdfs(
        &self,
        owner_id: &str,
        pdf_ids: &[String],
        title: Option<String>,
    ) -> AppResult<TestDefinition> {
        let documents = self.pdfs.find_many_for_user(owner_id, pdf_ids).await?;
        if documents.is_empty() {
            return Err(AppError::NotFound("No PDFs found".to_string()));
        }

        let questions: Vec<Question> = documents
            .iter()
            .flat_map(|doc| doc.mcqs.iter().cloned())
            .collect();
        if questions.is_empty() {
            return Err(AppError::ValidationError(
                "Selected PDFs have no generated questions".to_string(),
            ));
        }

        let names: Vec<&str> = documents.iter().map(|doc| doc.title.as_str()).collect();
        let title = title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| match names.as_slice() {
                [single] => format!("{} Test", single),
                _ => format!("Test from {} PDFs", names.len()),
            });
        let description = format!("Generated from: {}", names.join(", "));

        let test =
            TestDefinition::assembled(owner_id, &title, &description, questions, TestSource::Pdf);
        test.validate()?;

        let test = self.tests.create(test).await?;
        log::info!(
            "Created test {} from {} PDFs for owner {}",
            test.id,
            documents.len(),
            owner_id
        );
        Ok(test)
    }

    async fn find_test(&self, id: &str) -> AppResult<TestDefinition> {
        self.tests.find_by_id(id).await?.ok_or_else(|| not_found(id))
    }
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Test with id '{}' not found", id))
}
