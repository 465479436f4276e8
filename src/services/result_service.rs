use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::Stream;
use sha2::{Digest, Sha256};
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{domain::ResultRecord, dto::request::SubmitTestRequest},
    repositories::{AttemptRepository, ResultRepository, TestRepository},
    services::{
        paging::paged,
        scoring::{ScoringEngine, ScoringInput},
    },
};

pub struct ResultService {
    results: Arc<dyn ResultRepository>,
    attempts: Arc<dyn AttemptRepository>,
    tests: Arc<dyn TestRepository>,
    engine: ScoringEngine,
    window_secs: i64,
}

impl ResultService {
    pub fn new(
        results: Arc<dyn ResultRepository>,
        attempts: Arc<dyn AttemptRepository>,
        tests: Arc<dyn TestRepository>,
        engine: ScoringEngine,
        window_secs: i64,
    ) -> Self {
        Self {
            results,
            attempts,
            tests,
            engine,
            window_secs,
        }
    }

    /// Scores a submission and stores the result. A repeated submission with
    /// the same idempotency key returns the stored record instead of a new one.
    pub async fn submit(
        &self,
        user_id: &str,
        test_id: &str,
        request: SubmitTestRequest,
    ) -> AppResult<ResultRecord> {
        request.validate()?;

        let test = self
            .tests
            .find_by_id(test_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Test with id '{}' not found", test_id)))?;

        let snapshot = match request.attempt_id.as_deref() {
            Some(attempt_id) => {
                let attempt = self
                    .attempts
                    .find_by_id(attempt_id)
                    .await?
                    .filter(|attempt| attempt.test_id == test.id)
                    .ok_or_else(|| {
                        AppError::NotFound(format!("Attempt with id '{}' not found", attempt_id))
                    })?;

                if attempt.user_id != user_id {
                    return Err(AppError::Unauthorized(
                        "Attempt belongs to another user".to_string(),
                    ));
                }
                Some(attempt)
            }
            None => None,
        };

        let now = Utc::now();
        let key = idempotency_key(
            user_id,
            test_id,
            request.attempt_id.as_deref(),
            request.submission_key.as_deref(),
            now,
            self.window_secs,
        );

        if let Some(existing) = self.results.find_by_idempotency_key(&key).await? {
            log::info!(
                "Duplicate submission for test {} by user {}, returning result {}",
                test_id,
                user_id,
                existing.id
            );
            return Ok(existing);
        }

        let (title, questions, time_taken_seconds) = match snapshot {
            Some(attempt) => {
                let elapsed = attempt.elapsed_seconds(now);
                (attempt.title, attempt.questions, elapsed)
            }
            None => (
                test.title,
                test.questions,
                request.time_taken_seconds.unwrap_or(0).max(0),
            ),
        };

        let mut record = self.engine.score(
            ScoringInput {
                user_id,
                test_id,
                test_title: &title,
                questions,
            },
            request.answers,
        );
        record.attempt_id = request.attempt_id;
        record.idempotency_key = key.clone();
        record.time_taken_seconds = time_taken_seconds;

        match self.results.create(record).await {
            Ok(record) => {
                log::info!(
                    "Stored result {} for test {} by user {}: {}/{} correct",
                    record.id,
                    test_id,
                    user_id,
                    record.correct_answers,
                    record.total_questions
                );
                Ok(record)
            }
            // A concurrent submission with the same key won the insert.
            Err(AppError::AlreadyExists(_)) => self
                .results
                .find_by_idempotency_key(&key)
                .await?
                .ok_or_else(|| {
                    AppError::InternalError("Duplicate result vanished after insert".to_string())
                }),
            Err(e) => Err(e),
        }
    }

    pub async fn get_result(&self, id: &str, requester_id: &str) -> AppResult<ResultRecord> {
        let record = self
            .results
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Result with id '{}' not found", id)))?;

        if record.user_id != requester_id {
            return Err(AppError::Unauthorized(
                "This result belongs to another user".to_string(),
            ));
        }

        Ok(record)
    }

    /// Newest first, fetched page by page as the stream is polled.
    pub fn list_results<'a>(
        &'a self,
        user_id: &'a str,
    ) -> impl Stream<Item = AppResult<ResultRecord>> + 'a {
        paged(move |offset, limit| self.results.list_by_user(user_id, offset, limit))
    }

    pub async fn list_results_page(
        &self,
        user_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<ResultRecord>, i64)> {
        self.results.list_by_user(user_id, offset, limit).await
    }
}

/// SHA-256 over user, test and the most specific discriminator available:
/// the attempt id, else the client's submission key, else the time window.
pub fn idempotency_key(
    user_id: &str,
    test_id: &str,
    attempt_id: Option<&str>,
    submission_key: Option<&str>,
    now: DateTime<Utc>,
    window_secs: i64,
) -> String {
    let discriminator = match (attempt_id, submission_key) {
        (Some(attempt_id), _) => format!("attempt:{}", attempt_id),
        (None, Some(key)) => format!("key:{}", key),
        (None, None) => format!("window:{}", now.timestamp().div_euclid(window_secs.max(1))),
    };

    let mut hasher = Sha256::new();
    hasher.update(format!("{}|{}|{}", user_id, test_id, discriminator));
    format!("{:x}", hasher.finalize())
}
