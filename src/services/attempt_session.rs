use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::task::JoinHandle;

use crate::{
    errors::{AppError, AppResult},
    models::{domain::SubmittedAnswer, dto::response::StartedAttempt},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    NotStarted,
    InProgress,
    Submitting,
    Completed,
}

/// Client-held state of one timed pass through a test. Nothing here is
/// persisted: dropping the session discards the answers.
#[derive(Debug, Clone)]
pub struct AttemptSession {
    test_id: String,
    attempt_id: Option<String>,
    question_count: usize,
    duration_minutes: u32,
    current_index: usize,
    answers: HashMap<usize, SubmittedAnswer>,
    time_remaining_seconds: u64,
    state: AttemptState,
    submit_in_flight: bool,
}

impl AttemptSession {
    pub fn new(test_id: &str, question_count: usize, duration_minutes: u32) -> Self {
        Self {
            test_id: test_id.to_string(),
            attempt_id: None,
            question_count,
            duration_minutes,
            current_index: 0,
            answers: HashMap::new(),
            time_remaining_seconds: 0,
            state: AttemptState::NotStarted,
            submit_in_flight: false,
        }
    }

    /// A session for a test fetched through the start endpoint, linked to
    /// the server-side snapshot.
    pub fn for_started(started: &StartedAttempt) -> Self {
        let mut session = Self::new(
            &started.test.id,
            started.test.questions.len(),
            started.test.duration_minutes,
        );
        session.attempt_id = Some(started.attempt_id.clone());
        session
    }

    pub fn start(&mut self) -> AppResult<()> {
        if self.state != AttemptState::NotStarted {
            return Err(AppError::ValidationError(
                "Attempt has already been started".to_string(),
            ));
        }

        self.time_remaining_seconds = u64::from(self.duration_minutes) * 60;
        self.answers.clear();
        self.current_index = 0;
        self.state = AttemptState::InProgress;
        Ok(())
    }

    /// Records an answer for the current question. Last write wins.
    pub fn select_answer(&mut self, answer: SubmittedAnswer) -> AppResult<()> {
        self.ensure_in_progress()?;
        self.answers.insert(self.current_index, answer);
        Ok(())
    }

    pub fn clear_answer(&mut self) -> AppResult<()> {
        self.ensure_in_progress()?;
        self.answers.remove(&self.current_index);
        Ok(())
    }

    pub fn next(&mut self) -> usize {
        if self.state == AttemptState::InProgress && self.current_index + 1 < self.question_count {
            self.current_index += 1;
        }
        self.current_index
    }

    pub fn previous(&mut self) -> usize {
        if self.state == AttemptState::InProgress {
            self.current_index = self.current_index.saturating_sub(1);
        }
        self.current_index
    }

    /// Advances the countdown by one second. Returns `true` only on the tick
    /// that reaches zero.
    pub fn tick(&mut self) -> bool {
        if self.state != AttemptState::InProgress || self.time_remaining_seconds == 0 {
            return false;
        }

        self.time_remaining_seconds -= 1;
        self.time_remaining_seconds == 0
    }

    /// Manual submission. While the attempt is running it is only allowed
    /// from the last question; a retry after `fail_submit` is allowed from
    /// wherever the session stopped. Returns `Ok(None)` while another
    /// submission is in flight.
    pub fn begin_submit(&mut self) -> AppResult<Option<Vec<Option<SubmittedAnswer>>>> {
        if self.state == AttemptState::InProgress && !self.is_last_question() {
            return Err(AppError::ValidationError(
                "Tests can only be submitted from the last question".to_string(),
            ));
        }
        Ok(self.claim_submission())
    }

    /// Timer-driven submission once the countdown has run out, from any
    /// question.
    fn expire(&mut self) -> Option<Vec<Option<SubmittedAnswer>>> {
        if self.time_remaining_seconds > 0 {
            return None;
        }
        self.claim_submission()
    }

    /// Single-flight guard shared by both submission paths. Only the first
    /// caller gets the answers until `fail_submit` re-arms it.
    fn claim_submission(&mut self) -> Option<Vec<Option<SubmittedAnswer>>> {
        match self.state {
            AttemptState::InProgress => {
                self.state = AttemptState::Submitting;
            }
            AttemptState::Submitting if !self.submit_in_flight => {}
            _ => return None,
        }

        self.submit_in_flight = true;
        Some(self.answers_positional())
    }

    pub fn complete(&mut self) {
        if self.state == AttemptState::Submitting {
            self.state = AttemptState::Completed;
            self.submit_in_flight = false;
        }
    }

    /// Leaves the session in `Submitting` so the user can resubmit.
    pub fn fail_submit(&mut self) {
        if self.state == AttemptState::Submitting {
            self.submit_in_flight = false;
        }
    }

    /// Dense answers up to the question count, `None` where unanswered.
    pub fn answers_positional(&self) -> Vec<Option<SubmittedAnswer>> {
        (0..self.question_count)
            .map(|i| self.answers.get(&i).cloned())
            .collect()
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    pub fn test_id(&self) -> &str {
        &self.test_id
    }

    pub fn attempt_id(&self) -> Option<&str> {
        self.attempt_id.as_deref()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 >= self.question_count
    }

    pub fn time_remaining_seconds(&self) -> u64 {
        self.time_remaining_seconds
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    fn ensure_in_progress(&self) -> AppResult<()> {
        if self.state != AttemptState::InProgress {
            return Err(AppError::ValidationError(
                "Attempt is not in progress".to_string(),
            ));
        }
        Ok(())
    }
}

/// Once-per-second countdown driving a shared session. When time runs out the
/// callback receives the positional answers, at most once. The task stops as
/// soon as the session leaves `InProgress`, and is aborted on drop.
pub struct AttemptTimer {
    handle: JoinHandle<()>,
}

impl AttemptTimer {
    pub fn spawn<F>(session: Arc<Mutex<AttemptSession>>, on_expire: F) -> Self
    where
        F: FnOnce(Vec<Option<SubmittedAnswer>>) + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            // The first tick completes immediately.
            interval.tick().await;

            loop {
                interval.tick().await;

                let expired = {
                    let Ok(mut session) = session.lock() else {
                        log::error!("Attempt session lock poisoned, stopping timer");
                        return;
                    };

                    if session.state() != AttemptState::InProgress {
                        return;
                    }

                    if session.tick() {
                        Some(session.expire())
                    } else {
                        None
                    }
                };

                if let Some(answers) = expired {
                    if let Some(answers) = answers {
                        on_expire(answers);
                    }
                    return;
                }
            }
        });

        Self { handle }
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for AttemptTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
