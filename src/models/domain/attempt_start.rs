use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::{question::Question, test_definition::TestDefinition};

/// Frozen copy of a test's questions taken when a user starts an attempt.
/// Submissions that reference it are scored against these questions even if
/// the owner edits the test in the meantime.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AttemptStart {
    pub id: String,
    pub user_id: String,
    pub test_id: String,
    pub title: String,
    pub questions: Vec<Question>,
    pub duration_minutes: u32,
    pub started_at: DateTime<Utc>,
}

impl AttemptStart {
    pub fn snapshot(user_id: &str, test: &TestDefinition) -> Self {
        AttemptStart {
            id: Uuid::now_v7().to_string(),
            user_id: user_id.to_string(),
            test_id: test.id.clone(),
            title: test.title.clone(),
            questions: test.questions.clone(),
            duration_minutes: test.duration_minutes,
            started_at: Utc::now(),
        }
    }

    /// Seconds between start and `at`, capped at the attempt's duration.
    pub fn elapsed_seconds(&self, at: DateTime<Utc>) -> i64 {
        let elapsed = (at - self.started_at).num_seconds().max(0);
        elapsed.min(self.duration_minutes as i64 * 60)
    }
}
