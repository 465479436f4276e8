use crate::models::domain::{Question, TestDefinition, User};

#[cfg(test)]
pub mod fixtures {
    use super::*;

    /// Creates a standard test user
    pub fn test_user() -> User {
        User::test_user("Test")
    }

    /// Four questions whose correct answers are indices 0..=3.
    pub fn four_questions() -> Vec<Question> {
        (0..4)
            .map(|i| Question::new(&format!("Question {}", i + 1), &["A", "B", "C", "D"], i))
            .collect()
    }

    pub fn test_definition(owner_id: &str) -> TestDefinition {
        TestDefinition::new(owner_id, "Sample Test", "Fixture", four_questions())
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::test_helpers::*;
    use crate::services::ScoringEngine;
    use actix_web::http::StatusCode;

    #[test]
    fn test_fixtures_test_user() {
        let user = test_user();
        assert_eq!(user.email, "test@example.com");
    }

    #[test]
    fn test_fixture_definition_is_valid() {
        let test = test_definition("owner-1");
        assert!(test.validate().is_ok());
        assert_eq!(test.questions.len(), 4);
    }

    #[test]
    fn test_fixture_answers_grade_fully_correct() {
        let questions = four_questions();
        let answers: Vec<_> = (0..4)
            .map(|i| Some(crate::models::domain::SubmittedAnswer::Index(i)))
            .collect();

        let sheet = ScoringEngine::default().grade(&questions, &answers);
        assert_eq!(sheet.correct_answers, 4);
    }

    #[test]
    fn test_status_helpers() {
        assert_error_status(StatusCode::NOT_FOUND);
        assert_success_status(StatusCode::OK);
    }
}
