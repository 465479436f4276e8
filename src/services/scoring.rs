use chrono::Utc;
use uuid::Uuid;

pub use crate::models::domain::ScoringPolicy;
use crate::models::domain::{
    CorrectAnswer, Question, QuestionOutcome, ResultRecord, SubmittedAnswer,
};

/// Aggregates for one graded submission.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreSheet {
    pub per_question: Vec<QuestionOutcome>,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub wrong_answers: u32,
    pub score: f64,
    pub percentage: f64,
    pub passed: bool,
}

/// What is being scored: the questions as they stood for the attempt.
pub struct ScoringInput<'a> {
    pub user_id: &'a str,
    pub test_id: &'a str,
    pub test_title: &'a str,
    pub questions: Vec<Question>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ScoringEngine {
    policy: ScoringPolicy,
}

impl ScoringEngine {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ScoringPolicy {
        self.policy
    }

    /// Grades `answers` positionally against `questions`. Answers past the
    /// last question are ignored; missing ones count as wrong.
    pub fn grade(&self, questions: &[Question], answers: &[Option<SubmittedAnswer>]) -> ScoreSheet {
        let per_question: Vec<QuestionOutcome> = questions
            .iter()
            .enumerate()
            .map(|(i, question)| {
                let submitted = answers.get(i).cloned().flatten();
                QuestionOutcome {
                    index: i as u32,
                    correct: is_correct(question, submitted.as_ref()),
                    submitted,
                }
            })
            .collect();

        let total_questions = questions.len() as u32;
        let correct_answers = per_question.iter().filter(|o| o.correct).count() as u32;
        let wrong_answers = total_questions - correct_answers;

        let score = if self.policy.negative_marking {
            correct_answers as f64 - 0.5 * wrong_answers as f64
        } else {
            correct_answers as f64
        };

        let percentage = if total_questions == 0 {
            0.0
        } else {
            correct_answers as f64 / total_questions as f64 * 100.0
        };

        ScoreSheet {
            per_question,
            total_questions,
            correct_answers,
            wrong_answers,
            score,
            percentage,
            passed: percentage >= self.policy.pass_threshold_percent,
        }
    }

    /// Builds the immutable record for a submission. Attempt linkage, timing
    /// and the idempotency key are filled in by the caller.
    pub fn score(&self, input: ScoringInput<'_>, answers: Vec<Option<SubmittedAnswer>>) -> ResultRecord {
        let sheet = self.grade(&input.questions, &answers);

        ResultRecord {
            id: Uuid::now_v7().to_string(),
            user_id: input.user_id.to_string(),
            test_id: input.test_id.to_string(),
            test_title: input.test_title.to_string(),
            attempt_id: None,
            idempotency_key: String::new(),
            answers,
            questions: input.questions,
            per_question: sheet.per_question,
            score: sheet.score,
            percentage: sheet.percentage,
            total_questions: sheet.total_questions,
            correct_answers: sheet.correct_answers,
            wrong_answers: sheet.wrong_answers,
            passed: sheet.passed,
            policy: self.policy,
            time_taken_seconds: 0,
            created_at: Utc::now(),
        }
    }
}

fn is_correct(question: &Question, submitted: Option<&SubmittedAnswer>) -> bool {
    let Some(submitted) = submitted else {
        return false;
    };

    match (&question.correct_answer, submitted) {
        (CorrectAnswer::Index(key), SubmittedAnswer::Index(given)) => {
            key == given && (*given as usize) < question.options.len()
        }
        (CorrectAnswer::Text(key), SubmittedAnswer::Text(given)) => key == given,
        (CorrectAnswer::Text(key), SubmittedAnswer::Index(given)) => question
            .options
            .get(*given as usize)
            .is_some_and(|option| option == key),
        (CorrectAnswer::Index(_), SubmittedAnswer::Text(given)) => question
            .correct_option_text()
            .is_some_and(|option| option == given),
    }
}
