use async_graphql::{Enum, SimpleObject};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Enum, Copy, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// The stored shape of a question's key. Older documents carry the literal
/// option text, newer ones a zero-based option index; both load.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum CorrectAnswer {
    Index(u32),
    Text(String),
}

/// A value the test taker picked for one question.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum SubmittedAnswer {
    Index(u32),
    Text(String),
}

impl SubmittedAnswer {
    /// Reads one value from a client submission. Anything that is neither an
    /// option index nor option text (`-1`, floats, booleans, objects) is
    /// treated as unanswered.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n
                .as_u64()
                .and_then(|i| u32::try_from(i).ok())
                .map(SubmittedAnswer::Index),
            serde_json::Value::String(text) => Some(SubmittedAnswer::Text(text.clone())),
            _ => None,
        }
    }

    /// Negative indices mean unanswered.
    pub fn from_index(index: i64) -> Option<Self> {
        u32::try_from(index).ok().map(SubmittedAnswer::Index)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: CorrectAnswer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

impl Question {
    pub fn new(text: &str, options: &[&str], correct_index: u32) -> Self {
        Question {
            text: text.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answer: CorrectAnswer::Index(correct_index),
            explanation: None,
            difficulty: None,
        }
    }

    /// Index of the correct option, whichever shape the key is stored in.
    pub fn correct_index(&self) -> Option<usize> {
        match &self.correct_answer {
            CorrectAnswer::Index(i) => {
                let i = *i as usize;
                (i < self.options.len()).then_some(i)
            }
            CorrectAnswer::Text(text) => self.options.iter().position(|o| o == text),
        }
    }

    pub fn correct_option_text(&self) -> Option<&str> {
        self.correct_index().map(|i| self.options[i].as_str())
    }

    /// Rewrites a literal-text key into the canonical index form when the
    /// text names one of the options. Unmatched text is left untouched so
    /// validation can reject it.
    pub fn canonicalize(mut self) -> Self {
        if let CorrectAnswer::Text(text) = &self.correct_answer {
            if let Some(i) = self.options.iter().position(|o| o == text) {
                self.correct_answer = CorrectAnswer::Index(i as u32);
            }
        }
        self
    }

    pub fn validate(&self, position: usize) -> AppResult<()> {
        if self.text.trim().is_empty() {
            return Err(AppError::ValidationError(format!(
                "Question {} has no text",
                position + 1
            )));
        }

        if self.options.len() < 2 {
            return Err(AppError::ValidationError(format!(
                "Question {} needs at least 2 options",
                position + 1
            )));
        }

        if self.options.iter().any(|o| o.trim().is_empty()) {
            return Err(AppError::ValidationError(format!(
                "Question {} has an empty option",
                position + 1
            )));
        }

        if self.correct_index().is_none() {
            return Err(AppError::ValidationError(format!(
                "Question {} has a correct answer that matches no option",
                position + 1
            )));
        }

        Ok(())
    }
}

/// Question as shown to a test taker: no key, no explanation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
pub struct PublicQuestion {
    pub text: String,
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

impl From<&Question> for PublicQuestion {
    fn from(question: &Question) -> Self {
        PublicQuestion {
            text: question.text.clone(),
            options: question.options.clone(),
            difficulty: question.difficulty,
        }
    }
}
