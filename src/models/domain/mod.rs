pub mod attempt_start;
pub mod descriptive_attempt;
pub mod pdf_document;
pub mod question;
pub mod result_record;
pub mod test_definition;
pub mod user;
pub use attempt_start::AttemptStart;
pub use descriptive_attempt::{DescriptiveAttempt, Evaluation};
pub use pdf_document::PdfDocument;
pub use question::{CorrectAnswer, Difficulty, PublicQuestion, Question, SubmittedAnswer};
pub use result_record::{QuestionOutcome, ResultRecord, ScoringPolicy};
pub use test_definition::{TestDefinition, TestSource};
pub use user::User;
