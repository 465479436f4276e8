pub mod ai_client;
pub mod attempt_session;
pub mod descriptive_service;
pub mod generation;
pub mod paging;
pub mod pdf_service;
pub mod result_service;
pub mod scoring;
pub mod test_service;
pub mod user_service;

pub use ai_client::AiClient;
pub use attempt_session::{AttemptSession, AttemptState, AttemptTimer};
pub use descriptive_service::{AiAnswerEvaluator, AnswerEvaluator, DescriptiveService};
pub use generation::{AiQuestionGenerator, QuestionGenerator};
pub use pdf_service::{PdfService, PdfTextExtractor, TextExtractor};
pub use result_service::ResultService;
pub use scoring::{ScoringEngine, ScoringPolicy};
pub use test_service::TestService;
pub use user_service::UserService;
