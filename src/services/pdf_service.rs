use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::domain::PdfDocument,
    repositories::PdfRepository,
    services::generation::QuestionGenerator,
};

pub const DEFAULT_MCQ_COUNT: usize = 10;
const MIN_TEXT_CHARS: usize = 50;
const MAX_PROMPT_CHARS: usize = 30_000;
const PDF_MAGIC: &[u8] = b"%PDF";

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedText {
    pub text: String,
    pub page_count: u32,
}

pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> AppResult<ExtractedText>;
}

pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, bytes: &[u8]) -> AppResult<ExtractedText> {
        let page_count = lopdf::Document::load_mem(bytes)
            .map(|doc| doc.get_pages().len() as u32)
            .map_err(|e| AppError::UpstreamFailure(format!("Failed to read PDF: {}", e)))?;

        let text = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| AppError::UpstreamFailure(format!("Failed to extract PDF text: {}", e)))?;

        let text = text.trim().to_string();
        if text.chars().count() < MIN_TEXT_CHARS {
            return Err(AppError::ValidationError(
                "PDF too short or invalid".to_string(),
            ));
        }

        Ok(ExtractedText { text, page_count })
    }
}

pub struct PdfService {
    repository: Arc<dyn PdfRepository>,
    extractor: Arc<dyn TextExtractor>,
    generator: Arc<dyn QuestionGenerator>,
    max_bytes: usize,
}

impl PdfService {
    pub fn new(
        repository: Arc<dyn PdfRepository>,
        extractor: Arc<dyn TextExtractor>,
        generator: Arc<dyn QuestionGenerator>,
        max_bytes: usize,
    ) -> Self {
        Self {
            repository,
            extractor,
            generator,
            max_bytes,
        }
    }

    /// Extracts the text of an uploaded PDF, generates questions from it and
    /// stores both. A failed generation still stores the document, with no
    /// questions.
    pub async fn ingest(
        &self,
        user_id: &str,
        title: &str,
        bytes: Vec<u8>,
        topic: Option<&str>,
        count: usize,
    ) -> AppResult<PdfDocument> {
        if bytes.is_empty() {
            return Err(AppError::ValidationError("No file uploaded".to_string()));
        }

        if bytes.len() > self.max_bytes {
            return Err(AppError::ValidationError(format!(
                "File exceeds max size of {}MB",
                self.max_bytes / (1024 * 1024)
            )));
        }

        if !bytes.starts_with(PDF_MAGIC) {
            return Err(AppError::ValidationError(
                "Only PDF files are allowed".to_string(),
            ));
        }

        let file_size = bytes.len() as u64;
        let extractor = Arc::clone(&self.extractor);
        let extracted = tokio::task::spawn_blocking(move || extractor.extract(&bytes))
            .await
            .map_err(|e| AppError::UpstreamFailure(format!("PDF extraction aborted: {}", e)))??;

        let prompt_text: String = extracted.text.chars().take(MAX_PROMPT_CHARS).collect();
        let mcqs = match self
            .generator
            .generate_from_text(&prompt_text, topic, count)
            .await
        {
            Ok(questions) => questions,
            Err(e) => {
                log::warn!("MCQ generation failed for '{}', storing without questions: {}", title, e);
                Vec::new()
            }
        };

        let pdf = PdfDocument::new(
            user_id,
            title,
            extracted.text,
            file_size,
            extracted.page_count,
            mcqs,
        );
        let pdf = self.repository.create(pdf).await?;

        log::info!(
            "Stored PDF {} for user {} ({} pages, {} questions)",
            pdf.id,
            user_id,
            pdf.page_count,
            pdf.mcqs.len()
        );
        Ok(pdf)
    }

    pub async fn list(&self, user_id: &str) -> AppResult<Vec<PdfDocument>> {
        self.repository.list_by_user(user_id).await
    }

    pub async fn find_for_user(&self, user_id: &str, ids: &[String]) -> AppResult<Vec<PdfDocument>> {
        self.repository.find_many_for_user(user_id, ids).await
    }

    pub async fn delete(&self, id: &str, user_id: &str) -> AppResult<()> {
        if !self.repository.delete_for_user(id, user_id).await? {
            return Err(AppError::NotFound(format!("PDF with id '{}' not found", id)));
        }

        log::info!("Deleted PDF {} for user {}", id, user_id);
        Ok(())
    }
}
