use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::question::Question;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PdfDocument {
    pub id: String,
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub file_size: u64,
    pub page_count: u32,
    pub mcqs: Vec<Question>,
    pub created_at: DateTime<Utc>,
}

impl PdfDocument {
    pub fn new(
        user_id: &str,
        title: &str,
        content: String,
        file_size: u64,
        page_count: u32,
        mcqs: Vec<Question>,
    ) -> Self {
        PdfDocument {
            id: Uuid::now_v7().to_string(),
            user_id: user_id.to_string(),
            title: title.to_string(),
            content,
            file_size,
            page_count,
            mcqs,
            created_at: Utc::now(),
        }
    }
}
