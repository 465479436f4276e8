use async_graphql::ID;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Checks that a GraphQL ID is a UUID and returns it as a string key.
pub fn parse_id(id: &ID) -> AppResult<String> {
    Uuid::parse_str(id.as_str())
        .map(|uuid| uuid.to_string())
        .map_err(|_| AppError::ValidationError("Invalid UUID format".to_string()))
}

pub fn page_bounds(offset: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    (
        offset.unwrap_or(0).max(0),
        limit.unwrap_or(20).clamp(1, 100),
    )
}
