pub mod follows;
pub mod posts;
pub mod profiles;
pub mod replies;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::AppError;
use crate::repository::Page;

/// `{"message": "..."}` body for non-error outcomes
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl From<&PageQuery> for Page {
    fn from(query: &PageQuery) -> Self {
        Page::new(query.limit, query.offset)
    }
}

pub(crate) fn parse_id(raw: &str, what: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation(format!("Invalid {}", what)))
}

/// Pull a trimmed, non-empty `content` string out of a raw JSON body.
pub(crate) fn extract_content(body: &[u8]) -> Result<String, AppError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|_| AppError::Validation("Invalid request body".to_string()))?;

    value
        .get("content")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|content| !content.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            AppError::Validation("Content is required and must be a non-empty string".to_string())
        })
}
