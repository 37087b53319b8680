use serde::{Deserialize, Serialize};

use crate::error::{MemtodoError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: i64,
    pub title: String,
    pub description: String,
}

impl TodoItem {
    pub fn new(id: i64, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Trims a title and rejects it if nothing is left.
pub fn validate_title(title: &str) -> Result<&str> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(MemtodoError::InvalidInput(
            "Title cannot be empty".to_string(),
        ));
    }
    Ok(trimmed)
}
