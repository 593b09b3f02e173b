use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::CoreError;
use crate::slug::is_valid_slug;

/// A named, slugged tag grouping questions. Listed by title.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub added: DateTime<Utc>,
    pub lastchanged: DateTime<Utc>,
}

impl Category {
    /// Check a title/slug pair before it is written.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for an empty or over-long title, or a
    /// slug outside `[a-z0-9-_]+`.
    pub fn validate(title: &str, slug: &str) -> Result<(), CoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CoreError::Validation("category title is required".into()));
        }
        if title.chars().count() > crate::entities::MAX_TITLE_LEN {
            return Err(CoreError::Validation(format!(
                "category title exceeds {} characters",
                crate::entities::MAX_TITLE_LEN
            )));
        }
        if !is_valid_slug(slug) {
            return Err(CoreError::Validation(format!(
                "invalid category slug '{slug}': use lowercase letters, digits, '-' or '_'"
            )));
        }
        if slug.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::Validation(format!(
                "invalid category slug '{slug}': all-digit slugs address questions"
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}
